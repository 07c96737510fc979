use super::*;

/// Tests that a request without credentials is anonymous.
///
/// Expected: Ok(Principal::Anonymous)
#[tokio::test]
async fn missing_header_is_anonymous() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let principal = resolve_principal(db, &HeaderMap::new()).await?;

    assert_eq!(principal, Principal::Anonymous);

    Ok(())
}

/// Tests that an empty `Authorization` header counts as no credential.
///
/// Expected: Ok(Principal::Anonymous)
#[tokio::test]
async fn empty_header_is_anonymous() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let principal = resolve_principal(db, &bearer("")).await?;

    assert_eq!(principal, Principal::Anonymous);

    Ok(())
}

/// Tests that a live authentication token resolves to its owner.
///
/// Expected: Ok(Principal::Authenticated(owner))
#[tokio::test]
async fn live_token_resolves_owner() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id).build().await?;

    let principal = resolve_principal(db, &bearer(&format!("Bearer {}", plaintext))).await?;

    assert_eq!(principal, Principal::Authenticated(User::from_entity(user)));

    Ok(())
}

/// Tests the header shapes that never reach the token store.
///
/// Expected: Err(AuthError::InvalidCredential) for each
#[tokio::test]
async fn rejects_malformed_headers() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for value in [
        "Bearer",
        "Basic dXNlcjpwYXNz",
        "bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        "Bearer ABCDEFGHIJKLMNOPQRSTUVWXYZ extra",
        "Bearer TOOSHORT",
    ] {
        let result = resolve_principal(db, &bearer(value)).await;

        assert!(
            matches!(result, Err(AppError::AuthErr(AuthError::InvalidCredential))),
            "{value:?} gave {result:?}"
        );
    }

    Ok(())
}

/// Tests that an expired token is rejected rather than treated as anonymous.
///
/// Expected: Err(AuthError::InvalidCredential)
#[tokio::test]
async fn rejects_expired_token() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id)
        .expiry(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let result = resolve_principal(db, &bearer(&format!("Bearer {}", plaintext))).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredential))
    ));

    Ok(())
}

/// Tests that an activation token cannot authenticate.
///
/// Expected: Err(AuthError::InvalidCredential)
#[tokio::test]
async fn rejects_activation_token() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id)
        .scope("activation")
        .build()
        .await?;

    let result = resolve_principal(db, &bearer(&format!("Bearer {}", plaintext))).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredential))
    ));

    Ok(())
}
