use super::*;

/// Tests resolving a live token in its own scope.
///
/// Expected: Some(owner)
#[tokio::test]
async fn finds_owner_of_live_token() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id).build().await?;

    let found = TokenRepository::new(db)
        .find_user_for_token(TokenScope::Authentication, &plaintext, Utc::now())
        .await?;

    assert_eq!(found.map(|u| u.id), Some(user.id));

    Ok(())
}

/// Tests that a token is invisible to lookups for another scope.
///
/// Expected: None
#[tokio::test]
async fn ignores_other_scopes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id)
        .scope("activation")
        .build()
        .await?;

    let found = TokenRepository::new(db)
        .find_user_for_token(TokenScope::Authentication, &plaintext, Utc::now())
        .await?;

    assert!(found.is_none());

    Ok(())
}

/// Tests that an expired token is invisible.
///
/// Expected: None
#[tokio::test]
async fn ignores_expired_tokens() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let (plaintext, _) = factory::token::TokenFactory::new(db, user.id)
        .expiry(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    let found = TokenRepository::new(db)
        .find_user_for_token(TokenScope::Authentication, &plaintext, Utc::now())
        .await?;

    assert!(found.is_none());

    Ok(())
}

/// Tests an unknown plaintext.
///
/// Expected: None
#[tokio::test]
async fn unknown_token_is_none() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let found = TokenRepository::new(db)
        .find_user_for_token(
            TokenScope::Authentication,
            "ZZZZZZZZZZZZZZZZZZZZZZZZZZ",
            Utc::now(),
        )
        .await?;

    assert!(found.is_none());

    Ok(())
}
