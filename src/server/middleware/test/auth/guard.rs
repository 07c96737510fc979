use super::*;

/// Tests that every gate rejects an anonymous principal.
///
/// Expected: Err(AuthError::AuthenticationRequired)
#[tokio::test]
async fn anonymous_is_rejected_at_every_level() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let principal = Principal::Anonymous;
    let guard = AuthGuard::new(db, &principal);

    assert!(matches!(
        guard.require_authenticated(),
        Err(AppError::AuthErr(AuthError::AuthenticationRequired))
    ));
    assert!(matches!(
        guard.require_activated(),
        Err(AppError::AuthErr(AuthError::AuthenticationRequired))
    ));
    assert!(matches!(
        guard.require_permission(Permission::MoviesRead).await,
        Err(AppError::AuthErr(AuthError::AuthenticationRequired))
    ));

    Ok(())
}

/// Tests that an unactivated user passes authentication but nothing above it.
///
/// Expected: Err(AuthError::InactiveAccount) even when the permission is held
#[tokio::test]
async fn inactive_user_is_rejected_before_permissions() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .permissions(&["movies:read"])
        .build()
        .await?;
    let principal = Principal::Authenticated(User::from_entity(user.clone()));
    let guard = AuthGuard::new(db, &principal);

    assert_eq!(guard.require_authenticated()?.id, user.id);
    assert!(matches!(
        guard.require_activated(),
        Err(AppError::AuthErr(AuthError::InactiveAccount(id))) if id == user.id
    ));
    assert!(matches!(
        guard.require_permission(Permission::MoviesRead).await,
        Err(AppError::AuthErr(AuthError::InactiveAccount(_)))
    ));

    Ok(())
}

/// Tests that an activated user without the code is not permitted.
///
/// Expected: Err(AuthError::NotPermitted) naming the missing code
#[tokio::test]
async fn missing_permission_is_not_permitted() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .activated(true)
        .permissions(&["movies:read"])
        .build()
        .await?;
    let principal = Principal::Authenticated(User::from_entity(user.clone()));
    let guard = AuthGuard::new(db, &principal);

    assert_eq!(
        guard.require_permission(Permission::MoviesRead).await?.id,
        user.id
    );
    assert!(matches!(
        guard.require_permission(Permission::MoviesWrite).await,
        Err(AppError::AuthErr(AuthError::NotPermitted { code: "movies:write", .. }))
    ));

    Ok(())
}

/// Tests that multiple permissions must all be held.
///
/// Expected: Ok(User) only once both codes are granted
#[tokio::test]
async fn requires_all_permissions() -> Result<(), AppError> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .activated(true)
        .permissions(&["movies:write"])
        .build()
        .await?;
    let principal = Principal::Authenticated(User::from_entity(user.clone()));
    let guard = AuthGuard::new(db, &principal);
    let both = [Permission::MoviesRead, Permission::MoviesWrite];

    assert!(matches!(
        guard.require(&both).await,
        Err(AppError::AuthErr(AuthError::NotPermitted { code: "movies:read", .. }))
    ));

    factory::grant_permission(db, user.id, "movies:read").await?;

    assert_eq!(guard.require(&both).await?.id, user.id);

    Ok(())
}
