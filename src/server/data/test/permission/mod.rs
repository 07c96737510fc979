use crate::server::data::permission::PermissionRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

/// Tests reading the codes granted to a user.
///
/// Expected: exactly the granted codes; another user's grants are not included
#[tokio::test]
async fn reads_granted_codes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let reader = factory::user::UserFactory::new(db)
        .permissions(&["movies:read"])
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .permissions(&["movies:read", "movies:write"])
        .build()
        .await?;

    let codes = PermissionRepository::new(db).codes_for_user(reader.id).await?;

    assert_eq!(codes, vec!["movies:read".to_string()]);

    Ok(())
}

/// Tests a user with no grants.
///
/// Expected: an empty list
#[tokio::test]
async fn user_without_grants_has_no_codes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let codes = PermissionRepository::new(db).codes_for_user(user.id).await?;

    assert!(codes.is_empty());

    Ok(())
}

/// Tests granting codes by name.
///
/// Expected: known codes granted, unknown codes skipped
#[tokio::test]
async fn adds_known_codes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::permission::find_or_create_permission(db, "movies:read").await?;
    factory::permission::find_or_create_permission(db, "movies:write").await?;
    let user = factory::create_user(db).await?;

    let repo = PermissionRepository::new(db);
    repo.add_for_user(user.id, &["movies:read", "movies:delete"])
        .await?;

    let codes = repo.codes_for_user(user.id).await?;
    assert_eq!(codes, vec!["movies:read".to_string()]);

    Ok(())
}
