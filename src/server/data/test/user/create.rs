use super::*;

fn params(email: &str) -> CreateUserParams {
    CreateUserParams {
        name: "Alice".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        activated: false,
    }
}

/// Tests creating a user and finding it by email.
///
/// Expected: Ok with an unactivated user at version 1
#[tokio::test]
async fn creates_and_finds_by_email() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let created = repo.create(params("alice@example.com")).await?;

    assert_eq!(created.version, 1);
    assert!(!created.activated);

    let found = repo.find_by_email("alice@example.com").await?.unwrap();
    assert_eq!(found.id, created.id);
    assert!(repo.find_by_email("bob@example.com").await?.is_none());

    Ok(())
}

/// Tests inserting a second user with an email already taken.
///
/// Expected: Err carrying a unique constraint violation
#[tokio::test]
async fn duplicate_email_is_a_unique_violation() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .email("taken@example.com")
        .build()
        .await?;

    let err = UserRepository::new(db)
        .create(params("taken@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));

    Ok(())
}
