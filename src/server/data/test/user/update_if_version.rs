use super::*;

/// Tests activating a user at its current version.
///
/// Expected: Applied with version 2 and activated set
#[tokio::test]
async fn applies_when_version_matches() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = factory::create_user(db).await?;
    let repo = UserRepository::new(db);
    let mut user = User::from_entity(entity);
    user.activated = true;

    let ConditionalUpdate::Applied(updated) = repo.update_if_version(user).await? else {
        panic!("expected the update to apply");
    };

    assert!(updated.activated);
    assert_eq!(updated.version, 2);

    Ok(())
}

/// Tests writing a user snapshot that another writer already replaced.
///
/// Expected: ZeroAffected and the stored user keeps the first write
#[tokio::test]
async fn stale_snapshot_affects_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = factory::create_user(db).await?;
    let repo = UserRepository::new(db);
    let snapshot = User::from_entity(entity.clone());

    let mut first = snapshot.clone();
    first.name = "First".to_string();
    repo.update_if_version(first).await?;

    let mut second = snapshot;
    second.name = "Second".to_string();
    let outcome = repo.update_if_version(second).await?;

    assert_eq!(outcome, ConditionalUpdate::ZeroAffected);
    let stored = repo.find_by_email(&entity.email).await?.unwrap();
    assert_eq!(stored.name, "First");
    assert_eq!(stored.version, 2);

    Ok(())
}

/// Tests a snapshot claiming the last representable version.
///
/// Expected: ZeroAffected without touching the stored user
#[tokio::test]
async fn last_representable_version_affects_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let entity = factory::create_user(db).await?;
    let repo = UserRepository::new(db);
    let mut user = User::from_entity(entity.clone());
    user.version = i32::MAX;
    user.activated = true;

    let outcome = repo.update_if_version(user).await?;

    assert_eq!(outcome, ConditionalUpdate::ZeroAffected);
    let stored = repo.find_by_email(&entity.email).await?.unwrap();
    assert!(!stored.activated);
    assert_eq!(stored.version, 1);

    Ok(())
}
