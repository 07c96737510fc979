use super::*;

/// Tests an update presenting the current version.
///
/// Expected: Applied with version bumped by exactly one
#[tokio::test]
async fn applies_when_version_matches() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let movie = factory::create_movie(db).await?;
    let repo = MovieRepository::new(db);

    let outcome = repo
        .update_if_version(movie.id, movie.version, fields("Renamed"))
        .await?;

    let ConditionalUpdate::Applied(updated) = outcome else {
        panic!("expected the update to apply");
    };
    assert_eq!(updated.version, movie.version + 1);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.created_at, movie.created_at);

    Ok(())
}

/// Tests an update presenting a stale version.
///
/// Expected: ZeroAffected and the stored movie untouched
#[tokio::test]
async fn stale_version_affects_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let movie = factory::movie::MovieFactory::new(db)
        .title("Original")
        .build()
        .await?;
    let repo = MovieRepository::new(db);

    repo.update_if_version(movie.id, 1, fields("First")).await?;
    let outcome = repo.update_if_version(movie.id, 1, fields("Second")).await?;

    assert_eq!(outcome, ConditionalUpdate::ZeroAffected);
    let stored = repo.get_by_id(movie.id).await?.unwrap();
    assert_eq!(stored.title, "First");
    assert_eq!(stored.version, 2);

    Ok(())
}

/// Tests an update against a movie that does not exist.
///
/// Expected: ZeroAffected
#[tokio::test]
async fn missing_movie_affects_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let outcome = MovieRepository::new(db)
        .update_if_version(999, 1, fields("Ghost"))
        .await?;

    assert_eq!(outcome, ConditionalUpdate::ZeroAffected);

    Ok(())
}

/// Tests an update claiming the last representable version.
///
/// Expected: ZeroAffected and the stored movie untouched
#[tokio::test]
async fn last_representable_version_affects_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let movie = factory::movie::MovieFactory::new(db)
        .title("Original")
        .build()
        .await?;
    let repo = MovieRepository::new(db);

    let outcome = repo
        .update_if_version(movie.id, i32::MAX, fields("Overflow"))
        .await?;

    assert_eq!(outcome, ConditionalUpdate::ZeroAffected);
    let stored = repo.get_by_id(movie.id).await?.unwrap();
    assert_eq!(stored.title, "Original");
    assert_eq!(stored.version, 1);

    Ok(())
}

/// Tests two concurrent updates based on the same observed version.
///
/// Expected: exactly one applies at v+1, the other affects nothing, the stored movie
/// ends at v+1
#[tokio::test]
async fn concurrent_updates_from_same_version_commit_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let movie = factory::create_movie(db).await?;
    let id = movie.id;
    let observed = movie.version;

    let first_db = db.clone();
    let second_db = db.clone();
    let first = tokio::spawn(async move {
        MovieRepository::new(&first_db)
            .update_if_version(id, observed, fields("Writer A"))
            .await
    });
    let second = tokio::spawn(async move {
        MovieRepository::new(&second_db)
            .update_if_version(id, observed, fields("Writer B"))
            .await
    });

    let outcomes = [first.await.unwrap()?, second.await.unwrap()?];

    let applied: Vec<_> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            ConditionalUpdate::Applied(movie) => Some(movie),
            ConditionalUpdate::ZeroAffected => None,
        })
        .collect();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].version, observed + 1);

    let stored = MovieRepository::new(db).get_by_id(id).await?.unwrap();
    assert_eq!(stored.version, observed + 1);
    assert_eq!(stored.title, applied[0].title);

    Ok(())
}
