use super::*;

/// Tests creating a movie.
///
/// Verifies that a new movie starts at version 1 and that its genres survive the JSON
/// column round trip.
///
/// Expected: Ok with version 1
#[tokio::test]
async fn creates_movie_at_version_one() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MovieRepository::new(db);
    let movie = repo.create(fields("The Matrix")).await?;

    assert_eq!(movie.version, 1);
    assert_eq!(movie.title, "The Matrix");

    let stored = repo.get_by_id(movie.id).await?.unwrap();
    assert_eq!(stored.genres, vec!["action", "sci-fi"]);

    Ok(())
}

/// Tests looking up a movie that does not exist.
///
/// Expected: Ok(None) and `exists` is false
#[tokio::test]
async fn missing_movie_is_none() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MovieRepository::new(db);

    assert!(repo.get_by_id(4242).await?.is_none());
    assert!(!repo.exists(4242).await?);

    Ok(())
}
