use super::*;

/// Tests deleting an existing movie and then deleting it again.
///
/// Expected: true on the first call, false on the second
#[tokio::test]
async fn deletes_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let movie = factory::create_movie(db).await?;
    let repo = MovieRepository::new(db);

    assert!(repo.delete(movie.id).await?);
    assert!(!repo.delete(movie.id).await?);
    assert!(!repo.exists(movie.id).await?);

    Ok(())
}
