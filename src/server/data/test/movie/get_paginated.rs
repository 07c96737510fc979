use super::*;

async fn seed(db: &sea_orm::DatabaseConnection) -> Result<(), AppError> {
    factory::movie::MovieFactory::new(db)
        .title("Black Panther")
        .year(2018)
        .runtime(134)
        .genres(&["action", "adventure"])
        .build()
        .await?;
    factory::movie::MovieFactory::new(db)
        .title("Deadpool")
        .year(2016)
        .runtime(108)
        .genres(&["action", "comedy"])
        .build()
        .await?;
    factory::movie::MovieFactory::new(db)
        .title("The Breakfast Club")
        .year(1985)
        .runtime(97)
        .genres(&["drama"])
        .build()
        .await?;
    Ok(())
}

/// Tests the unfiltered list with default sort.
///
/// Expected: every movie, ordered by id, with the total count
#[tokio::test]
async fn lists_all_by_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    seed(db).await?;

    let (movies, total) = MovieRepository::new(db)
        .get_paginated(&MovieFilter::default())
        .await?;

    assert_eq!(total, 3);
    assert_eq!(movies.len(), 3);
    assert!(movies.windows(2).all(|pair| pair[0].id < pair[1].id));

    Ok(())
}

/// Tests title and genre filters together.
///
/// Expected: only movies whose title contains the term and that carry every genre
#[tokio::test]
async fn filters_by_title_and_genres() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    seed(db).await?;

    let repo = MovieRepository::new(db);

    let filter = MovieFilter {
        genres: vec!["action".to_string()],
        ..MovieFilter::default()
    };
    let (movies, total) = repo.get_paginated(&filter).await?;
    assert_eq!(total, 2);
    assert!(movies.iter().all(|m| m.genres.contains(&"action".to_string())));

    let filter = MovieFilter {
        title: "panther".to_string(),
        genres: vec!["action".to_string(), "adventure".to_string()],
        ..MovieFilter::default()
    };
    let (movies, _) = repo.get_paginated(&filter).await?;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Black Panther");

    Ok(())
}

/// Tests filters containing `LIKE` wildcards.
///
/// Expected: `%` and `_` match only themselves
#[tokio::test]
async fn wildcards_in_filters_match_literally() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    seed(db).await?;
    factory::movie::MovieFactory::new(db)
        .title("100% Wolf")
        .genres(&["sci_fi"])
        .build()
        .await?;

    let repo = MovieRepository::new(db);

    let filter = MovieFilter {
        title: "%".to_string(),
        ..MovieFilter::default()
    };
    let (movies, total) = repo.get_paginated(&filter).await?;
    assert_eq!(total, 1);
    assert_eq!(movies[0].title, "100% Wolf");

    let filter = MovieFilter {
        title: "_".to_string(),
        ..MovieFilter::default()
    };
    let (_, total) = repo.get_paginated(&filter).await?;
    assert_eq!(total, 0);

    let filter = MovieFilter {
        genres: vec!["sci_fi".to_string()],
        ..MovieFilter::default()
    };
    let (_, total) = repo.get_paginated(&filter).await?;
    assert_eq!(total, 1);

    let filter = MovieFilter {
        genres: vec!["%".to_string()],
        ..MovieFilter::default()
    };
    let (_, total) = repo.get_paginated(&filter).await?;
    assert_eq!(total, 0);

    Ok(())
}

/// Tests descending sort with a page size smaller than the result set.
///
/// Expected: the second page holds the oldest movie
#[tokio::test]
async fn sorts_and_pages() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_catalogue_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    seed(db).await?;

    let filter = MovieFilter {
        page: 2,
        page_size: 2,
        sort: MovieSort::parse("-year").unwrap(),
        ..MovieFilter::default()
    };
    let (movies, total) = MovieRepository::new(db).get_paginated(&filter).await?;

    assert_eq!(total, 3);
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].year, 1985);

    Ok(())
}
