//! Movie domain models, parameters and list filters.
//!
//! Movies are the catalogue's mutable resource: every successful write bumps `version` by
//! exactly one, and every update names the version it was based on.

use chrono::{DateTime, Datelike, Utc};

use crate::{
    model::movie::{MetadataDto, MovieDto, MoviesEnvelope},
    server::{
        error::{internal::InternalError, AppError},
        util::validator::{permitted, unique, ValidationErrors},
    },
};

/// A stored movie.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    /// Running time in minutes.
    pub runtime: i32,
    pub genres: Vec<String>,
    /// Starts at 1, incremented by every committed update.
    pub version: i32,
}

impl Movie {
    pub fn into_dto(self) -> MovieDto {
        MovieDto {
            id: self.id,
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres,
            version: self.version,
        }
    }

    /// Converts an entity model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Movie)` - Converted movie
    /// - `Err(AppError::InternalErr(Decode))` - Stored genres are not a JSON string array
    pub fn from_entity(entity: entity::movie::Model) -> Result<Self, AppError> {
        let genres = serde_json::from_str(&entity.genres).map_err(|e| InternalError::Decode {
            column: "movie.genres",
            reason: e.to_string(),
        })?;

        Ok(Self {
            id: entity.id,
            created_at: entity.created_at,
            title: entity.title,
            year: entity.year,
            runtime: entity.runtime,
            genres,
            version: entity.version,
        })
    }

    /// Field values as they currently stand, for merging a partial update.
    pub fn fields(&self) -> MovieFields {
        MovieFields {
            title: self.title.clone(),
            year: self.year,
            runtime: self.runtime,
            genres: Some(self.genres.clone()),
        }
    }
}

/// The caller-editable fields of a movie.
///
/// `genres` is optional only so that an absent list can be reported as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Option<Vec<String>>,
}

impl MovieFields {
    pub fn validate(&self, v: &mut ValidationErrors) {
        v.check(!self.title.is_empty(), "title", "must be provided");
        v.check(
            self.title.len() <= 500,
            "title",
            "must not be more than 500 bytes long",
        );

        v.check(self.year != 0, "year", "must be provided");
        v.check(self.year >= 1888, "year", "must be greater than 1888");
        v.check(
            self.year <= Utc::now().year(),
            "year",
            "must not be in the future",
        );

        v.check(self.runtime != 0, "runtime", "must be provided");
        v.check(self.runtime > 0, "runtime", "must be a positive integer");

        match &self.genres {
            None => v.add("genres", "must be provided"),
            Some(genres) => {
                v.check(!genres.is_empty(), "genres", "must contain at least 1 genre");
                v.check(
                    genres.len() <= 5,
                    "genres",
                    "must not contain more than 5 genres",
                );
                v.check(unique(genres), "genres", "must not contain duplicate values");
            }
        }
    }

    /// Validates and unwraps the genre list.
    pub fn into_valid(self) -> Result<ValidMovieFields, AppError> {
        let mut v = ValidationErrors::new();
        self.validate(&mut v);
        v.finish()?;

        Ok(ValidMovieFields {
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres.unwrap_or_default(),
        })
    }
}

/// Movie fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMovieFields {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    pub genres: Vec<String>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl MoviePatch {
    pub fn apply(self, mut fields: MovieFields) -> MovieFields {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(year) = self.year {
            fields.year = year;
        }
        if let Some(runtime) = self.runtime {
            fields.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            fields.genres = Some(genres);
        }
        fields
    }
}

/// Requires the version a write was based on.
pub fn require_version(version: Option<i32>) -> Result<i32, AppError> {
    let mut v = ValidationErrors::new();
    let Some(version) = version else {
        v.add("version", "must be provided");
        return Err(AppError::ValidationFailed(v));
    };

    v.check(version >= 1, "version", "must be a positive integer");
    v.finish()?;
    Ok(version)
}

/// Columns the list endpoint may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

const SORT_SAFELIST: [&str; 8] = [
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl MovieSort {
    /// Parses a safelisted sort key such as `title` or `-year`.
    pub fn parse(raw: &str) -> Option<Self> {
        if !permitted(&raw, &SORT_SAFELIST) {
            return None;
        }

        let (direction, name) = match raw.strip_prefix('-') {
            Some(name) => (SortDirection::Descending, name),
            None => (SortDirection::Ascending, raw),
        };
        let column = match name {
            "id" => SortColumn::Id,
            "title" => SortColumn::Title,
            "year" => SortColumn::Year,
            "runtime" => SortColumn::Runtime,
            _ => return None,
        };

        Some(Self { column, direction })
    }
}

impl Default for MovieSort {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Ascending,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Filters for the movie list.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive substring match on the title; empty matches everything.
    pub title: String,
    /// Every listed genre must be present on the movie.
    pub genres: Vec<String>,
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
    pub sort: MovieSort,
}

impl MovieFilter {
    /// Builds a filter from raw query values, defaulting absent ones.
    pub fn from_query(
        title: Option<String>,
        genres: Option<String>,
        page: Option<String>,
        page_size: Option<String>,
        sort: Option<String>,
    ) -> Result<Self, AppError> {
        let mut v = ValidationErrors::new();

        let page = read_int(page, 1, "page", &mut v);
        let page_size = read_int(page_size, DEFAULT_PAGE_SIZE, "page_size", &mut v);

        v.check(page > 0, "page", "must be greater than zero");
        v.check(page <= 10_000_000, "page", "must be a maximum of 10 million");
        v.check(page_size > 0, "page_size", "must be greater than zero");
        v.check(page_size <= 100, "page_size", "must be a maximum of 100");

        let sort = match sort.as_deref() {
            None | Some("") => MovieSort::default(),
            Some(raw) => MovieSort::parse(raw).unwrap_or_else(|| {
                v.add("sort", "invalid sort value");
                MovieSort::default()
            }),
        };

        v.finish()?;

        let genres = genres
            .map(|csv| {
                csv.split(',')
                    .map(str::trim)
                    .filter(|genre| !genre.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            title: title.unwrap_or_default(),
            genres,
            page,
            page_size,
            sort,
        })
    }
}

impl Default for MovieFilter {
    fn default() -> Self {
        Self {
            title: String::new(),
            genres: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: MovieSort::default(),
        }
    }
}

fn read_int(raw: Option<String>, default: u64, field: &str, v: &mut ValidationErrors) -> u64 {
    match raw {
        None => default,
        Some(raw) if raw.is_empty() => default,
        Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
            v.add(field, "must be an integer value");
            default
        }),
    }
}

/// Pagination bookkeeping for a page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub current_page: u64,
    pub page_size: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub total_records: u64,
}

impl Metadata {
    /// Empty metadata when nothing matched.
    pub fn calculate(total_records: u64, page: u64, page_size: u64) -> Self {
        if total_records == 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: total_records.div_ceil(page_size),
            total_records,
        }
    }

    pub fn into_dto(self) -> MetadataDto {
        MetadataDto {
            current_page: self.current_page,
            page_size: self.page_size,
            first_page: self.first_page,
            last_page: self.last_page,
            total_records: self.total_records,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedMovies {
    pub movies: Vec<Movie>,
    pub metadata: Metadata,
}

impl PaginatedMovies {
    pub fn into_dto(self) -> MoviesEnvelope {
        MoviesEnvelope {
            movies: self.movies.into_iter().map(Movie::into_dto).collect(),
            metadata: self.metadata.into_dto(),
        }
    }
}
