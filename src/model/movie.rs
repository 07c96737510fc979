use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub year: i32,
    #[serde(
        serialize_with = "serialize_runtime",
        deserialize_with = "deserialize_runtime"
    )]
    #[schema(value_type = String, example = "102 mins")]
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

/// Body of `POST /v1/movies`. Missing fields default so validation can name them.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, deserialize_with = "deserialize_runtime")]
    #[schema(value_type = String, example = "102 mins")]
    pub runtime: i32,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

/// Body of `PATCH /v1/movies/{id}`. Absent fields keep their stored value.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovieDto {
    pub title: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_runtime")]
    #[schema(value_type = Option<String>, example = "102 mins")]
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
    /// Version from the representation the caller last read.
    pub version: Option<i32>,
}

/// Body of `PUT /v1/movies/{id}`. Replaces every field.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReplaceMovieDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, deserialize_with = "deserialize_runtime")]
    #[schema(value_type = String, example = "102 mins")]
    pub runtime: i32,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    pub version: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MovieEnvelope {
    pub movie: MovieDto,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, ToSchema)]
pub struct MetadataDto {
    pub current_page: u64,
    pub page_size: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub total_records: u64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MoviesEnvelope {
    pub movies: Vec<MovieDto>,
    pub metadata: MetadataDto,
}

/// Runtime is exchanged as `"<minutes> mins"`.
fn serialize_runtime<S>(value: &i32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{} mins", value))
}

fn deserialize_runtime<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = String::deserialize(deserializer)?;
    parse_runtime(&value).ok_or_else(|| D::Error::custom("invalid runtime format"))
}

fn deserialize_optional_runtime<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_runtime(deserializer).map(Some)
}

fn parse_runtime(value: &str) -> Option<i32> {
    let (minutes, unit) = value.split_once(' ')?;
    if unit != "mins" {
        return None;
    }
    minutes.parse::<i32>().ok()
}
