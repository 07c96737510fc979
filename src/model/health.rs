use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SystemInfoDto {
    pub environment: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthDto {
    pub status: String,
    pub system_info: SystemInfoDto,
}
