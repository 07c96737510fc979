use axum::{extract::State, Json};

use crate::{
    model::health::{HealthDto, SystemInfoDto},
    server::state::AppState,
};

pub static HEALTH_TAG: &str = "health";

/// Reports that the server is accepting requests.
#[utoipa::path(
    get,
    path = "/v1/healthcheck",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Server is available", body = HealthDto)
    ),
)]
pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "available".to_string(),
        system_info: SystemInfoDto {
            environment: state.config.env.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
