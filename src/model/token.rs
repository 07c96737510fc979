use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAuthTokenDto {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A freshly issued token. The plaintext is only ever shown here.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct AuthTokenDto {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct AuthTokenEnvelope {
    pub authentication_token: AuthTokenDto,
}
