use axum::{extract::Extension, response::Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::User;

#[derive(ToSchema, Serialize, Debug)]
pub struct Whoami {
    id: Uuid,
    username: String,
}

#[utoipa::path(
    get,
    path = "/v1/whoami",
    responses(
        (status = 200, description = "Credentials admitted", body = Whoami, content_type = "application/json"),
        (status = 400, description = "Malformed Authorization header"),
        (status = 401, description = "Missing, unknown or wrong credentials"),
        (status = 500, description = "Credentials could not be checked")
    ),
    security(("basic" = [])),
    tag = "auth"
)]
// axum handler for the admitted principal
pub async fn whoami(Extension(user): Extension<User>) -> Json<Whoami> {
    Json(Whoami {
        id: user.id,
        username: user.username,
    })
}
