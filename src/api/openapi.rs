use super::handlers::{health, whoami};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    paths(health::health, whoami::whoami),
    modifiers(&BasicSecurity),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Endpoints gated by HTTP Basic credentials")
    )
)]
struct ApiDoc;

/// Registers the `basic` HTTP security scheme referenced by gated paths.
struct BasicSecurity;

impl Modify for BasicSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
