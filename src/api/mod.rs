// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod users;

use poem::http::Method;
use poem::middleware::{Cors, SetHeader, Tracing};
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use poem_openapi::error::{AuthorizationError, ParseParamError, ParseRequestPayloadError};
use std::sync::Arc;

pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use permissions::PermissionApi;
pub use roles::RoleApi;
pub use users::UserApi;

use crate::app_data::AppData;
use crate::auth::PolicyGate;
use crate::config::ServerSettings;
use crate::errors::ApiError;

/// OpenAPI service with every endpoint, mounted under `/api`
pub fn build_routes(app_data: Arc<AppData>, server_url: &str) -> Route {
    let gate = Arc::new(PolicyGate::new(app_data.token_service.clone()));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(app_data.clone(), gate.clone()),
            UserApi::new(app_data.clone(), gate.clone()),
            RoleApi::new(app_data.clone(), gate.clone()),
            PermissionApi::new(app_data, gate),
        ),
        "Gatekeeper API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}

/// Full application: routes plus CORS, security headers and request tracing
///
/// Errors raised by poem-openapi before a handler runs (missing bearer token,
/// undecodable body, unparseable path parameter) are rendered as `ApiError`.
pub fn build_app(app_data: Arc<AppData>, settings: &ServerSettings) -> impl Endpoint {
    let server_url = format!("http://{}/api", settings.bind_address());

    let cors = settings
        .cors_allowed_origins
        .iter()
        .fold(Cors::new(), |cors, origin| cors.allow_origin(origin.as_str()))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(["authorization", "content-type"])
        .allow_credentials(true);

    let security_headers = SetHeader::new()
        .overriding("X-Content-Type-Options", "nosniff")
        .overriding("X-Frame-Options", "DENY")
        .overriding("Referrer-Policy", "no-referrer");

    build_routes(app_data, &server_url)
        .catch_error(|err: AuthorizationError| async move { ApiError::from_authorization_error(err) })
        .catch_error(|err: ParseRequestPayloadError| async move { ApiError::from_payload_error(err) })
        .catch_error(|err: ParseParamError| async move { ApiError::from_param_error(err) })
        .with(cors)
        .with(security_headers)
        .with(Tracing)
}
