use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

use crate::api::error::ApiError;
use crate::auth::{extract_bearer_token, AuthError, AuthService};

/// Resolve the bearer token and attach the caller's `UserSession` to the request
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_bearer_token(auth_header)?;
    let session = auth_service.authenticate(token).await?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// CORS for the single configured browser origin
pub fn cors_layer(client_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(client_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(client_url, "CLIENT_URL is not a valid origin, cross-origin requests disabled");
            layer
        }
    }
}

pub fn security_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    )
}
