use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use lendbook_core::Identity;

use crate::context::IdentityContext;

/// Header carrying the opaque identity issued by the external session
/// provider. The value is trusted as-is; authenticating it is the provider's
/// job, not ours.
pub const IDENTITY_HEADER: &str = "x-lendbook-identity";

pub async fn identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let identity = extract_identity(req.headers())?;

    req.extensions_mut().insert(IdentityContext::new(identity));

    Ok(next.run(req).await)
}

fn extract_identity(headers: &HeaderMap) -> Result<Identity, StatusCode> {
    let header = headers
        .get(IDENTITY_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let raw = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    Identity::new(raw).map_err(|_| StatusCode::UNAUTHORIZED)
}
