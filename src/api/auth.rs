use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

use super::AppState;

/// Middleware enforcing the function-invocation key on keyed routes.
///
/// When a key is configured, requests must carry a matching `code` query
/// parameter, mirroring the invocation-key convention of function hosts.
/// With no key configured the middleware is a no-op.
pub async fn require_function_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.required_key() {
        let provided = request.uri().query().and_then(|q| query_param(q, "code"));
        if provided.as_deref() != Some(expected) {
            return AppError::Unauthorized("missing or invalid function key".to_string())
                .into_response();
        }
    }

    next.run(request).await
}

/// Extracts a single raw query parameter value.
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
