use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Header the authenticating proxy sets to the signed-in user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user, present in request extensions only when the proxy vouched for one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Copies the forwarded user id into request extensions
///
/// Requests without the header pass through anonymously; handlers decide
/// whether that is allowed.
pub async fn current_user_middleware(mut request: Request, next: Next) -> Response {
    let user = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| CurrentUser(id.to_string()));

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Unwraps an optional user for endpoints that need one
pub fn require_user(user: Option<CurrentUser>) -> Result<CurrentUser, AppError> {
    user.ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))
}
