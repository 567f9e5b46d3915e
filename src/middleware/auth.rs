use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::entities::user::Capabilities;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{verify_token, Claims};
use crate::AppState;

/// Extract and validate the JWT from the Authorization header, landing the
/// session context in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn request_capabilities(request: &Request) -> Capabilities {
    request
        .extensions()
        .get::<Claims>()
        .map(|c| c.role.capabilities())
        .unwrap_or(Capabilities::ANONYMOUS)
}

/// Require a session that can create bookings (renters and owners).
pub async fn require_booker(request: Request, next: Next) -> AppResult<Response> {
    if !request_capabilities(&request).can_book {
        return Err(AppError::Forbidden(
            "Booking requires a renter or owner account".to_string(),
        ));
    }
    Ok(next.run(request).await)
}

/// Require the owner toolset.
pub async fn require_owner(request: Request, next: Next) -> AppResult<Response> {
    if !request_capabilities(&request).owner_tools {
        return Err(AppError::Forbidden("Owner access required".to_string()));
    }
    Ok(next.run(request).await)
}

/// Require the admin toolset.
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    if !request_capabilities(&request).admin_tools {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(next.run(request).await)
}
