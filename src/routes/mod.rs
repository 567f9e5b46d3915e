use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, owner, profile, ratings, renter};
use crate::middleware::auth::{auth_middleware, require_admin, require_booker, require_owner};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Per-user governors for the authenticated route groups
    let booker_governor = create_role_governor(RateLimitedRole::Booker);
    let owner_governor = create_role_governor(RateLimitedRole::Owner);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Public catalog: browse, search, spot details, rating aggregates
    let public_routes = Router::new()
        .route("/spots", get(renter::list_spots))
        .route("/spots/search", get(renter::search_spots))
        .route("/spots/{id}", get(renter::get_spot))
        .route("/users/{id}/rating", get(ratings::get_user_rating));

    // Profile (any authenticated session)
    let profile_routes = Router::new()
        .route("/", get(profile::get_profile))
        .route("/", put(profile::update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Booking workflow (renters and owners)
    let booking_routes = Router::new()
        .route("/", post(renter::create_booking))
        .route("/", get(renter::my_bookings))
        .route("/{id}", delete(renter::cancel_booking))
        .layer(booker_governor.clone())
        .layer(middleware::from_fn(require_booker))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Rating the owner of a booked spot
    let rating_routes = Router::new()
        .route("/", post(renter::rate_owner))
        .layer(booker_governor)
        .layer(middleware::from_fn(require_booker))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Owner tools
    let owner_routes = Router::new()
        .route("/spots", post(owner::create_spot))
        .route("/spots", get(owner::my_spots))
        .route("/bookings", get(owner::spot_bookings))
        .route("/ratings", post(owner::rate_renter))
        .layer(owner_governor)
        .layer(middleware::from_fn(require_owner))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Moderation panel
    let admin_routes = Router::new()
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/{id}", delete(admin::delete_booking))
        .route("/users", get(admin::list_users))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Every group sits behind the IP governor; the per-user governors above
    // stack on top of it for the authenticated groups.
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/ratings", rating_routes)
        .nest("/api/owner", owner_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
        .layer(create_public_governor())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn test_state() -> AppState {
        AppState {
            db: sea_orm::DatabaseConnection::default(),
            config: Config {
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_hours: 1,
                server_host: "127.0.0.1".to_string(),
                server_port: 0,
                admin_email: "admin@example.com".to_string(),
                admin_password: "password".to_string(),
            },
        }
    }

    fn admin_request(addr: SocketAddr) -> Request<Body> {
        let mut request = Request::builder()
            .uri("/api/admin/bookings")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[tokio::test]
    async fn admin_routes_sit_behind_the_ip_governor() {
        let app = create_router(test_state());
        let addr: SocketAddr = "10.1.2.3:55555".parse().unwrap();

        // Burst capacity is 100; these are rejected by the auth layer, not
        // the governor.
        for _ in 0..100 {
            let response = app.clone().oneshot(admin_request(addr)).await.unwrap();
            assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        let throttled = app.clone().oneshot(admin_request(addr)).await.unwrap();
        assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
