use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Environment, SecurityConfig};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full router with global middleware
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().environment, &state.config().security);

    Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/users", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{account, watchlists};

    Router::new()
        // Account management for the authenticated user
        .route("/users/me", delete(account::account_delete))
        .route("/users/me/password", put(account::password_put))
        // Watchlists
        .route("/watchlists", post(watchlists::watchlist_post))
        .route(
            "/watchlists/:list_id",
            get(watchlists::watchlist_get).put(watchlists::watchlist_put),
        )
        .route("/watchlists/:list_id/likes", patch(watchlists::likes_patch))
        .route("/watchlists/:list_id/comments", put(watchlists::comments_put))
        .route(
            "/watchlists/:list_id/comments/:comment_id",
            delete(watchlists::comment_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(environment: Environment, security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
