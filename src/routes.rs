// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{self, auth, quiz, result},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, optional_auth_middleware},
};

/// Builds the CORS layer. With no configured origins any origin is allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quiz, result).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database handle, Config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/profile", get(auth::profile))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    // Reads are public, writes check for an admin viewer in the handler.
    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let result_routes = Router::new()
        .route("/leaderboard/{quiz_id}", get(result::get_leaderboard))
        // Protected result routes
        .merge(
            Router::new()
                .route("/submit/{quiz_id}", post(result::submit_quiz))
                .route("/user/{user_id}", get(result::get_user_results))
                .route("/report/{result_id}", get(result::get_result_report))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .merge(
            Router::new()
                .route("/quiz/{quiz_id}", get(result::get_quiz_results))
                // Double middleware protection: Auth first, then Admin check
                .layer(middleware::from_fn(admin_middleware))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    Router::new()
        .route("/", get(handlers::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/result", result_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
