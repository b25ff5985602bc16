mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::TEXT_REQUIRED_MESSAGE;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::db::Database;

/// Router with permissive CORS, for local use and tests.
pub fn create_router(db: Database) -> Router {
    create_router_with_origins(db, None)
}

/// Router that only answers cross-origin requests from `origins`.
/// `None` allows any origin.
pub fn create_router_with_origins(db: Database, origins: Option<&[String]>) -> Router {
    let api = Router::new()
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/{id}",
            put(handlers::update_todo).delete(handlers::delete_todo),
        );

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins))
        .with_state(db)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
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
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
