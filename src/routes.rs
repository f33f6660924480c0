use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, careers::careers_handler,
        catalog::catalog_handler, chat::chat_handler, contact::contact_handler,
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/careers", careers_handler())
        .nest("/chat", chat_handler().layer(middleware::from_fn(auth)))
        .nest("/contact", contact_handler())
        .nest("/catalog", catalog_handler())
        .nest("/admin", admin_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
