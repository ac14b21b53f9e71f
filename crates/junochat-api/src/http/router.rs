//! API router configuration.

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{character, chat, message, user};
use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/users", post(user::create_user))
        .route("/users/{id}", get(user::get_user))
        .route(
            "/characters",
            get(character::list_characters).post(character::create_character),
        )
        .route(
            "/characters/{id}",
            get(character::get_character).delete(character::delete_character),
        )
        .route("/chats", get(chat::list_chats).post(chat::create_chat))
        .route("/chats/first", post(chat::open_first_chat))
        .route("/chats/get_chats", post(chat::get_chats_compat))
        .route("/chats/store_message", post(chat::store_message_compat))
        .route("/chats/{id}", get(chat::get_chat).delete(chat::delete_chat))
        .route(
            "/chats/{id}/messages",
            get(message::list_messages).post(message::post_message),
        )
        .route("/messages/{id}", delete(message::delete_message));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
