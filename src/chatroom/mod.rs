use axum::{routing::get, Router};

use crate::shared::AppState;

// Public API - what other modules can use
pub use handlers::{agent_exists, get_room, list_recent_rooms, list_rooms};
pub use models::{PaginatedResult, RecentRoomList, RoomLookup, RoomSummary};
pub use service::ChatroomService;

// Internal modules
mod handlers;
pub mod links;
pub mod models;
pub mod repository;
mod service;
pub mod types;

/// Routes served by this module
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agents/:agent_id/exists", get(agent_exists))
        .route("/chatrooms", get(list_rooms))
        .route("/chatrooms/:chatroom_id", get(get_room))
        .route("/chatrooms/:chatroom_id/recent", get(list_recent_rooms))
}
