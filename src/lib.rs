// Library crate for the chat room data-access layer
// This file exposes the public API for integration tests

pub mod agent;
pub mod chatroom;
pub mod config;
pub mod db;
pub mod schema;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use chatroom::{ChatroomService, PaginatedResult, RecentRoomList, RoomLookup, RoomSummary};
pub use config::AppConfig;
pub use db::{InMemoryDatabase, PostgresExecutor, QueryExecutor};
pub use shared::{AppError, AppState};
