use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{PaginatedResult, RecentRoomList, RoomSummary},
    service::ChatroomService,
    types::{ListRoomsParams, RoomLookupResponse, StatusResponse, UserQuery},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for checking whether an agent exists
///
/// GET /agents/:agent_id/exists
#[instrument(name = "agent_exists", skip(state))]
pub async fn agent_exists(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
) -> Result<Json<StatusResponse>, AppError> {
    let service = ChatroomService::new(Arc::clone(&state.executor));
    let found = service.agent_exists(agent_id).await?;

    Ok(Json(StatusResponse::from(found)))
}

/// HTTP handler for looking up one of the user's rooms
///
/// GET /chatrooms/:chatroom_id?uid=
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(chatroom_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> Result<Json<RoomLookupResponse>, AppError> {
    let service = ChatroomService::new(Arc::clone(&state.executor));
    let lookup = service.get_room(chatroom_id, query.uid).await?;

    Ok(Json(RoomLookupResponse::from(lookup)))
}

/// HTTP handler for the paginated room listing
///
/// GET /chatrooms?page=&page_size=&uid=&name=
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(params): Query<ListRoomsParams>,
) -> Result<Json<PaginatedResult<RoomSummary>>, AppError> {
    info!(page = params.page, page_size = params.page_size, "Listing rooms");

    let service = ChatroomService::new(Arc::clone(&state.executor));
    let rooms = service.list_rooms(params).await?;

    Ok(Json(rooms))
}

/// HTTP handler for the user's recently active rooms other than this one
///
/// GET /chatrooms/:chatroom_id/recent?uid=
#[instrument(name = "list_recent_rooms", skip(state))]
pub async fn list_recent_rooms(
    State(state): State<AppState>,
    Path(chatroom_id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> Result<Json<RecentRoomList>, AppError> {
    let service = ChatroomService::new(Arc::clone(&state.executor));
    let recent = service.list_recent_rooms(chatroom_id, query.uid).await?;

    Ok(Json(recent))
}
