use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    links::RoomAgentLinkRepository,
    models::{PaginatedResult, RecentRoomList, RoomLookup, RoomSummary, RECENT_ROOM_LIMIT},
    repository::ChatroomRepository,
    types::ListRoomsParams,
};
use crate::agent::{AgentRepository, AgentView};
use crate::db::QueryExecutor;
use crate::shared::AppError;

/// Service assembling chat room views from the entity repositories
pub struct ChatroomService {
    rooms: ChatroomRepository,
    links: RoomAgentLinkRepository,
    agents: AgentRepository,
}

impl ChatroomService {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            rooms: ChatroomRepository::new(Arc::clone(&executor)),
            links: RoomAgentLinkRepository::new(Arc::clone(&executor)),
            agents: AgentRepository::new(executor),
        }
    }

    #[instrument(skip(self))]
    pub async fn agent_exists(&self, agent_id: i64) -> Result<bool, AppError> {
        validate_id("agent_id", agent_id)?;
        self.agents.exists(agent_id).await
    }

    /// Looks up an active room owned by `user_id`. A missing room is
    /// reported as [`RoomLookup::NotFound`], not as an error.
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: i64, user_id: i64) -> Result<RoomLookup, AppError> {
        validate_id("chatroom_id", room_id)?;
        validate_id("uid", user_id)?;

        match self.rooms.find_active(room_id, user_id).await? {
            Some(state) => Ok(RoomLookup::Found(state)),
            None => {
                debug!(room_id, user_id, "Room not found for user");
                Ok(RoomLookup::NotFound)
            }
        }
    }

    /// Lists the user's visible rooms page by page, each with its agents
    #[instrument(skip(self))]
    pub async fn list_rooms(
        &self,
        params: ListRoomsParams,
    ) -> Result<PaginatedResult<RoomSummary>, AppError> {
        let offset = validate_paging(params.page, params.page_size)?;
        validate_id("uid", params.uid)?;

        let total_count = self.rooms.count_visible(params.uid, &params.name).await?;
        let mut list = self
            .rooms
            .page_visible(params.uid, &params.name, params.page_size, offset)
            .await?;

        for room in &mut list {
            room.agent_list = self.hydrate_agents(room.chatroom_id).await?;
        }

        info!(
            user_id = params.uid,
            page = params.page,
            total_count,
            room_count = list.len(),
            "Rooms listed successfully"
        );

        Ok(PaginatedResult::new(
            list,
            total_count,
            params.page,
            params.page_size,
        ))
    }

    /// Up to five of the user's rooms with the latest runs, skipping
    /// `exclude_room_id`. Data store failures are returned, not hidden.
    #[instrument(skip(self))]
    pub async fn list_recent_rooms(
        &self,
        exclude_room_id: i64,
        user_id: i64,
    ) -> Result<RecentRoomList, AppError> {
        validate_id("chatroom_id", exclude_room_id)?;
        validate_id("uid", user_id)?;

        let mut list = self
            .rooms
            .recent_visible(user_id, exclude_room_id, RECENT_ROOM_LIMIT)
            .await?;

        for room in &mut list {
            room.agent_list = self.hydrate_agents(room.chatroom_id).await?;
        }

        info!(
            user_id,
            exclude_room_id,
            room_count = list.len(),
            "Recent rooms listed successfully"
        );

        Ok(RecentRoomList { list })
    }

    /// Agents attached to a room in link order (newest link first). Empty
    /// slots are skipped, as are links to agents that no longer exist.
    #[instrument(skip(self))]
    pub async fn hydrate_agents(&self, room_id: i64) -> Result<Vec<AgentView>, AppError> {
        let links = self.links.links_for_room(room_id).await?;
        let mut agents = Vec::with_capacity(links.len());

        for link in links {
            let Some(agent_id) = link.assigned_agent() else {
                continue;
            };
            match self.agents.find_view(agent_id).await? {
                Some(agent) => agents.push(agent),
                None => {
                    warn!(room_id, agent_id, link_id = link.id, "Linked agent does not exist")
                }
            }
        }

        Ok(agents)
    }
}

fn validate_id(field: &str, value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::ValidationError(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Returns the row offset for `page`
fn validate_paging(page: i64, page_size: i64) -> Result<i64, AppError> {
    if page < 1 {
        return Err(AppError::ValidationError(format!(
            "page must be at least 1, got {}",
            page
        )));
    }
    if page_size < 1 {
        return Err(AppError::ValidationError(format!(
            "page_size must be at least 1, got {}",
            page_size
        )));
    }
    (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| AppError::ValidationError("page is out of range".to_string()))
}
