use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::RoomAgentLink;
use crate::db::{Condition, Direction, QueryExecutor, Select};
use crate::schema::chatroom_agent_relation;
use crate::shared::AppError;

/// Lookups over the room ↔ agent association table
pub struct RoomAgentLinkRepository {
    executor: Arc<dyn QueryExecutor>,
}

impl RoomAgentLinkRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// All links of a room, most recently attached first
    #[instrument(skip(self))]
    pub async fn links_for_room(&self, room_id: i64) -> Result<Vec<RoomAgentLink>, AppError> {
        let query = Select::from(chatroom_agent_relation::TABLE)
            .columns([
                chatroom_agent_relation::ID,
                chatroom_agent_relation::CHATROOM_ID,
                chatroom_agent_relation::AGENT_ID,
            ])
            .filter(Condition::eq(chatroom_agent_relation::CHATROOM_ID, room_id))
            .order_by(chatroom_agent_relation::ID, Direction::Desc);

        let rows = self.executor.select(&query).await?;
        debug!(room_id, link_count = rows.len(), "Fetched room agent links");
        rows.iter().map(RoomAgentLink::try_from).collect()
    }
}
