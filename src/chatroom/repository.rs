use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{RecentRoom, RoomState, RoomSummary, Status, CHATROOM_MODE};
use crate::db::{Aggregate, Condition, Direction, QueryExecutor, Row, Select};
use crate::schema::{app_runs, apps, chatrooms};
use crate::shared::AppError;

/// Conditions every listed room must meet: room and application active,
/// application in chat room mode, owned by `user_id`.
pub fn visible_room_conditions(user_id: i64, name_filter: &str) -> Vec<Condition> {
    let mut conditions = vec![
        Condition::eq(chatrooms::STATUS, Status::Active),
        Condition::eq(apps::STATUS, Status::Active),
        Condition::eq(apps::MODE, CHATROOM_MODE),
        Condition::eq(chatrooms::USER_ID, user_id),
    ];
    if !name_filter.is_empty() {
        conditions.push(Condition::contains(apps::NAME, name_filter));
    }
    conditions
}

/// Typed lookups over the `chatrooms` table and its application
pub struct ChatroomRepository {
    executor: Arc<dyn QueryExecutor>,
}

impl ChatroomRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Active room owned by `user_id`
    #[instrument(skip(self))]
    pub async fn find_active(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<Option<RoomState>, AppError> {
        let query = Select::from(chatrooms::TABLE)
            .columns([
                chatrooms::ID,
                chatrooms::MAX_ROUND,
                chatrooms::APP_ID,
                chatrooms::STATUS,
                chatrooms::SMART_SELECTION,
            ])
            .filter(Condition::eq(chatrooms::ID, room_id))
            .filter(Condition::eq(chatrooms::USER_ID, user_id))
            .filter(Condition::eq(chatrooms::STATUS, Status::Active));

        let row = self.executor.select_one(&query).await?;
        debug!(room_id, user_id, found = row.is_some(), "Fetched room");
        row.as_ref().map(RoomState::try_from).transpose()
    }

    #[instrument(skip(self))]
    pub async fn count_visible(&self, user_id: i64, name_filter: &str) -> Result<i64, AppError> {
        let query = Select::from(chatrooms::TABLE)
            .aggregate(Aggregate::Count, chatrooms::ID)
            .left_join(apps::TABLE, chatrooms::APP_ID, apps::ID)
            .filters(visible_room_conditions(user_id, name_filter));

        let total = match self.executor.select_one(&query).await? {
            Some(row) => row.get_i64("count_id")?,
            None => 0,
        };
        debug!(user_id, total, "Counted visible rooms");
        Ok(total)
    }

    /// One page of visible rooms, newest room first. `agent_list` is left empty.
    #[instrument(skip(self))]
    pub async fn page_visible(
        &self,
        user_id: i64,
        name_filter: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RoomSummary>, AppError> {
        let query = Select::from(chatrooms::TABLE)
            .column(apps::NAME)
            .column(apps::DESCRIPTION)
            .column(apps::ICON)
            .column(apps::ICON_BACKGROUND)
            .column_as(apps::ID, "app_id")
            .column_as(chatrooms::ID, "chatroom_id")
            .column(chatrooms::CHAT_STATUS)
            .column(chatrooms::ACTIVE)
            .column_as(chatrooms::STATUS, "chatroom_status")
            .column(chatrooms::SMART_SELECTION)
            .left_join(apps::TABLE, chatrooms::APP_ID, apps::ID)
            .filters(visible_room_conditions(user_id, name_filter))
            .order_by(chatrooms::ID, Direction::Desc)
            .limit(limit)
            .offset(offset);

        decode_all(self.executor.select(&query).await?)
    }

    /// Visible rooms other than `exclude_room_id`, most recently run first
    #[instrument(skip(self))]
    pub async fn recent_visible(
        &self,
        user_id: i64,
        exclude_room_id: i64,
        limit: i64,
    ) -> Result<Vec<RecentRoom>, AppError> {
        let last_runs = app_runs::LAST_RUNS;
        let query = Select::from(chatrooms::TABLE)
            .column(apps::NAME)
            .column(apps::DESCRIPTION)
            .column_as(chatrooms::ID, "chatroom_id")
            .column(chatrooms::ACTIVE)
            .column_as(apps::ID, "app_id")
            .column(last_runs.max_column())
            .inner_join(apps::TABLE, chatrooms::APP_ID, apps::ID)
            .inner_join_grouped_max(last_runs, chatrooms::ID)
            .filters(visible_room_conditions(user_id, ""))
            .filter(Condition::ne(chatrooms::ID, exclude_room_id))
            .order_by(last_runs.max_column(), Direction::Desc)
            .limit(limit);

        decode_all(self.executor.select(&query).await?)
    }
}

fn decode_all<T>(rows: Vec<Row>) -> Result<Vec<T>, AppError>
where
    T: for<'a> TryFrom<&'a Row, Error = AppError>,
{
    rows.iter().map(T::try_from).collect()
}
