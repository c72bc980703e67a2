use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentView;
use crate::db::{Row, Value};
use crate::shared::AppError;

/// Application mode marking an app as a chat room template
pub const CHATROOM_MODE: i64 = 5;

/// How many rooms the recent-activity list returns at most
pub const RECENT_ROOM_LIMIT: i64 = 5;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Status column shared by rooms and applications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Inactive = 0,
    Active = 1,
}

impl From<Status> for Value {
    fn from(status: Status) -> Self {
        Value::Int(status as i64)
    }
}

/// State of a single room as needed to start a conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomState {
    pub max_round: i64,
    pub app_id: i64,
    pub chatroom_status: i64,
    pub smart_selection: bool,
}

impl TryFrom<&Row> for RoomState {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            max_round: row.get_i64("max_round")?,
            app_id: row.get_i64("app_id")?,
            chatroom_status: row.get_i64("status")?,
            smart_selection: row.get_bool("smart_selection")?,
        })
    }
}

/// Result of looking up a room for a user
#[derive(Debug, Clone, PartialEq)]
pub enum RoomLookup {
    Found(RoomState),
    /// Room missing, inactive, or owned by someone else
    NotFound,
}

/// One entry of the paginated room listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub chatroom_id: i64,
    pub app_id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_background: String,
    pub chat_status: i64,
    pub active: i64,
    pub chatroom_status: i64,
    pub smart_selection: bool,
    pub agent_list: Vec<AgentView>,
}

impl TryFrom<&Row> for RoomSummary {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            chatroom_id: row.get_i64("chatroom_id")?,
            app_id: row.get_i64("app_id")?,
            name: row.get_string("name")?,
            description: row.get_string("description")?,
            icon: row.get_string("icon")?,
            icon_background: row.get_string("icon_background")?,
            chat_status: row.get_i64("chat_status")?,
            active: row.get_i64("active")?,
            chatroom_status: row.get_i64("chatroom_status")?,
            smart_selection: row.get_bool("smart_selection")?,
            agent_list: Vec::new(),
        })
    }
}

/// One entry of the recent-activity listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRoom {
    pub chatroom_id: i64,
    pub app_id: i64,
    pub name: String,
    pub description: String,
    pub active: i64,
    pub last_run_time: Option<DateTime<Utc>>,
    pub agent_list: Vec<AgentView>,
}

impl TryFrom<&Row> for RecentRoom {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            chatroom_id: row.get_i64("chatroom_id")?,
            app_id: row.get_i64("app_id")?,
            name: row.get_string("name")?,
            description: row.get_string("description")?,
            active: row.get_i64("active")?,
            last_run_time: row.opt_timestamp("last_run_time")?,
            agent_list: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRoomList {
    pub list: Vec<RecentRoom>,
}

/// Row of the `chatroom_agent_relation` table
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAgentLink {
    pub id: i64,
    pub chatroom_id: i64,
    pub agent_id: Option<i64>,
}

impl RoomAgentLink {
    /// Agent id, unless the link is an empty slot (absent or non-positive)
    pub fn assigned_agent(&self) -> Option<i64> {
        self.agent_id.filter(|id| *id > 0)
    }
}

impl TryFrom<&Row> for RoomAgentLink {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get_i64("id")?,
            chatroom_id: row.get_i64("chatroom_id")?,
            agent_id: row.opt_i64("agent_id")?,
        })
    }
}

/// A page of results plus the bookkeeping needed to render pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub list: Vec<T>,
    pub total_count: i64,
    pub total_pages: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> PaginatedResult<T> {
    pub fn new(list: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        Self {
            list,
            total_count,
            total_pages: total_pages(total_count, page_size),
            page,
            page_size,
        }
    }
}

/// `ceil(total_count / page_size)`; callers guarantee `page_size >= 1`
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}
