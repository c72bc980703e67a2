use serde::{Deserialize, Serialize};

use super::models::{RoomLookup, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Filters and paging for the room listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListRoomsParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub uid: i64,
    /// Substring of the application name; empty means no filter
    #[serde(default)]
    pub name: String,
}

impl Default for ListRoomsParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            uid: 0,
            name: String::new(),
        }
    }
}

/// Query string carrying the calling user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub uid: i64,
}

/// `{ "status": 0|1 }` existence answer
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u8,
}

impl From<bool> for StatusResponse {
    fn from(found: bool) -> Self {
        Self {
            status: found as u8,
        }
    }
}

/// Room lookup as returned to callers; only `status` is set when not found
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomLookupResponse {
    pub status: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_round: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatroom_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_selection: Option<bool>,
}

impl From<RoomLookup> for RoomLookupResponse {
    fn from(lookup: RoomLookup) -> Self {
        match lookup {
            RoomLookup::Found(state) => Self {
                status: 1,
                max_round: Some(state.max_round),
                app_id: Some(state.app_id),
                chatroom_status: Some(state.chatroom_status),
                smart_selection: Some(state.smart_selection),
            },
            RoomLookup::NotFound => Self {
                status: 0,
                max_round: None,
                app_id: None,
                chatroom_status: None,
                smart_selection: None,
            },
        }
    }
}
