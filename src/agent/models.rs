use serde::{Deserialize, Serialize};

use crate::db::Row;
use crate::shared::AppError;

/// Agent joined with its owning application, as listed under a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub agent_id: i64,
    pub app_id: i64,
    pub obligations: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub icon_background: String,
}

impl TryFrom<&Row> for AgentView {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            agent_id: row.get_i64("agent_id")?,
            app_id: row.get_i64("app_id")?,
            obligations: row.get_string("obligations")?,
            name: row.get_string("name")?,
            description: row.get_string("description")?,
            icon: row.get_string("icon")?,
            icon_background: row.get_string("icon_background")?,
        })
    }
}
