use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::AgentView;
use crate::db::{Condition, QueryExecutor, Select};
use crate::schema::{agents, apps};
use crate::shared::AppError;

/// Typed lookups over the `agents` table
pub struct AgentRepository {
    executor: Arc<dyn QueryExecutor>,
}

impl AgentRepository {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Checks for the agent's row without loading any of its fields
    #[instrument(skip(self))]
    pub async fn exists(&self, agent_id: i64) -> Result<bool, AppError> {
        let query = Select::from(agents::TABLE)
            .column(agents::ID)
            .filter(Condition::eq(agents::ID, agent_id));

        let found = self.executor.select_one(&query).await?.is_some();
        debug!(agent_id, found, "Checked agent existence");
        Ok(found)
    }

    /// Loads the agent together with its application's display fields
    #[instrument(skip(self))]
    pub async fn find_view(&self, agent_id: i64) -> Result<Option<AgentView>, AppError> {
        let query = Select::from(agents::TABLE)
            .column_as(agents::ID, "agent_id")
            .column(agents::APP_ID)
            .column(agents::OBLIGATIONS)
            .column(apps::NAME)
            .column(apps::DESCRIPTION)
            .column(apps::ICON)
            .column(apps::ICON_BACKGROUND)
            .left_join(apps::TABLE, apps::ID, agents::APP_ID)
            .filter(Condition::eq(agents::ID, agent_id));

        match self.executor.select_one(&query).await? {
            Some(row) => Ok(Some(AgentView::try_from(&row)?)),
            None => {
                debug!(agent_id, "Agent not found");
                Ok(None)
            }
        }
    }
}
