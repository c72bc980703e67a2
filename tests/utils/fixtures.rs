use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use ::chatrooms::db::{InMemoryDatabase, Row};
use ::chatrooms::schema::{agents, app_runs, apps, chatroom_agent_relation, chatrooms};
use ::chatrooms::ChatroomService;

// ============================================================================
// Seed Records
// ============================================================================

#[derive(Debug, Clone)]
pub struct AppSeed {
    pub id: i64,
    pub name: &'static str,
    pub status: i64,
    pub mode: i64,
}

impl Default for AppSeed {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Round Table",
            status: 1,
            mode: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomSeed {
    pub id: i64,
    pub app_id: i64,
    pub user_id: i64,
    pub status: i64,
}

impl Default for RoomSeed {
    fn default() -> Self {
        Self {
            id: 10,
            app_id: 1,
            user_id: 3,
            status: 1,
        }
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// In-memory database seeded through typed helpers
pub struct Fixture {
    pub db: Arc<InMemoryDatabase>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            db: Arc::new(InMemoryDatabase::new()),
        }
    }

    pub fn service(&self) -> ChatroomService {
        ChatroomService::new(self.db.clone())
    }

    pub async fn add_app(&self, seed: AppSeed) {
        self.db
            .insert(
                apps::TABLE,
                Row::new()
                    .with("id", seed.id)
                    .with("name", seed.name)
                    .with("description", format!("{} description", seed.name))
                    .with("icon", format!("{}.png", seed.id))
                    .with("icon_background", "#ffffff")
                    .with("status", seed.status)
                    .with("mode", seed.mode),
            )
            .await;
    }

    pub async fn add_room(&self, seed: RoomSeed) {
        self.db
            .insert(
                chatrooms::TABLE,
                Row::new()
                    .with("id", seed.id)
                    .with("app_id", seed.app_id)
                    .with("user_id", seed.user_id)
                    .with("status", seed.status)
                    .with("max_round", 10)
                    .with("chat_status", 0)
                    .with("active", 0)
                    .with("smart_selection", 0),
            )
            .await;
    }

    /// Adds `count` visible rooms for `user_id` with ids starting at `first_id`
    pub async fn add_rooms(&self, first_id: i64, count: i64, user_id: i64) {
        for id in first_id..first_id + count {
            self.add_room(RoomSeed {
                id,
                user_id,
                ..RoomSeed::default()
            })
            .await;
        }
    }

    pub async fn add_agent(&self, id: i64, app_id: i64, obligations: &str) {
        self.db
            .insert(
                agents::TABLE,
                Row::new()
                    .with("id", id)
                    .with("app_id", app_id)
                    .with("obligations", obligations),
            )
            .await;
    }

    pub async fn link_agent(&self, link_id: i64, room_id: i64, agent_id: i64) {
        self.db
            .insert(
                chatroom_agent_relation::TABLE,
                Row::new()
                    .with("id", link_id)
                    .with("chatroom_id", room_id)
                    .with("agent_id", agent_id),
            )
            .await;
    }

    pub async fn add_run(&self, room_id: i64, created_time: DateTime<Utc>) {
        self.db
            .insert(
                app_runs::TABLE,
                Row::new()
                    .with("chatroom_id", room_id)
                    .with("created_time", created_time),
            )
            .await;
    }
}

/// Fixed base instant so run ordering is deterministic
pub fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minute)
}
