//! Table and column identifiers used by the repositories.

use crate::db::{Column, GroupedMax, Table};

pub mod chatrooms {
    use super::*;

    pub const TABLE: Table = Table::new("chatrooms");
    pub const ID: Column = TABLE.column("id");
    pub const USER_ID: Column = TABLE.column("user_id");
    pub const APP_ID: Column = TABLE.column("app_id");
    pub const MAX_ROUND: Column = TABLE.column("max_round");
    pub const STATUS: Column = TABLE.column("status");
    pub const CHAT_STATUS: Column = TABLE.column("chat_status");
    pub const ACTIVE: Column = TABLE.column("active");
    pub const SMART_SELECTION: Column = TABLE.column("smart_selection");
}

pub mod apps {
    use super::*;

    pub const TABLE: Table = Table::new("apps");
    pub const ID: Column = TABLE.column("id");
    pub const NAME: Column = TABLE.column("name");
    pub const DESCRIPTION: Column = TABLE.column("description");
    pub const ICON: Column = TABLE.column("icon");
    pub const ICON_BACKGROUND: Column = TABLE.column("icon_background");
    pub const STATUS: Column = TABLE.column("status");
    pub const MODE: Column = TABLE.column("mode");
}

pub mod agents {
    use super::*;

    pub const TABLE: Table = Table::new("agents");
    pub const ID: Column = TABLE.column("id");
    pub const APP_ID: Column = TABLE.column("app_id");
    pub const OBLIGATIONS: Column = TABLE.column("obligations");
}

pub mod chatroom_agent_relation {
    use super::*;

    pub const TABLE: Table = Table::new("chatroom_agent_relation");
    pub const ID: Column = TABLE.column("id");
    pub const CHATROOM_ID: Column = TABLE.column("chatroom_id");
    pub const AGENT_ID: Column = TABLE.column("agent_id");
}

pub mod app_runs {
    use super::*;

    pub const TABLE: Table = Table::new("app_runs");
    pub const CHATROOM_ID: Column = TABLE.column("chatroom_id");
    pub const CREATED_TIME: Column = TABLE.column("created_time");

    /// Latest run per chat room, joined as `last_runs`
    pub const LAST_RUNS: GroupedMax = GroupedMax {
        source: TABLE,
        group_by: "chatroom_id",
        max_of: "created_time",
        max_alias: "last_run_time",
        alias: Table::new("last_runs"),
    };
}
