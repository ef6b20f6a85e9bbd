pub const WORKFLOW_CONFIG_JSON: &str = include_str!("../templates/workflow_config.json");
pub const USERS_JSON: &str = include_str!("../templates/users.json");
