//! Workflow configuration: steps, roles, and views.
//!
//! The config is data, not code. It is written once by `clo init` and loaded
//! on every command, so a deployment can rename steps or add work types
//! without a rebuild.
use crate::form::{FieldDef, ViewSet};
use crate::model::{Role, User};
use crate::steps::{Step, StepGraph};
use crate::templates;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_MESSAGE_DISPLAY_MS: u64 = 5000;
/// View used for processes reached through search.
pub const COMPLETE_VIEW: &str = "Complete";
pub const DATA_DIR_ENV: &str = "CLO_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub schema_version: u32,
    #[serde(default = "default_message_display_ms")]
    pub message_display_ms: u64,
    pub steps: Vec<Step>,
    /// Role name to the step names it may act on.
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub views: BTreeMap<String, Vec<FieldDef>>,
}

fn default_message_display_ms() -> u64 {
    DEFAULT_MESSAGE_DISPLAY_MS
}

impl WorkflowConfig {
    pub fn step_graph(&self) -> Result<StepGraph> {
        StepGraph::new(self.steps.clone()).context("build step graph")
    }

    pub fn view_set(&self) -> ViewSet {
        ViewSet::new(&self.views)
    }

    pub fn message_display(&self) -> Duration {
        Duration::from_millis(self.message_display_ms)
    }

    pub fn role(&self, name: &str) -> Result<Role> {
        let permitted_steps = self
            .roles
            .get(name)
            .ok_or_else(|| anyhow!("unknown role {name:?}"))?;
        Ok(Role {
            name: name.to_string(),
            permitted_steps: permitted_steps.clone(),
        })
    }
}

/// Typed paths into a data directory.
#[derive(Debug, Clone)]
pub struct DataDirPaths {
    root: PathBuf,
}

impl DataDirPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join("store.json")
    }
}

/// Resolve the data directory: explicit flag, then `CLO_DATA_DIR`, then the
/// platform data dir.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::data_dir()
        .map(|dir| dir.join("clo-workflow"))
        .ok_or_else(|| anyhow!("no data directory; pass --data-dir or set {DATA_DIR_ENV}"))
}

/// The config shipped with the binary.
pub fn default_config() -> Result<WorkflowConfig> {
    serde_json::from_str(templates::WORKFLOW_CONFIG_JSON).context("parse default workflow config")
}

#[derive(Debug, Deserialize)]
struct UserTemplate {
    #[serde(rename = "Id")]
    id: String,
    name: String,
    roles: Vec<String>,
}

/// Seed users with their role names resolved against `config`.
pub fn default_users(config: &WorkflowConfig) -> Result<Vec<User>> {
    let templates: Vec<UserTemplate> =
        serde_json::from_str(templates::USERS_JSON).context("parse default users")?;
    templates
        .into_iter()
        .map(|template| {
            let roles = template
                .roles
                .iter()
                .map(|name| config.role(name))
                .collect::<Result<Vec<_>>>()?;
            Ok(User {
                id: template.id,
                name: template.name,
                roles,
            })
        })
        .collect()
}

pub fn load_config(paths: &DataDirPaths) -> Result<WorkflowConfig> {
    let path = paths.config_path();
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: WorkflowConfig =
        serde_json::from_slice(&bytes).context("parse workflow config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

pub fn write_config(paths: &DataDirPaths, config: &WorkflowConfig) -> Result<()> {
    let path = paths.config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create data dir")?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize workflow config")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Validate schema version, step ordering, and cross references.
pub fn validate_config(config: &WorkflowConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported workflow config schema_version {}",
            config.schema_version
        ));
    }
    if config.steps.is_empty() {
        return Err(anyhow!("steps must be non-empty"));
    }

    let mut names = BTreeSet::new();
    let mut order_ids: Vec<u32> = Vec::new();
    for step in &config.steps {
        if step.name.trim().is_empty() {
            return Err(anyhow!("step names must be non-empty"));
        }
        if !names.insert(step.name.as_str()) {
            return Err(anyhow!("duplicate step name {:?}", step.name));
        }
        if !config.views.contains_key(&step.view) {
            return Err(anyhow!(
                "step {:?} uses unknown view {:?}",
                step.name,
                step.view
            ));
        }
        order_ids.push(step.order_id);
    }
    order_ids.sort_unstable();
    for pair in order_ids.windows(2) {
        if pair[0] == pair[1] {
            return Err(anyhow!("duplicate step orderId {}", pair[0]));
        }
        if pair[1] != pair[0] + 1 {
            return Err(anyhow!(
                "step orderIds must be contiguous (gap after {})",
                pair[0]
            ));
        }
    }

    for (role, steps) in &config.roles {
        if let Some(unknown) = steps.iter().find(|step| !names.contains(step.as_str())) {
            return Err(anyhow!("role {role:?} permits unknown step {unknown:?}"));
        }
    }
    if !config.views.contains_key(COMPLETE_VIEW) {
        return Err(anyhow!("views must include {COMPLETE_VIEW:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PROJECT_TYPES, WORK_TYPES};

    #[test]
    fn default_config_is_valid_and_covers_every_type() {
        let config = default_config().expect("parse default config");
        validate_config(&config).expect("default config validates");
        let views = config.view_set();
        for name in WORK_TYPES.iter().chain(PROJECT_TYPES) {
            assert!(views.contains(name), "missing view for {name}");
        }
        let graph = config.step_graph().expect("graph");
        assert_eq!(graph.first_step().map(|step| step.name.as_str()), Some("Intake"));
        assert_eq!(config.message_display(), Duration::from_millis(5000));
    }

    #[test]
    fn default_users_resolve_role_steps() {
        let config = default_config().expect("parse default config");
        let users = default_users(&config).expect("resolve users");
        let coordinator = users.iter().find(|user| user.id == "e1").expect("e1");
        assert_eq!(coordinator.permitted_steps(), vec!["Intake", "Billing"]);
        let client = users.iter().find(|user| user.id == "c1").expect("c1");
        assert!(!client.is_employee());
    }

    #[test]
    fn validation_rejects_gaps_unknown_views_and_unknown_role_steps() {
        let base = default_config().expect("parse default config");

        let mut gap = base.clone();
        gap.steps[4].order_id = 9;
        assert!(validate_config(&gap)
            .unwrap_err()
            .to_string()
            .contains("contiguous"));

        let mut view = base.clone();
        view.steps[0].view = "Missing".to_string();
        assert!(validate_config(&view)
            .unwrap_err()
            .to_string()
            .contains("unknown view"));

        let mut role = base.clone();
        role.roles
            .insert("Auditor".to_string(), vec!["Audit".to_string()]);
        assert!(validate_config(&role)
            .unwrap_err()
            .to_string()
            .contains("unknown step"));

        let mut version = base;
        version.schema_version = 2;
        assert!(validate_config(&version).is_err());
    }

    #[test]
    fn config_round_trips_through_the_data_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = DataDirPaths::new(dir.path().join("nested"));
        let config = default_config().expect("parse default config");
        write_config(&paths, &config).expect("write config");
        assert_eq!(load_config(&paths).expect("load config"), config);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let explicit = Path::new("/tmp/clo-explicit");
        assert_eq!(
            resolve_data_dir(Some(explicit)).expect("resolve"),
            explicit.to_path_buf()
        );
    }
}
