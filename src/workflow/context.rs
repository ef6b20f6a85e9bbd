use super::surfaced;
use crate::cli::DataDirArgs;
use crate::client::ClientStore;
use crate::config::{load_config, resolve_data_dir, DataDirPaths, WorkflowConfig};
use crate::form::ViewSet;
use crate::model::{RequestElement, User};
use crate::service::{DataService, JsonFileService};
use crate::steps::StepGraph;
use crate::store::{SelectionOrigin, WorkflowStore};
use anyhow::{anyhow, Context, Result};

/// A loaded data directory: config, step graph, and views.
pub(crate) struct SessionContext {
    pub(crate) paths: DataDirPaths,
    pub(crate) config: WorkflowConfig,
    pub(crate) steps: StepGraph,
    pub(crate) views: ViewSet,
}

impl SessionContext {
    pub(crate) fn load(data: &DataDirArgs) -> Result<Self> {
        let paths = DataDirPaths::new(resolve_data_dir(data.data_dir.as_deref())?);
        if !paths.config_path().is_file() {
            return Err(anyhow!(
                "missing config at {} (run `clo init --data-dir {}` first)",
                paths.config_path().display(),
                paths.root().display()
            ));
        }
        let config = load_config(&paths)?;
        let steps = config.step_graph()?;
        let views = config.view_set();
        tracing::debug!(root = %paths.root().display(), "data dir loaded");
        Ok(Self {
            paths,
            config,
            steps,
            views,
        })
    }

    fn service(&self) -> JsonFileService {
        JsonFileService::new(self.paths.store_path())
    }

    fn user(&self, service: &JsonFileService, user_id: &str) -> Result<User> {
        service
            .fetch_user(user_id)
            .with_context(|| format!("load user {user_id}"))
    }

    /// A processor session with its active caches loaded.
    pub(crate) fn processor(&self, user_id: &str) -> Result<WorkflowStore<JsonFileService>> {
        let service = self.service();
        let user = self.user(&service, user_id)?;
        if !user.is_employee() {
            return Err(anyhow!(
                "user {user_id} has no workflow steps (use `clo client ...`)"
            ));
        }
        let mut store = WorkflowStore::new(
            service,
            self.steps.clone(),
            self.views.clone(),
            user,
            self.config.message_display(),
        );
        let result = store.init();
        surfaced(result, store.last_message())?;
        Ok(store)
    }

    pub(crate) fn client(&self, user_id: &str) -> Result<ClientStore<JsonFileService>> {
        let service = self.service();
        let user = self.user(&service, user_id)?;
        if user.is_employee() {
            return Err(anyhow!(
                "user {user_id} is a processor (use `clo dashboard`)"
            ));
        }
        let mut store = ClientStore::new(
            service,
            self.steps.clone(),
            self.views.clone(),
            user,
            self.config.message_display(),
        );
        let result = store.init();
        surfaced(result, store.last_message())?;
        Ok(store)
    }
}

/// Select a process the way the dashboard would: from its step's queue when
/// it is active for this user, otherwise as a read-only search result.
pub(crate) fn open_process(
    store: &mut WorkflowStore<JsonFileService>,
    process_id: u32,
) -> Result<()> {
    let active_step = store
        .active()
        .and_then(|active| active.processes.get(&process_id.to_string()))
        .and_then(RequestElement::step);
    let result = match active_step {
        Some(step) => store
            .select_focus_step(&step)
            .and_then(|()| store.select_process(process_id, SelectionOrigin::Active)),
        None => store
            .search_processes("")
            .and_then(|_| store.select_process(process_id, SelectionOrigin::Searched)),
    };
    surfaced(result, store.last_message()).with_context(|| format!("open process {process_id}"))
}
