//! Control binder: wires the panel's named controls to their actions.
//!
//! [`Panel::bind`] creates the console log, job table and controls,
//! builds one [`ActionSubmitter`] per playbook button, binds the refresh
//! button to the poller's manual refresh and starts the poller.

use std::sync::{Arc, Mutex, PoisonError};

use autolab_client::api::JobApi;
use autolab_client::error::ApiError;
use autolab_client::poller::{JobPoller, PollerHandle};
use autolab_client::submitter::{ActionSubmitter, Dispatch};
use autolab_core::console::LogSink;
use autolab_core::controls::{
    Button, ControlHandle, TextInput, CONFIG_BACKUP_BUTTON, CREATE_VM_BUTTON, REFRESH_BUTTON,
    VM_NAME_INPUT, VM_TEMPLATE_INPUT,
};
use autolab_core::jobs::JobStatusRecord;
use autolab_core::playbooks::{self, create_vm_request};
use autolab_core::table::{JobRow, JobTable, TableView};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PanelConfig;
use crate::display::OperatorConsole;

/// The bound panel. Owns every piece of operator-visible state.
pub struct Panel {
    api: Arc<dyn JobApi>,
    console: Arc<OperatorConsole>,
    table: Arc<Mutex<JobTable>>,
    vm_name_input: Arc<TextInput>,
    vm_template_input: Arc<TextInput>,
    create_vm_button: Arc<Button>,
    config_backup_button: Arc<Button>,
    refresh_button: Arc<Button>,
    create_vm: Arc<ActionSubmitter>,
    config_backup: Arc<ActionSubmitter>,
    poller: PollerHandle,
    cancel: CancellationToken,
}

impl Panel {
    /// Build the controls, bind them and start polling.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(api: Arc<dyn JobApi>, config: &PanelConfig) -> Self {
        let console = Arc::new(OperatorConsole::new(config.echo_console));
        let table = Arc::new(Mutex::new(JobTable::new()));
        let vm_name_input = Arc::new(TextInput::new(VM_NAME_INPUT));
        let vm_template_input = Arc::new(TextInput::new(VM_TEMPLATE_INPUT));
        let create_vm_button = Arc::new(Button::new(CREATE_VM_BUTTON));
        let config_backup_button = Arc::new(Button::new(CONFIG_BACKUP_BUTTON));
        let refresh_button = Arc::new(Button::new(REFRESH_BUTTON));

        let name = Arc::clone(&vm_name_input);
        let template = Arc::clone(&vm_template_input);
        let create_vm = Arc::new(
            ActionSubmitter::new(
                Arc::clone(&api),
                playbooks::CREATE_VM,
                Arc::clone(&create_vm_button) as Arc<dyn ControlHandle>,
                Arc::clone(&console) as Arc<dyn LogSink>,
            )
            .with_payload(move || create_vm_request(&name.value(), &template.value()).map(Some)),
        );

        let config_backup = Arc::new(ActionSubmitter::new(
            Arc::clone(&api),
            playbooks::CONFIG_BACKUP,
            Arc::clone(&config_backup_button) as Arc<dyn ControlHandle>,
            Arc::clone(&console) as Arc<dyn LogSink>,
        ));

        let cancel = CancellationToken::new();
        let poller = JobPoller::new(Arc::clone(&api), Arc::clone(&table) as Arc<dyn TableView>)
            .with_interval(config.poll_interval)
            .start(cancel.child_token());

        tracing::info!(
            create_vm = create_vm.playbook(),
            config_backup = config_backup.playbook(),
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            "Panel controls bound"
        );

        Self {
            api,
            console,
            table,
            vm_name_input,
            vm_template_input,
            create_vm_button,
            config_backup_button,
            refresh_button,
            create_vm,
            config_backup,
            poller,
            cancel,
        }
    }

    // ---- controls ----

    /// Type into `vmNameInput` and `vmTemplateInput`.
    pub fn fill_vm_form(&self, vm_name: &str, vm_template: &str) {
        self.vm_name_input.set_value(vm_name);
        self.vm_template_input.set_value(vm_template);
    }

    /// Click `createVmButton`.
    pub fn click_create_vm(&self) -> Dispatch {
        self.create_vm.dispatch()
    }

    /// Click `configBackupButton`.
    pub fn click_config_backup(&self) -> Dispatch {
        self.config_backup.dispatch()
    }

    /// Click `refreshButton`. Returns `None` if the button is disabled.
    pub fn click_refresh(&self) -> Option<JoinHandle<()>> {
        if !self.refresh_button.is_enabled() {
            return None;
        }
        Some(self.poller.manual_refresh())
    }

    /// Click `refreshButton` and wait for the fetch to finish.
    ///
    /// Returns `false` if the button is disabled. A fetch task that dies
    /// is logged and counts as finished.
    pub async fn refresh(&self) -> bool {
        let Some(task) = self.click_refresh() else {
            return false;
        };
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Job list refresh task failed");
        }
        true
    }

    /// Look up a single job.
    pub async fn show_job(&self, job_uuid: &str) -> Result<JobStatusRecord, ApiError> {
        self.api.get_job(job_uuid).await
    }

    // ---- views ----

    /// Accumulated `consoleLog` text.
    pub fn console_text(&self) -> String {
        self.console.text()
    }

    /// `consoleLog` entries in append order.
    pub fn console_lines(&self) -> Vec<String> {
        self.console.lines()
    }

    /// Current `jobsTable` rows.
    pub fn table_rows(&self) -> Vec<JobRow> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows()
            .to_vec()
    }

    /// Enabled state of every button, in display order.
    pub fn control_states(&self) -> Vec<(&str, bool)> {
        [
            &self.create_vm_button,
            &self.config_backup_button,
            &self.refresh_button,
        ]
        .into_iter()
        .map(|b| (b.name(), b.is_enabled()))
        .collect()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Stop the poller. In-flight submissions are left to finish.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down panel");
        self.cancel.cancel();
        self.poller.stop().await;
    }
}
