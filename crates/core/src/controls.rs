//! Operator controls: buttons with an enabled flag and text inputs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Control names as seen by the operator.
pub const VM_NAME_INPUT: &str = "vmNameInput";
pub const VM_TEMPLATE_INPUT: &str = "vmTemplateInput";
pub const CREATE_VM_BUTTON: &str = "createVmButton";
pub const CONFIG_BACKUP_BUTTON: &str = "configBackupButton";
pub const REFRESH_BUTTON: &str = "refreshButton";

/// A control whose enabled state can be toggled.
pub trait ControlHandle: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

/// A clickable control. Starts enabled.
#[derive(Debug)]
pub struct Button {
    name: &'static str,
    enabled: AtomicBool,
}

impl Button {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: AtomicBool::new(true),
        }
    }
}

impl ControlHandle for Button {
    fn name(&self) -> &str {
        self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::trace!(control = self.name, enabled, "Control state changed");
    }
}

/// A single-line text control.
#[derive(Debug)]
pub struct TextInput {
    name: &'static str,
    value: Mutex<String>,
}

impl TextInput {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: Mutex::new(String::new()),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Current value.
    pub fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}
