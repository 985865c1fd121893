//! Playbooks exposed by the runner and their parameter names.

use crate::error::CoreError;
use crate::jobs::JobRequest;

/// Provisions a virtual machine from a template.
pub const CREATE_VM: &str = "create-vm.yml";

/// Backs up network device configurations. Takes no parameters.
pub const CONFIG_BACKUP: &str = "config-backup.yml";

pub const PARAM_VM_NAME: &str = "vm_name";
pub const PARAM_VM_TEMPLATE: &str = "vm_template";

/// Build the `create-vm.yml` request from the operator's form values.
///
/// Both values are trimmed and must be non-empty.
pub fn create_vm_request(vm_name: &str, vm_template: &str) -> Result<JobRequest, CoreError> {
    let vm_name = vm_name.trim();
    let vm_template = vm_template.trim();

    if vm_name.is_empty() {
        return Err(CoreError::Validation("VM name must not be empty".to_string()));
    }
    if vm_template.is_empty() {
        return Err(CoreError::Validation(
            "VM template must not be empty".to_string(),
        ));
    }

    Ok(JobRequest::new()
        .with(PARAM_VM_NAME, vm_name)
        .with(PARAM_VM_TEMPLATE, vm_template))
}
