//! Operator command parsing for the terminal front end.

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fill the VM form and click `createVmButton`.
    CreateVm { vm_name: String, vm_template: String },
    /// Click `configBackupButton`.
    ConfigBackup,
    /// Click `refreshButton`.
    Refresh,
    /// Print the job table.
    Jobs,
    /// Print the console log.
    Log,
    /// Look up one job by uuid.
    Show { job_uuid: String },
    /// Print each button's enabled state.
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  create-vm <name> <template>  start the create-vm playbook
  backup                       start the config-backup playbook
  refresh                      fetch the job list now
  jobs                         print the job table
  log                          print the console log
  show <uuid>                  print one job
  status                       print control states
  help                         print this help
  quit                         stop the panel";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("create-vm", [name, template]) => Command::CreateVm {
            vm_name: name.to_string(),
            vm_template: template.to_string(),
        },
        ("create-vm", _) => return Err("usage: create-vm <name> <template>".to_string()),
        ("backup", []) => Command::ConfigBackup,
        ("refresh", []) => Command::Refresh,
        ("jobs", []) => Command::Jobs,
        ("log", []) => Command::Log,
        ("show", [uuid]) => Command::Show {
            job_uuid: uuid.to_string(),
        },
        ("show", _) => return Err("usage: show <uuid>".to_string()),
        ("status", []) => Command::Status,
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => return Err(format!("unknown command: {}", line.trim())),
    };

    Ok(Some(command))
}
