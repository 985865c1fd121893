//! `autolab-panel` -- terminal control panel for the Autolab runner.
//!
//! Starts the job poller against the runner API and reads operator
//! commands from stdin. Console log lines are printed as they are
//! appended; diagnostics go to stderr.
//!
//! # Environment variables
//!
//! | Variable           | Required | Default                 | Description                    |
//! |--------------------|----------|-------------------------|--------------------------------|
//! | `AUTOLAB_API_URL`  | no       | `http://localhost:8000` | Runner origin                  |
//! | `POLL_INTERVAL_MS` | no       | `5000`                  | Delay between job list fetches |
//! | `ECHO_CONSOLE`     | no       | `true`                  | Print console lines as they arrive |

use std::sync::Arc;

use autolab_client::api::AutolabApi;
use autolab_client::submitter::Dispatch;
use autolab_panel::binder::Panel;
use autolab_panel::commands::{self, Command, HELP};
use autolab_panel::config::PanelConfig;
use autolab_panel::display;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autolab_panel=info,autolab_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PanelConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(api_url = %config.api_url, "Loaded panel configuration");

    let api = Arc::new(AutolabApi::new(&config.api_url));
    let panel = Panel::bind(api, &config);

    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => run_command(&panel, command).await,
            Ok(None) => {}
            Err(usage) => println!("{usage}"),
        }
    }

    panel.shutdown().await;
}

async fn run_command(panel: &Panel, command: Command) {
    match command {
        Command::CreateVm {
            vm_name,
            vm_template,
        } => {
            panel.fill_vm_form(&vm_name, &vm_template);
            report_click("Create VM", panel.click_create_vm());
        }
        Command::ConfigBackup => report_click("Config backup", panel.click_config_backup()),
        Command::Refresh => {
            if panel.refresh().await {
                print!("{}", display::format_table(&panel.table_rows()));
            }
        }
        Command::Jobs => print!("{}", display::format_table(&panel.table_rows())),
        Command::Log => print!("{}", display::format_console(&panel.console_lines())),
        Command::Show { job_uuid } => match panel.show_job(&job_uuid).await {
            Ok(record) => println!("{}", display::format_record(&record)),
            Err(e) => println!("Lookup failed: {e}"),
        },
        Command::Status => {
            for (name, enabled) in panel.control_states() {
                println!("{name}: {}", if enabled { "enabled" } else { "disabled" });
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// Tell the operator when a click did nothing. Outcomes of accepted
/// clicks arrive on the console log.
fn report_click(label: &str, dispatch: Dispatch) {
    if matches!(dispatch, Dispatch::Ignored) {
        println!("{label} is already running");
    }
}
