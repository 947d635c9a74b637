use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use keycuts_core::action::Payload;
use keycuts_core::config::{self, Settings};
use keycuts_core::environment::ToolEnvironment;
use keycuts_core::error::Result;
use keycuts_core::finder::FzfFinder;
use keycuts_core::selection::SelectionLoop;
use keycuts_core::usage::UsageStore;
use keycuts_core::vault::RbwVault;
use log::{debug, info};

use crate::cli_args::Args;
use crate::console::TerminalConsole;

mod cli_args;
mod console;
mod output;

/// Load the settings file and apply the command-line overrides
fn initialize_settings(args: &Args) -> Result<Settings> {
    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{}`", config_path);

    Ok(args.apply(Settings::load(&config_path)?))
}

fn select(args: &Args, settings: &Settings) -> Result<Option<Payload>> {
    let environment = ToolEnvironment::from_process(&settings.expanded_search_path());
    let store = UsageStore::new(settings.expanded_usage_path());
    debug!("Usage history: `{}`", store.path().display());

    let mut selection = SelectionLoop::new(
        RbwVault::new(&settings.vault_command, environment.clone()),
        FzfFinder::new(&settings.finder_command, environment),
        TerminalConsole::stdio(),
        store,
    )
    .with_top_n(settings.top_n)
    .with_folder(args.folder.clone())
    .with_finder_height(settings.finder_height.clone());

    selection.run()
}

fn execute(args: &Args) -> Result<()> {
    let settings = initialize_settings(args)?;

    match select(args, &settings)? {
        Some(payload) => output::write_payload(&mut stdout(), &payload, args.output),
        None => {
            info!("No credential selected");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_terminal() => {
            // The finder usually runs in a window that closes on exit
            TerminalConsole::stdio().show_error(&e.to_string());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
