//! PWAAT Extractor Suite - headless workspace manager
//!
//! Drives the workspace engine from the command line. Pickers are answered
//! from the arguments, dialogs go to stderr, and the OS shell opens paths.

mod args;
mod terminal;

use anyhow::Context;
use args::{Args, Command, USAGE};
use pwaat_core::{
    ExtractorKind, Ports, PreferencesStorage, WorkspaceConfig, WorkspaceSession, WorkspaceStore,
};
use std::path::Path;
use std::sync::{Arc, Once};
use terminal::{ArgumentPicker, OsLauncher, StderrDialog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once; logs go to stderr so stdout stays clean
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG")
                    .unwrap_or_else(|_| "pwaat_suite=info,pwaat_core=info".into()),
            ))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    });
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let command = match Args::parse() {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };

    if !run(command)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Execute one command. `Ok(false)` means the operation failed and the
/// user has already been told why.
fn run(command: Command) -> anyhow::Result<bool> {
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(true);
    }

    let storage = PreferencesStorage::new().context("Failed to locate the settings directory")?;
    tracing::debug!(path = %storage.settings_path().display(), "Using settings file");

    let picker = Arc::new(ArgumentPicker::default());
    let ports = Ports::new(picker.clone(), Arc::new(StderrDialog), Arc::new(OsLauncher));
    let session = WorkspaceSession::new(WorkspaceStore::new(storage), ports);

    let ok = match command {
        Command::Startup => match session.reopen_last_workspace() {
            Some(kind) => {
                println!("Reopened {} workspace", kind);
                print_summary(&session);
                true
            }
            None => {
                println!("No workspace reopened");
                true
            }
        },

        Command::New { kind, root, save } => {
            picker.answer(root);
            if session.new_workspace(kind).is_none() {
                return Ok(false);
            }
            if let Some(file) = save {
                picker.answer(file);
                if !session.save() {
                    return Ok(false);
                }
            }
            print_summary(&session);
            true
        }

        Command::Open { file, kind } => {
            picker.answer(file);
            let opened = session.open_workspace(kind).is_some();
            if opened {
                print_summary(&session);
            }
            opened
        }

        Command::Check { file } => match session.inspect_workspace(&file, None) {
            Some(config) => {
                print_directories(&config);
                let valid = config.is_valid();
                if valid {
                    println!("All workspace folders exist");
                } else {
                    eprintln!("Some workspace folders are missing");
                }
                valid
            }
            None => false,
        },

        Command::Speakers { file } => {
            match session.inspect_workspace(&file, Some(ExtractorKind::Scenario)) {
                Some(config) => {
                    if let Some(scenario) = config.as_scenario() {
                        for entry in scenario.speaker_definitions.sorted() {
                            println!("{:>5}  {}", entry.id, entry.name);
                        }
                    }
                    true
                }
                None => false,
            }
        }

        Command::Reveal { path } => session.open_in_shell(&path),

        Command::Prefs { reopen } => {
            if let Some(enabled) = reopen {
                if !session.set_reopen_on_startup(enabled) {
                    return Ok(false);
                }
            }
            let preferences = session.load_preferences();
            println!(
                "Open last workspace on startup: {}",
                if preferences.open_last_workspace_on_startup {
                    "on"
                } else {
                    "off"
                }
            );
            match preferences.last_opened_workspace() {
                Some(path) => println!("Last opened workspace: {}", path.display()),
                None => println!("Last opened workspace: (none)"),
            }
            true
        }

        Command::Help => true,
    };

    Ok(ok)
}

fn print_summary(session: &WorkspaceSession) {
    println!("{}", session.title());
    if let Some(config) = session.current() {
        print_directories(&config);
    }
}

fn print_directories(config: &WorkspaceConfig) {
    println!("Kind: {}", config.kind());
    for (name, path) in config.directories() {
        println!("  {:<28}{}{}", name, path.display(), missing_marker(path));
    }
    if let Some(scenario) = config.as_scenario() {
        println!(
            "  {:<28}{} ({} speakers)",
            "Speaker Definitions",
            scenario.speaker_definition_path.display(),
            scenario.speaker_definitions.len()
        );
    }
}

fn missing_marker(path: &Path) -> &'static str {
    if path.is_dir() {
        ""
    } else {
        "  (missing)"
    }
}
