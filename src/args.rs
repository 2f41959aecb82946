//! Command-line arguments
//!
//! Parsed by hand; the command set is small enough that a framework
//! would only add weight.

use pwaat_core::ExtractorKind;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: pwaat-suite [COMMAND]

Commands:
  (none)                             Reopen the last workspace if enabled
  new <kind> <root> [--save <file>]  Scaffold a workspace under <root>
  open <file> [--kind <kind>]        Open a workspace file
  check <file>                       Open a workspace and verify its folders
  speakers <file>                    List the speakers of a scenario workspace
  reveal <path>                      Open a file or folder in the OS shell
  prefs [--reopen on|off]            Show or change preferences
  help                               Show this message

Kinds: binary, scenario, cryptography";

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Startup,
    New {
        kind: ExtractorKind,
        root: PathBuf,
        save: Option<PathBuf>,
    },
    Open {
        file: PathBuf,
        kind: Option<ExtractorKind>,
    },
    Check {
        file: PathBuf,
    },
    Speakers {
        file: PathBuf,
    },
    Reveal {
        path: PathBuf,
    },
    Prefs {
        reopen: Option<bool>,
    },
    Help,
}

pub struct Args;

impl Args {
    /// Parse the process arguments
    pub fn parse() -> Result<Command, String> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments without the program name
    pub fn parse_from<I, S>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        let Some(command) = args.next() else {
            return Ok(Command::Startup);
        };

        let mut positional = Vec::new();
        let mut save = None;
        let mut kind = None;
        let mut reopen = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--save" | "-s" => {
                    save = Some(PathBuf::from(value_for(&arg, args.next())?));
                }
                "--kind" | "-k" => {
                    kind = Some(value_for(&arg, args.next())?.parse::<ExtractorKind>()?);
                }
                "--reopen" => {
                    reopen = Some(parse_switch(&value_for(&arg, args.next())?)?);
                }
                _ if arg.starts_with('-') => {
                    return Err(format!("Unknown option: {}", arg));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match command.as_str() {
            "new" => {
                let kind = required(positional.next(), "kind")?.parse()?;
                let root = PathBuf::from(required(positional.next(), "root")?);
                Command::New { kind, root, save }
            }
            "open" => Command::Open {
                file: PathBuf::from(required(positional.next(), "file")?),
                kind,
            },
            "check" => Command::Check {
                file: PathBuf::from(required(positional.next(), "file")?),
            },
            "speakers" => Command::Speakers {
                file: PathBuf::from(required(positional.next(), "file")?),
            },
            "reveal" => Command::Reveal {
                path: PathBuf::from(required(positional.next(), "path")?),
            },
            "prefs" => Command::Prefs { reopen },
            "help" | "--help" | "-h" => Command::Help,
            other => return Err(format!("Unknown command: {}", other)),
        };

        if let Some(extra) = positional.next() {
            return Err(format!("Unexpected argument: {}", extra));
        }

        Ok(command)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{} needs a value", flag))
}

fn required(value: Option<String>, name: &str) -> Result<String, String> {
    value.ok_or_else(|| format!("Missing <{}>", name))
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("Expected on or off, got {}", other)),
    }
}
