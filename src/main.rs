// SPDX-FileCopyrightText: 2026 Praxis Contributors
// SPDX-License-Identifier: MIT

//! Praxis CLI entrypoint.
//!
//! Runs the interactive TUI. Session state persists to a JSON file
//! (`praxis-state.json` in the working directory by default) and is restored
//! on the next start.

use std::error::Error;

use praxis::api::{ApiClient, DEFAULT_BASE_URL};
use praxis::store::{AppStore, StateFile, WriteDurability, DEFAULT_STATE_FILE};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<state-file>] [--api <base-url>] [--durable-writes]\n  {program} [--state <file>] [--api <base-url>] [--durable-writes]\n  {program} --ephemeral [--api <base-url>]\n\nIf state-file/--state is omitted, ./{DEFAULT_STATE_FILE} is used.\n--ephemeral keeps the session in memory only and cannot be combined with state-file/--state.\n--api overrides the backend base URL (default {DEFAULT_BASE_URL}).\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    state_file: Option<String>,
    api_base: Option<String>,
    ephemeral: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--state" => {
                if options.state_file.is_some() {
                    return Err(());
                }
                let file = args.next().ok_or(())?;
                options.state_file = Some(file);
            }
            "--api" => {
                if options.api_base.is_some() {
                    return Err(());
                }
                let base = args.next().ok_or(())?;
                options.api_base = Some(base);
            }
            "--ephemeral" => {
                if options.ephemeral {
                    return Err(());
                }
                options.ephemeral = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.state_file.is_some() {
                    return Err(());
                }
                options.state_file = Some(arg);
            }
        }
    }

    if options.ephemeral && options.state_file.is_some() {
        return Err(());
    }

    if options.ephemeral && options.durable_writes {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "praxis".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let state_file = if options.ephemeral {
            StateFile::detached()
        } else {
            let path = options.state_file.unwrap_or_else(|| DEFAULT_STATE_FILE.to_owned());
            let state_file = StateFile::new(path);
            if options.durable_writes {
                state_file.with_durability(WriteDurability::Durable)
            } else {
                state_file
            }
        };

        let api = ApiClient::new(options.api_base.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()))?;
        let store = AppStore::new(state_file);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async move {
            let fetch_handle = tokio::runtime::Handle::current();
            let tui_join = tokio::task::spawn_blocking(move || {
                praxis::tui::run(store, api, fetch_handle).map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("praxis: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_state_flag() {
        let options = parse_options(["--state".to_owned(), "some/state.json".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.state_file.as_deref(), Some("some/state.json"));
        assert!(!options.ephemeral);
    }

    #[test]
    fn parses_positional_state_file() {
        let options =
            parse_options(["some/state.json".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.state_file.as_deref(), Some("some/state.json"));
    }

    #[test]
    fn parses_api_base() {
        let options = parse_options(["--api".to_owned(), "http://localhost:3999".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.api_base.as_deref(), Some("http://localhost:3999"));
    }

    #[test]
    fn parses_ephemeral_and_durable_writes() {
        let options = parse_options(["--ephemeral".to_owned()].into_iter()).expect("parse options");
        assert!(options.ephemeral);

        let options =
            parse_options(["--durable-writes".to_owned()].into_iter()).expect("parse options");
        assert!(options.durable_writes);
    }

    #[test]
    fn rejects_ephemeral_with_state_file() {
        parse_options(["--ephemeral".to_owned(), "--state".to_owned(), "s.json".to_owned()].into_iter())
            .unwrap_err();
        parse_options(["--ephemeral".to_owned(), "s.json".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_ephemeral_with_durable_writes() {
        parse_options(["--ephemeral".to_owned(), "--durable-writes".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(["--ephemeral".to_owned(), "--ephemeral".to_owned()].into_iter())
            .unwrap_err();
        parse_options(
            ["--state".to_owned(), "a".to_owned(), "--state".to_owned(), "b".to_owned()]
                .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_state_files() {
        parse_options(["one.json".to_owned(), "two.json".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_values() {
        parse_options(["--state".to_owned()].into_iter()).unwrap_err();
        parse_options(["--api".to_owned()].into_iter()).unwrap_err();
    }
}
