//! # Fivedraw CLI Library
//!
//! Command-line front end for the five-card draw engine.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments and dispatches to a subcommand, writing to
//! the given streams and returning the process exit code. [`run_with`] does
//! the same with injected input and environment, which is what the tests use.
//!
//! ## Example Usage
//!
//! ```
//! use std::io;
//! let args = vec!["fivedraw", "eval", "--cards", "AS KS QS JS TS"];
//! let code = fivedraw_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Play many hands between agents and print a summary
//! - `play`: Play hands at the terminal against agents
//! - `eval`: Evaluate and compare five-card hands
//! - `cfg`: Show the resolved configuration and its sources

use std::io::{BufRead, Write};

use clap::Parser;

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod stats;
pub mod ui;
pub mod validation;

use cli::{Commands, FivedrawCli};
use commands::{handle_cfg_command, handle_eval_command, handle_play_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "play", "eval", "cfg"];

/// Main entry point for the CLI application.
///
/// Reads interactive input from stdin and configuration variables from the
/// process environment.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let env = |key: &str| std::env::var(key).ok();
    run_with(args, &mut input, out, err, &env)
}

/// [`run`] with explicit input and environment lookup.
pub fn run_with<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
    env: &dyn Fn(&str) -> Option<String>,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match FivedrawCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let outcome = match cli.cmd {
        Commands::Sim(args) => handle_sim_command(&args, out, err, env).map(|_| ()),
        Commands::Play(args) => handle_play_command(&args, input, out, err, env).map(|_| ()),
        Commands::Eval { cards, against } => {
            handle_eval_command(&cards, against.as_deref(), out).map(|_| ())
        }
        Commands::Cfg { config } => handle_cfg_command(config.as_deref(), out, env),
    };

    match outcome {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            let mut write_usage = || -> std::io::Result<()> {
                writeln!(err, "{}", e)?;
                writeln!(err)?;
                writeln!(err, "Fivedraw Poker CLI")?;
                writeln!(err, "Usage: fivedraw <command> [options]\n")?;
                writeln!(err, "Commands:")?;
                for c in COMMANDS {
                    writeln!(err, "  {}", c)?;
                }
                writeln!(err, "\nFor full help, run: fivedraw --help")
            };
            let _ = write_usage();
            exit_code::ERROR
        }
    }
}
