//! `cclib`: a thin command-line front end over [`cclib::facade::dispatch`] (spec §4.11). Reads
//! one JSON command — from a positional argument, a `--file`, or stdin when neither is given —
//! and prints the dispatched result as JSON, exiting non-zero if the result carries an `"error"`
//! key.

#![forbid(unsafe_code)]

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// CredaCash transaction-construction and verification CLI.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// The JSON command to dispatch, e.g. `{"generate-random": {}}`. Reads from `--file` or
    /// stdin when omitted.
    command: Option<String>,

    /// Read the JSON command from this file instead of the positional argument or stdin.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Optional TOML configuration file (see `cclib::config::Config`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List every verb `dispatch` recognizes and exit.
    #[arg(long)]
    list_verbs: bool,
}

fn read_command(cli: &Cli) -> std::io::Result<String> {
    if let Some(text) = &cli.command {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    if cli.list_verbs {
        for verb in cclib::facade::VERBS {
            println!("{verb}");
        }
        return ExitCode::SUCCESS;
    }

    if let Some(config_path) = &cli.config {
        if let Err(e) = cclib::config::Config::load(Some(config_path)) {
            tracing::error!(%e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    }

    let text = match read_command(&cli) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(%e, "failed to read command");
            return ExitCode::FAILURE;
        }
    };

    let request: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            println!("{}", serde_json::json!({ "error": format!("invalid JSON command: {e}") }));
            return ExitCode::FAILURE;
        }
    };

    let response = cclib::facade::dispatch(request);
    let is_error = response.get("error").is_some();
    println!("{}", serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string()));
    if is_error { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
