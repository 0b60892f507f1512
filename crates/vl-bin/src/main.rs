//! vimline entrypoint: replay a key script against a seeded buffer.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod replay;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimline", version, about = "Replay vim-style keys against a text buffer")]
struct Args {
    /// Configuration file (overrides discovery of `vimline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Initial buffer content. Empty when omitted.
    #[arg(long = "text")]
    text: Option<PathBuf>,
    /// Key script: one token per line. Read from stdin when omitted.
    #[arg(long = "keys")]
    keys: Option<PathBuf>,
    /// Write logs to this file instead of stderr.
    #[arg(long = "log")]
    log: Option<PathBuf>,
}

fn configure_logging(log: Option<&Path>) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().map_or_else(|| "vimline.log".into(), |n| n.to_owned());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .ok()
                .map(|()| guard)
        }
        None => {
            // Global subscriber may already be installed; nothing to keep alive then.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

fn read_input(path: Option<&Path>, what: &str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {what} {}", path.display())),
        None => Ok(String::new()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log.as_deref());

    let config = core_config::load_from(args.config.clone())?;
    let text = read_input(args.text.as_deref(), "text")?;
    let script = match args.keys.as_deref() {
        Some(path) => read_input(Some(path), "keys")?,
        None => std::io::read_to_string(std::io::stdin()).context("reading keys from stdin")?,
    };
    let tokens = replay::parse_keys(&script);
    info!(target: "runtime", tokens = tokens.len(), config = args.config.is_some(), "replay_start");

    let report = replay::run(config.editor(), &text, &tokens);
    println!("{}", report.value);
    eprintln!("{}", report.summary);
    info!(target: "runtime", submits = report.submits, "replay_done");
    Ok(())
}
