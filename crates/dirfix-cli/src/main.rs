//! dirfix command-line front end.
//!
//! Reads an HTML file, runs the direction engine over it, optionally
//! replays a stream of JSON commands, and prints the transformed markup.
//!
//! ```text
//! dirfix [--host=HOST] [--mode=auto|manual] [--settings=FILE]
//!        [--commands=FILE] [--out=FILE] INPUT.html
//! ```

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dirfix_dom::Document;
use dirfix_engine::{Engine, Notification, Notifier};
use dirfix_settings::{FileStore, MemoryStore, Mode, SettingsStore};

struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        info!(?notification, "notification for control surface");
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    host: Option<String>,
    mode: Option<Mode>,
    settings: Option<String>,
    commands: Option<String>,
    out: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        if let Some(host) = arg.strip_prefix("--host=") {
            args.host = Some(host.to_string());
        } else if let Some(mode) = arg.strip_prefix("--mode=") {
            args.mode = Some(mode.parse().map_err(|err: String| anyhow::anyhow!(err))?);
        } else if let Some(path) = arg.strip_prefix("--settings=") {
            args.settings = Some(path.to_string());
        } else if let Some(path) = arg.strip_prefix("--commands=") {
            args.commands = Some(path.to_string());
        } else if let Some(path) = arg.strip_prefix("--out=") {
            args.out = Some(path.to_string());
        } else if arg.starts_with("--") {
            bail!("unknown flag '{arg}'");
        } else if args.input.is_none() {
            args.input = Some(arg);
        } else {
            bail!("unexpected argument '{arg}'");
        }
    }
    Ok(args)
}

fn run<S: SettingsStore>(store: S, args: &Args) -> Result<()> {
    if let Some(mode) = args.mode {
        store
            .set_mode(mode)
            .context("failed to store requested mode")?;
    }

    let input = args.input.as_deref().context("missing input file")?;
    let html = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read HTML file '{input}'"))?;
    let mut doc = Document::parse_html(&html, args.host.as_deref())
        .context("failed to parse input document")?;

    let mut engine = Engine::with_notifier(store, Box::new(LogNotifier));
    engine
        .bootstrap(&mut doc)
        .context("initial pass failed")?;

    if let Some(commands) = &args.commands {
        let script = std::fs::read_to_string(commands)
            .with_context(|| format!("failed to read command file '{commands}'"))?;
        for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
            engine.handle_command_json(&mut doc, line);
            engine.pump(&mut doc).context("mutation batch failed")?;
        }
    }
    engine.pump(&mut doc).context("mutation batch failed")?;

    let output = doc.to_html();
    match &args.out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write output '{path}'"))?,
        None => println!("{output}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    match &args.settings {
        Some(path) => run(FileStore::new(path), &args),
        None => run(MemoryStore::new(), &args),
    }
}
