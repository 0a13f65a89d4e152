use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use mvi_store::chats::{ChatsAction, ChatsFeature, ChatsState, InMemoryChats};
use mvi_store::config::Config;
use mvi_store::logging::init_tracing;
use mvi_store::{ErrorCode, Lifecycle, RuntimeDispatchers, Store};

/// Load the demo chat list through a store and print every rendered state.
#[derive(Debug, Parser)]
#[command(name = "mvi-store", version)]
struct Cli {
    /// Config file (default: ~/.config/mvi-store/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Publish no-op transitions too
    #[arg(long)]
    publish_every_transition: bool,

    /// Simulated load latency in milliseconds
    #[arg(long)]
    load_delay_ms: Option<u64>,

    /// Make the load fail with a network error
    #[arg(long)]
    fail: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging.filter);

    let dispatchers = RuntimeDispatchers::from_current()
        .context("failed to start foreground thread")?
        .into_shared();

    let mut use_case = InMemoryChats::new(config.demo.chats.clone())
        .with_delay(Duration::from_millis(config.demo.load_delay_ms));
    if cli.fail {
        use_case = use_case.failing(ErrorCode::Network);
    }

    let store = Store::builder(ChatsFeature::new(use_case), dispatchers)
        .config(config.store)
        .build();

    let lifecycle = Lifecycle::new();
    let (rendered_tx, mut rendered) = mpsc::unbounded_channel();
    let renderer = Arc::new(move |state: Arc<ChatsState>| {
        let _ = rendered_tx.send(state);
    });
    store.bind(&renderer, &lifecycle)?;
    store.dispatch_action(ChatsAction::LoadChats);

    while let Some(state) = rendered.recv().await {
        println!("{}", render(&state));
        if !state.chats.is_empty() || state.has_error() {
            break;
        }
    }

    lifecycle.destroy();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.publish_every_transition {
        config.store.publish_every_transition = true;
    }
    if let Some(delay) = cli.load_delay_ms {
        config.demo.load_delay_ms = delay;
    }
}

fn render(state: &ChatsState) -> String {
    match state.error {
        Some(code) => format!("error: {} ({} chats)", code, state.chats.len()),
        None if state.chats.is_empty() => "chats: (none)".to_string(),
        None => format!("chats: {}", state.chats.join(", ")),
    }
}
