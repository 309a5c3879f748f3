mod cli;
mod transport;
mod user_actions;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use appkit_common::{AppkitError, ConfigError, Event};
use appkit_config::{toml_loader, AppConfig, ReloadManager};
use appkit_runtime::{AppRuntime, ChannelSink, HeadlessHost, OpenOptions};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

fn resolve_config_path(arg: Option<&str>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = arg {
        return Ok(PathBuf::from(path));
    }
    let path = toml_loader::default_config_path()?;
    if !path.exists() {
        toml_loader::create_default_config(&path)?;
    }
    Ok(path)
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| Directive::from(LevelFilter::INFO));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

async fn wait_for_quit(events: &mut broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::QuitRequested) => return,
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}

/// SIGHUP asks for a reload of the `user` actions.
#[cfg(unix)]
fn forward_reload_signal(reload: mpsc::Sender<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(hangups) => hangups,
        Err(e) => {
            warn!(error = %e, "SIGHUP handler unavailable, user action reload disabled");
            return;
        }
    };
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            info!("SIGHUP received, reloading user actions");
            // A full channel already holds a pending reload.
            if let Err(mpsc::error::TrySendError::Closed(())) = reload.try_send(()) {
                return;
            }
        }
    });
}

#[cfg(not(unix))]
fn forward_reload_signal(_reload: mpsc::Sender<()>) {}

async fn run(args: cli::Args) -> Result<(), AppkitError> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    let (mut config, mut config_rx) = ReloadManager::start(config_path.clone()).await;
    info!(path = %config_path.display(), app_id = %config.app.id, "config loaded");

    if args.no_window {
        config.app.open_window_on_startup = false;
    }

    let host = Arc::new(HeadlessHost::new());
    let (sink, outbound) = ChannelSink::new();
    let runtime = AppRuntime::builder(config, host, Arc::new(sink))
        .user_actions(user_actions::modules)
        .build()?;

    let writer = tokio::spawn(transport::write_messages(outbound, tokio::io::stdout()));

    runtime.start()?;
    if let Some(path) = &args.open {
        runtime.windows().open(path, OpenOptions::default())?;
    }

    let config_runtime = Arc::clone(&runtime);
    tokio::spawn(async move {
        while config_rx.changed().await.is_ok() {
            let config: AppConfig = config_rx.borrow_and_update().clone();
            config_runtime.apply_config(config);
        }
    });

    let (reload_tx, reload_rx) = mpsc::channel(1);
    forward_reload_signal(reload_tx);
    tokio::spawn(user_actions::reload_on(Arc::clone(&runtime), reload_rx));

    let mut events = runtime.events().subscribe();
    let reader = transport::read_requests(
        tokio::io::BufReader::new(tokio::io::stdin()),
        Arc::clone(&runtime),
    );

    info!("appkit ready, reading requests from stdin");
    tokio::select! {
        result = reader => match result {
            Ok(count) => info!(count, "stdin closed"),
            Err(e) => error!(error = %e, "stdin transport failed"),
        },
        _ = wait_for_quit(&mut events) => info!("quit requested"),
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    runtime.shutdown();
    writer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let directive = match &args.log_level {
        Some(level) => level.clone(),
        None => args
            .config
            .as_deref()
            .map(|p| appkit_config::load_config_from(Path::new(p)))
            .unwrap_or_else(appkit_config::load_config)
            .map(|c| c.logging.directive())
            .unwrap_or_else(|_| "appkit=info".to_string()),
    };
    init_logging(&directive);

    info!("appkit v{} starting", env!("CARGO_PKG_VERSION"));
    match run(args).await {
        Ok(()) => {
            info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "appkit failed");
            ExitCode::FAILURE
        }
    }
}
