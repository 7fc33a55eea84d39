use anyhow::{Context, Result};
use clap::Parser;
use loqa_interpreter::config::DEFAULT_CONFIG_PATH;
use loqa_interpreter::{
    create_router, AppState, Config, EventSourceFactory, EventSourceKind, LogSink, NatsClient,
    NatsSpeechSink, OutputSink, SessionController, StopReason,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Live speech-to-speech translation
#[derive(Debug, Parser)]
#[command(name = "loqa-interpreter", version)]
struct Args {
    /// Config file (defaults to config/loqa-interpreter.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay recognition events from a JSON-lines script instead of NATS
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log translations instead of speaking them
    #[arg(long)]
    dry_run: bool,

    /// Do not start the HTTP control API
    #[arg(long)]
    no_http: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load_file(path)?,
        None => Config::load(DEFAULT_CONFIG_PATH)?,
    };

    info!("Loqa Interpreter v{}", env!("CARGO_PKG_VERSION"));

    let session_config = match cfg.session_config() {
        Ok(session_config) => session_config,
        Err(e) => {
            error!("{}. Please check your environment variables.", e);
            return Err(e.into());
        }
    };

    info!(
        "Translating {} -> {} with voice {}",
        session_config.source_language, session_config.target_language, session_config.voice_id
    );

    // One connection serves both engines; not needed for a dry-run replay
    let nats = if args.script.is_some() && args.dry_run {
        None
    } else {
        let client = NatsClient::connect(&cfg.nats.url)
            .await
            .context("Speech engines are unreachable")?;
        Some(Arc::new(client))
    };

    let source_kind = match (&args.script, &nats) {
        (Some(path), _) => EventSourceKind::Script(path.clone()),
        (None, Some(client)) => EventSourceKind::Nats(Arc::clone(client)),
        (None, None) => anyhow::bail!("No recognition source available"),
    };
    let source = EventSourceFactory::create(source_kind, Arc::clone(&session_config))?;

    let sink: Arc<dyn OutputSink> = match (&nats, args.dry_run) {
        (Some(client), false) => Arc::new(NatsSpeechSink::new(
            Arc::clone(client),
            Arc::clone(&session_config),
        )),
        _ => Arc::new(LogSink),
    };
    info!("Audio output configured: {}", sink.name());

    let shutdown = CancellationToken::new();
    let controller = SessionController::new(Arc::clone(&session_config), sink);

    // Operator interrupt
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received");
                    shutdown.cancel();
                }
                Err(e) => warn!("Failed to listen for interrupt: {}", e),
            }
        });
    }

    let http_task = if cfg.http.enabled && !args.no_http {
        let addr = format!("{}:{}", cfg.http.bind, cfg.http.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP API on {}", addr))?;
        info!("HTTP API listening on {}", addr);

        let router = create_router(AppState::new(controller.subscribe(), shutdown.clone()));
        let server_shutdown = shutdown.clone();
        Some(tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await;
            if let Err(e) = served {
                error!("HTTP API failed: {}", e);
            }
        }))
    } else {
        None
    };

    let stats = controller.run(source, shutdown.clone()).await?;

    // Session over: let the HTTP API wind down too
    shutdown.cancel();
    if let Some(task) = http_task {
        if let Err(e) = task.await {
            error!("HTTP task panicked: {}", e);
        }
    }

    if let Some(client) = nats {
        client.close().await?;
    }

    match &stats.stop_reason {
        Some(StopReason::Canceled { reason }) => {
            warn!("Session ended by the recognition engine: {}", reason)
        }
        Some(reason) => info!("Session ended: {:?}", reason),
        None => {}
    }
    info!(
        "{} translations received, {} spoken",
        stats.translations, stats.spoken
    );

    Ok(())
}
