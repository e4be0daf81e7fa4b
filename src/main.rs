//! Factcheck HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use factcheck::assembler::ResultAssembler;
use factcheck::config::Config;
use factcheck::gateway::{AppState, create_router};
use factcheck::oracle::ChatCompletionsOracle;
use factcheck::registry::{HfHub, ModelHub, ModelRegistry};
use factcheck::research::{ChatSummaryGenerator, HtmlExtractor, ResearchPipeline, WebSearch};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        oracle_model = %config.oracle_model,
        generator_model = %config.generator_model,
        "Factcheck starting"
    );

    if config.oracle_api_key.is_none() {
        tracing::warn!("No FACTCHECK_ORACLE_API_KEY configured, scoring calls will fall back to defaults");
    }
    if config.bing_api_key.is_none() && config.google_api_key.is_none() {
        tracing::warn!("No search credentials configured, searches will return no results");
    }

    let registry = Arc::new(ModelRegistry::new());
    let hub: Arc<dyn ModelHub> = Arc::new(HfHub::new(config.hf_token.clone()));
    let oracle = Arc::new(ChatCompletionsOracle::from_config(&config));

    let assembler = ResultAssembler::new(oracle, hub.clone(), registry.clone())
        .with_capped_defaults(config.cap_default_scores);
    let generator = ChatSummaryGenerator::new(
        genai::Client::default(),
        config.generator_model.clone(),
        hub.clone(),
        registry.clone(),
    );
    let pipeline = ResearchPipeline::new(
        Arc::new(WebSearch::from_config(&config)),
        Arc::new(HtmlExtractor::new()?),
        Arc::new(generator),
        assembler,
    )
    .with_max_articles(config.max_articles);

    let state = AppState::new(pipeline, registry, hub, config.cors_origin.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Factcheck shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("FACTCHECK_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5001);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
