//! Test server harness.

use factcheck::assembler::ResultAssembler;
use factcheck::gateway::{AppState, create_router};
use factcheck::oracle::ScoringOracle;
use factcheck::registry::{ModelHub, ModelRegistry};
use factcheck::research::{ContentExtractor, ResearchPipeline, SearchBackend, SummaryGenerator};
use factcheck::{MockExtractor, MockModelHub, MockOracle, MockSearch, MockSummaryGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub const BENEFIT_URLS: [&str; 3] = [
    "https://news.example/open-weights",
    "https://blog.example/audits",
    "https://papers.example/finetuning",
];
pub const DRAWBACK_URLS: [&str; 2] = [
    "https://policy.example/misuse",
    "https://security.example/jailbreaks",
];

/// Collaborators wired into a spawned server. Defaults are in-memory fixtures.
#[derive(Clone)]
pub struct TestServerConfig {
    pub search: Arc<dyn SearchBackend>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub generator: Arc<dyn SummaryGenerator>,
    pub oracle: Arc<dyn ScoringOracle>,
    pub hub: Arc<dyn ModelHub>,
    pub max_articles: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        let search = MockSearch::new()
            .with_results("Benefits", &BENEFIT_URLS)
            .with_results("Drawbacks", &DRAWBACK_URLS);

        let extractor = BENEFIT_URLS
            .iter()
            .chain(DRAWBACK_URLS.iter())
            .fold(MockExtractor::new(), |extractor, url| {
                extractor.with_page(url, &format!("Title of {url}"), &format!("Text of {url}"))
            });

        let generator = MockSummaryGenerator::with_paragraphs(&["Generic point."])
            .with_attribute(
                "Benefits",
                &["Open weights allow independent audits.", "Fine-tuning is cheaper."],
            )
            .with_attribute("Drawbacks", &["Safety filters can be removed."]);

        Self {
            search: Arc::new(search),
            extractor: Arc::new(extractor),
            generator: Arc::new(generator),
            oracle: Arc::new(MockOracle::with_text("3")),
            hub: Arc::new(MockModelHub::new().with_model("org/judge")),
            max_articles: factcheck::constants::DEFAULT_MAX_ARTICLES,
        }
    }
}

impl TestServerConfig {
    pub fn with_oracle(mut self, oracle: Arc<dyn ScoringOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_hub(mut self, hub: Arc<dyn ModelHub>) -> Self {
        self.hub = hub;
        self
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<ModelRegistry>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Serves `router` on an ephemeral local port until the returned sender fires or is dropped.
pub async fn serve_router(
    router: axum::Router,
) -> Result<(SocketAddr, JoinHandle<()>, oneshot::Sender<()>), ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok((addr, handle, shutdown_tx))
}

/// Spawns the full router over the configured collaborators. No network access is needed.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let registry = Arc::new(ModelRegistry::new());
    let assembler = ResultAssembler::new(config.oracle, config.hub.clone(), registry.clone());
    let pipeline = ResearchPipeline::new(
        config.search,
        config.extractor,
        config.generator,
        assembler,
    )
    .with_max_articles(config.max_articles);

    let state = AppState::new(pipeline, registry.clone(), config.hub, "http://localhost:3000");
    let (addr, handle, shutdown_tx) = serve_router(create_router(state)).await?;

    Ok(TestServer {
        addr,
        registry,
        _server_handle: handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
