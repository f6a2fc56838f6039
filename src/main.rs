use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use synopsis::application::services::SummarizationService;
use synopsis::infrastructure::llm::create_chat_completion_client;
use synopsis::infrastructure::observability::{TracingConfig, init_tracing};
use synopsis::infrastructure::text_processing::{PdfAdapter, RecursiveCharacterSplitter};
use synopsis::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    );

    let file_loader = Arc::new(PdfAdapter::with_timeout(Duration::from_secs(
        settings.extraction.timeout_secs,
    )));
    let llm_client = Arc::new(
        create_chat_completion_client(&settings.llm).context("Failed to create LLM client")?,
    );
    let text_splitter = Arc::new(
        RecursiveCharacterSplitter::new(
            settings.chunking.chunk_size,
            settings.chunking.chunk_overlap,
        )
        .context("Failed to create text splitter")?,
    );

    tracing::info!(
        provider = %settings.llm.provider,
        model = %llm_client.model(),
        base_url = %llm_client.base_url(),
        chunk_size = text_splitter.chunk_size(),
        chunk_overlap = text_splitter.chunk_overlap(),
        "Summarization pipeline configured"
    );

    let summarization_service = Arc::new(SummarizationService::new(
        file_loader,
        llm_client,
        text_splitter,
        settings.summarization_options(),
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        summarization_service,
        settings: Arc::new(settings),
    };

    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
