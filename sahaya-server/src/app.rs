use std::io;

use sahaya_embeddings::GoogleEmbedding;
use sahaya_llm::GoogleClient;
use sahaya_pinecone::{PineconeRetriever, PineconeStoreError};
use sahaya_rag::ChatOrchestrator;
use secrecy::ExposeSecret;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::routes::router;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to build retriever: {0}")]
    Retriever(#[from] PineconeStoreError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

/// Builds the provider clients and wires them into an orchestrator.
pub async fn build_orchestrator(config: &ServerConfig) -> Result<ChatOrchestrator, ServeError> {
    let mut embedder = GoogleEmbedding::new(
        config.google_api_key.expose_secret().as_str(),
        config.embedding_model.as_str(),
        config.embedding_dimension,
    )
    .with_timeout(config.upstream_timeout);

    let mut retriever = PineconeRetriever::builder()
        .api_key(config.pinecone_api_key.expose_secret().as_str())
        .index_name(config.pinecone_index.as_str())
        .text_key(config.pinecone_text_key.as_str())
        .timeout(config.upstream_timeout);
    if let Some(host) = &config.pinecone_index_host {
        retriever = retriever.index_host(host.as_str());
    }
    if let Some(namespace) = &config.pinecone_namespace {
        retriever = retriever.namespace(namespace.as_str());
    }
    if config.check_dimension {
        retriever = retriever.validate_dimension(config.embedding_dimension);
    }
    let retriever = retriever.build().await?;

    let mut llm = GoogleClient::new(
        config.google_api_key.expose_secret().as_str(),
        config.generation_model.as_str(),
    )
    .with_timeout(config.upstream_timeout);

    if let Some(base_url) = &config.google_base_url {
        embedder = embedder.with_base_url(base_url.as_str());
        llm = llm.with_base_url(base_url.as_str());
    }

    tracing::info!(
        embedding_model = embedder.model(),
        generation_model = llm.model(),
        index_host = retriever.host(),
        top_k = config.top_k,
        "chat pipeline configured"
    );

    Ok(ChatOrchestrator::builder(embedder, retriever, llm)
        .system_instruction(config.system_instruction.clone())
        .top_k(config.top_k)
        .upstream_timeout(config.upstream_timeout)
        .build())
}

/// Serves the chat router until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let orchestrator = build_orchestrator(&config).await?;
    let app = router(AppState::new(orchestrator), config.max_body_bytes);

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.bind,
            source,
        })?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
