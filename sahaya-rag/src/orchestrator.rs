use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use sahaya_core::{Embedding, Llm, Retriever};
use sahaya_prompt::{PromptPayload, SystemInstruction};
use tracing::Instrument;
use uuid::Uuid;

use crate::stages::{ChatAnswer, QueryEmbedding, RetrievedContext, UserMessage};
use crate::{RagError, Stage};

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless request handler shared by all connections.
#[derive(Clone)]
pub struct ChatOrchestrator {
    embedder: Arc<dyn Embedding>,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn Llm>,
    instruction: SystemInstruction,
    top_k: usize,
    upstream_timeout: Duration,
}

pub struct ChatOrchestratorBuilder {
    embedder: Arc<dyn Embedding>,
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn Llm>,
    instruction: SystemInstruction,
    top_k: usize,
    upstream_timeout: Duration,
}

impl ChatOrchestratorBuilder {
    pub fn system_instruction(mut self, instruction: SystemInstruction) -> Self {
        self.instruction = instruction;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn build(self) -> ChatOrchestrator {
        ChatOrchestrator {
            embedder: self.embedder,
            retriever: self.retriever,
            llm: self.llm,
            instruction: self.instruction,
            top_k: self.top_k,
            upstream_timeout: self.upstream_timeout,
        }
    }
}

impl ChatOrchestrator {
    pub fn builder<E, R, L>(embedder: E, retriever: R, llm: L) -> ChatOrchestratorBuilder
    where
        E: Embedding + 'static,
        R: Retriever + 'static,
        L: Llm + 'static,
    {
        ChatOrchestratorBuilder {
            embedder: Arc::new(embedder),
            retriever: Arc::new(retriever),
            llm: Arc::new(llm),
            instruction: SystemInstruction::default(),
            top_k: DEFAULT_TOP_K,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn system_instruction(&self) -> &SystemInstruction {
        &self.instruction
    }

    /// Runs one chat turn. Upstream and internal failures are logged here
    /// with their detail; callers only decide how to present them.
    pub async fn handle(&self, message: &str) -> Result<ChatAnswer, RagError> {
        let span = tracing::info_span!("chat_turn", turn_id = %Uuid::new_v4());
        let result = self.run(message).instrument(span.clone()).await;

        match &result {
            Err(RagError::InvalidInput) => {
                tracing::info!(parent: &span, "rejected empty chat message");
            }
            Err(err) => {
                tracing::error!(parent: &span, stage = %err.stage(), error = %err, "chat turn failed");
            }
            Ok(_) => {}
        }
        result
    }

    async fn run(&self, message: &str) -> Result<ChatAnswer, RagError> {
        let message = UserMessage::parse(message)?;
        tracing::info!(message = %message.as_str(), "received chat message");

        let embedding = self.embed(&message).await?;
        let context = self.retrieve(&embedding).await?;
        tracing::debug!(
            passages = context.passages.len(),
            context = %context.text,
            "retrieved context"
        );

        let prompt = self.compose(&message, &context)?;
        let answer = self.generate(&prompt).await?;
        tracing::info!(answer_len = answer.answer.len(), "chat turn complete");
        Ok(answer)
    }

    pub async fn embed(&self, message: &UserMessage) -> Result<QueryEmbedding, RagError> {
        let vector = self
            .bounded(Stage::Embed, self.embedder.embed(message.as_str()))
            .await?;
        if vector.is_empty() {
            return Err(RagError::upstream(Stage::Embed, "empty embedding vector"));
        }
        Ok(QueryEmbedding(vector))
    }

    pub async fn retrieve(&self, embedding: &QueryEmbedding) -> Result<RetrievedContext, RagError> {
        let passages = self
            .bounded(
                Stage::Retrieve,
                self.retriever.retrieve(embedding.as_slice(), self.top_k),
            )
            .await?;
        Ok(RetrievedContext::from_passages(passages))
    }

    pub fn compose(
        &self,
        message: &UserMessage,
        context: &RetrievedContext,
    ) -> Result<PromptPayload, RagError> {
        let prompt = PromptPayload::compose(&self.instruction, &context.text, message.as_str())?;
        tracing::debug!(prompt_len = prompt.len(), "composed prompt");
        Ok(prompt)
    }

    pub async fn generate(&self, prompt: &PromptPayload) -> Result<ChatAnswer, RagError> {
        let answer = self
            .bounded(Stage::Generate, self.llm.generate(prompt.as_str()))
            .await?;
        Ok(ChatAnswer { answer })
    }

    /// Single attempt, bounded by the upstream timeout.
    async fn bounded<T, E, F>(&self, stage: Stage, call: F) -> Result<T, RagError>
    where
        E: fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.upstream_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(RagError::upstream(stage, err)),
            Err(_) => Err(RagError::upstream(
                stage,
                format!("timed out after {:?}", self.upstream_timeout),
            )),
        }
    }
}
