use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sahaya_embeddings::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};
use sahaya_llm::DEFAULT_GENERATION_MODEL;
use sahaya_prompt::{PromptError, SystemInstruction};
use sahaya_rag::{DEFAULT_TOP_K, DEFAULT_UPSTREAM_TIMEOUT};
use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_PINECONE_INDEX: &str = "sphashta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error(transparent)]
    Instruction(#[from] PromptError),
}

/// Command line and environment options for `sahaya-server`.
#[derive(Debug, Parser)]
#[command(name = "sahaya-server", version, about = "Retrieval-augmented chat endpoint")]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "SAHAYA_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: String,

    /// Overrides the Generative Language API origin.
    #[arg(long, env = "GOOGLE_API_BASE_URL")]
    pub google_base_url: Option<String>,

    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pub pinecone_api_key: String,

    /// Index name, resolved to a host through the control plane.
    #[arg(long, env = "PINECONE_INDEX", default_value = DEFAULT_PINECONE_INDEX)]
    pub pinecone_index: String,

    /// Data plane host. Skips control plane resolution when set.
    #[arg(long, env = "PINECONE_INDEX_HOST")]
    pub pinecone_index_host: Option<String>,

    #[arg(long, env = "PINECONE_NAMESPACE")]
    pub pinecone_namespace: Option<String>,

    /// Metadata field holding the passage text.
    #[arg(long, env = "PINECONE_TEXT_KEY", default_value = "text")]
    pub pinecone_text_key: String,

    #[arg(long, env = "SAHAYA_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    #[arg(long, env = "SAHAYA_EMBEDDING_DIMENSION", default_value_t = DEFAULT_EMBEDDING_DIMENSION)]
    pub embedding_dimension: usize,

    #[arg(long, env = "SAHAYA_GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    pub generation_model: String,

    #[arg(long, env = "SAHAYA_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Upper bound for each call to an external service.
    #[arg(long, env = "SAHAYA_UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT.as_secs())]
    pub upstream_timeout_secs: u64,

    /// Replaces the compiled-in system instruction.
    #[arg(long, env = "SAHAYA_SYSTEM_INSTRUCTION_FILE")]
    pub system_instruction_file: Option<PathBuf>,

    #[arg(long, env = "SAHAYA_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Compare the index dimension with the embedder at startup.
    #[arg(long, env = "SAHAYA_CHECK_DIMENSION")]
    pub check_dimension: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub google_api_key: SecretString,
    pub google_base_url: Option<String>,
    pub pinecone_api_key: SecretString,
    pub pinecone_index: String,
    pub pinecone_index_host: Option<String>,
    pub pinecone_namespace: Option<String>,
    pub pinecone_text_key: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub generation_model: String,
    pub top_k: usize,
    pub upstream_timeout: Duration,
    pub system_instruction: SystemInstruction,
    pub max_body_bytes: usize,
    pub check_dimension: bool,
}

impl ServerConfig {
    pub fn from_args(args: ServerArgs) -> Result<Self, ConfigError> {
        let google_api_key = required("GOOGLE_API_KEY", args.google_api_key)?;
        let pinecone_api_key = required("PINECONE_API_KEY", args.pinecone_api_key)?;
        let pinecone_index = required("PINECONE_INDEX", args.pinecone_index)?;
        let pinecone_text_key = required("PINECONE_TEXT_KEY", args.pinecone_text_key)?;
        let embedding_model = required("SAHAYA_EMBEDDING_MODEL", args.embedding_model)?;
        let generation_model = required("SAHAYA_GENERATION_MODEL", args.generation_model)?;

        if args.embedding_dimension == 0 {
            return Err(ConfigError::Invalid {
                name: "SAHAYA_EMBEDDING_DIMENSION",
                reason: "must be greater than zero".to_string(),
            });
        }
        if args.top_k == 0 {
            return Err(ConfigError::Invalid {
                name: "SAHAYA_TOP_K",
                reason: "must be greater than zero".to_string(),
            });
        }
        if args.upstream_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SAHAYA_UPSTREAM_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let system_instruction = match &args.system_instruction_file {
            Some(path) => SystemInstruction::from_file(path)?,
            None => SystemInstruction::default(),
        };

        Ok(Self {
            bind: args.bind,
            google_api_key: SecretString::new(google_api_key),
            google_base_url: non_blank(args.google_base_url),
            pinecone_api_key: SecretString::new(pinecone_api_key),
            pinecone_index,
            pinecone_index_host: non_blank(args.pinecone_index_host),
            pinecone_namespace: non_blank(args.pinecone_namespace),
            pinecone_text_key,
            embedding_model,
            embedding_dimension: args.embedding_dimension,
            generation_model,
            top_k: args.top_k,
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
            system_instruction,
            max_body_bytes: args.max_body_bytes,
            check_dimension: args.check_dimension,
        })
    }
}

fn required(name: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { name });
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
