//! HTTP surface for the chat orchestrator.
//!
//! `POST /api/chat` accepts `{ "message": string }` and answers with
//! `{ "message": string }` or `{ "error": string }`. Internal failure detail
//! is logged, never returned.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::{build_orchestrator, serve, ServeError};
pub use config::{ConfigError, ServerArgs, ServerConfig};
pub use error::ApiError;
pub use routes::{router, ChatRequest, ChatResponse};
pub use state::AppState;
