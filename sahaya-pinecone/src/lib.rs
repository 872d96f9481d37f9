//! Pinecone retrieval for Sahaya.
//!
//! This crate provides a `PineconeRetriever` that:
//! - queries an index data plane for the nearest neighbours of a query
//!   embedding (`Retriever`),
//! - reads passage text from a configurable metadata key,
//! - can resolve the data plane host from an index name through the
//!   control plane, once, at build time.
//!
//! Environment variables commonly used by the server:
//! - `PINECONE_API_KEY`
//! - `PINECONE_INDEX` or `PINECONE_INDEX_HOST`
//! - `PINECONE_NAMESPACE` (optional)

pub mod client;
mod config;
mod error;
pub mod mapper;
mod retriever;
mod types;

pub use config::{PineconeRetrieverBuilder, PINECONE_CONTROL_PLANE_URL};
pub use error::PineconeStoreError;
pub use retriever::PineconeRetriever;
