//! Trellis Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod persistence;
pub mod serialization;

pub use persistence::{FileContractRepository, TokioFileSystem};
pub use serialization::{
    DocumentFormat, SerializationError, from_json, from_json_bytes, to_json_stable,
    to_json_stable_bytes,
};
