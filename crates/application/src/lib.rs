//! Trellis Application - Resolution engine, use cases and ports
//!
//! This crate defines the application layer with:
//! - The contract resolution engine
//! - Port traits (interfaces for external dependencies)
//! - Use case orchestration
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod resolver;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ContractRepository, ContractRepositoryError, FileSystem, FileSystemError};
pub use resolver::{ComputedCache, ContractResolver, Resolution};
pub use use_cases::{
    ResolveContractError, ResolveContractFile, ResolveContractInput, ResolveContractOutput,
};
