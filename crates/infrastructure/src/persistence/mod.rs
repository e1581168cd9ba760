//! File-based persistence adapters.

mod contract_repository;
mod file_system;

pub use contract_repository::FileContractRepository;
pub use file_system::TokioFileSystem;
