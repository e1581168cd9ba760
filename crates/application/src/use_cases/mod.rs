//! Application use cases (business logic orchestration).

mod resolve_contract;

pub use resolve_contract::*;
