//! Contract resolution module
//!
//! Parses `${path}` placeholders, orders computed fields by their
//! dependencies, evaluates them, and substitutes the UI tree.
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use trellis_application::resolver::ContractResolver;
//! use trellis_domain::{Contract, ResolveOptions};
//!
//! let contract = Contract::from_value(json!({
//!     "state": {"name": "Ann"},
//!     "computed": {"greeting": "Hello ${state.name}!"},
//!     "rootElement": {"type": "Text", "text": "${computed.greeting}"}
//! }))
//! .unwrap();
//!
//! let resolution = ContractResolver::new(ResolveOptions::default())
//!     .resolve(&contract, None)
//!     .unwrap();
//! assert_eq!(
//!     resolution.output.root_element,
//!     json!({"type": "Text", "text": "Hello Ann!"})
//! );
//! ```

pub mod cache;
pub mod engine;
pub mod evaluator;
pub mod graph;
pub mod order;
pub mod parser;
pub mod path;
pub mod substitute;
pub mod value;

pub use cache::{ComputedCache, fingerprint};
pub use engine::{ContractResolver, Resolution};
pub use evaluator::ExpressionEvaluator;
pub use graph::DependencyGraph;
pub use order::evaluation_order;
pub use parser::{PlaceholderToken, has_placeholders, parse_placeholder, scan_placeholders};
pub use path::{ResolutionStack, resolve_path};
pub use substitute::TreeSubstitutor;
pub use value::{is_artifact, is_truthy};
