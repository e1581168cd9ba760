//! Trellis Domain - Contract and resolution types
//!
//! This crate defines the data model of a UI contract: the input document,
//! the lookup context, computed definitions, parsed placeholder paths and
//! the errors resolution can raise. All types here are pure Rust with no I/O.

pub mod computed;
pub mod context;
pub mod contract;
pub mod error;
pub mod location;
pub mod node;
pub mod options;
pub mod placeholder;
pub mod warning;

pub use computed::{ComputedDefinition, Conditional, ConditionalRef};
pub use context::Context;
pub use contract::{Contract, ROOT_ELEMENT_KEY, ResolvedContract, state_override_from_value};
pub use error::{DomainError, DomainResult, ResolveError, ResolveResult};
pub use location::Location;
pub use options::{InterpolationCoercion, ResolveOptions, StatePrecedence};
pub use placeholder::{PlaceholderPath, Segment};
pub use warning::ResolveWarning;
