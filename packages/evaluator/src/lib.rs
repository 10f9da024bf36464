pub mod error;
pub mod graph;
pub mod resolve;


pub use error::{ResolutionError, ResolutionErrorKind};
pub use resolve::{resolve_references, ResolutionOutput, ResolvedToken, ResolvedTokens};
