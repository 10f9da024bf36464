pub mod document;
pub mod error;
pub mod memory;
pub mod processor;
pub mod reference;

#[cfg(feature = "async")]
pub mod async_loader;

pub use document::*;
pub use error::*;
pub use memory::*;
pub use processor::*;
pub use reference::*;

#[cfg(feature = "async")]
pub use async_loader::*;

// Re-export FileSystem traits from tokenweave-common
pub use tokenweave_common::{FileSystem, MemoryFileSystem, RealFileSystem};
