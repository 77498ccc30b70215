//! Request routing and the filesystem it serves from.

pub mod fs;
pub mod router;

pub use fs::{DirStore, FileStore, StoreError};
pub use router::{DispatchError, Router};
