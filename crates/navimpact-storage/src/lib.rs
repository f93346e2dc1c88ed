pub mod error;
pub mod kv;
pub mod tracker;

pub use error::StorageError;
pub use kv::*;
pub use tracker::*;
