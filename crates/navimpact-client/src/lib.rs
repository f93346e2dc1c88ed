pub mod config;
pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::ApiError;
pub use http::HttpGrantApi;
pub use traits::*;
pub use types::*;
