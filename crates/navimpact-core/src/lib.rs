pub mod alignment;
pub mod export;
pub mod grant;
pub mod impact;
pub mod metrics;
pub mod report;

pub use alignment::*;
pub use export::*;
pub use grant::*;
pub use impact::*;
pub use metrics::*;
pub use report::*;
