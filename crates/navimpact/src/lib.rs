pub mod error;
pub mod logging;
pub mod service;
pub mod settings;

pub use error::NavImpactError;
pub use service::NavImpact;
pub use settings::Settings;

pub use navimpact_client::{
    ApiConfig, ApiError, ExportFormat, GrantAnalytics, GrantApi, GrantDraft, GrantPage,
    GrantQuery, GrantRecommendation, HttpGrantApi, ImpactReportReceipt, ImpactReportRequest,
    RecommendationRequest, SmartSearchRequest,
};
pub use navimpact_core::*;
pub use navimpact_storage::{
    ComparisonEntry, FileKeyValueStore, GrantTracker, KeyValueStore, MemoryKeyValueStore,
    SavedGrant, StorageError, TrackerSnapshot, UserPreferences,
};
