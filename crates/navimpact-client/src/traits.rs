use async_trait::async_trait;
use navimpact_core::Grant;

use crate::error::ApiError;
use crate::types::{
    ExportFormat, GrantAnalytics, GrantDraft, GrantPage, GrantQuery, GrantRecommendation,
    ImpactReportReceipt, ImpactReportRequest, RecommendationRequest, SmartSearchRequest,
};

#[async_trait]
pub trait GrantApi: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list_grants(&self, query: &GrantQuery) -> Result<GrantPage, ApiError>;

    async fn get_grant(&self, id: &str) -> Result<Grant, ApiError>;

    async fn create_grant(&self, draft: &GrantDraft) -> Result<Grant, ApiError>;

    async fn update_grant(&self, id: &str, draft: &GrantDraft) -> Result<Grant, ApiError>;

    async fn delete_grant(&self, id: &str) -> Result<(), ApiError>;

    async fn analytics(&self) -> Result<GrantAnalytics, ApiError>;

    async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GrantRecommendation>, ApiError>;

    async fn smart_search(&self, request: &SmartSearchRequest) -> Result<Vec<Grant>, ApiError>;

    async fn export_grants(
        &self,
        format: ExportFormat,
        query: &GrantQuery,
    ) -> Result<Vec<u8>, ApiError>;

    async fn impact_report(
        &self,
        request: &ImpactReportRequest,
    ) -> Result<ImpactReportReceipt, ApiError>;
}
