use navimpact_core::Grant;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::traits::GrantApi;
use crate::types::{
    ExportFormat, GrantAnalytics, GrantDraft, GrantListBody, GrantPage, GrantQuery,
    GrantRecommendation, ImpactReportReceipt, ImpactReportRequest, RecommendationRequest,
    SmartSearchRequest,
};

/// REST client for the grants backend. No retries; every call maps non-2xx
/// answers to [`ApiError::Api`].
#[derive(Clone)]
pub struct HttpGrantApi {
    config: ApiConfig,
    base: Url,
    client: Client,
}

impl HttpGrantApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid base url {:?}: {e}", config.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "unsupported base url scheme: {}",
                base.scheme()
            )));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            base,
            client,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Config("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "grants api request");
        let builder = self.client.request(method, url);
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let res = builder.send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status, "grants api returned an error");
            return Err(ApiError::Api { status, body });
        }
        Ok(res)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let res = self.send(builder).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn require(value: &str, what: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Config(format!("{what} cannot be empty")));
    }
    Ok(())
}

fn with_query(mut url: Url, query: &GrantQuery) -> Url {
    let pairs = query.to_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationsBody {
    Bare(Vec<GrantRecommendation>),
    Wrapped {
        #[serde(alias = "data")]
        recommendations: Vec<GrantRecommendation>,
    },
}

#[async_trait::async_trait]
impl GrantApi for HttpGrantApi {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn list_grants(&self, query: &GrantQuery) -> Result<GrantPage, ApiError> {
        let url = with_query(self.url(&["api", "grants"])?, query);
        let body: GrantListBody = self.send_json(self.request(Method::GET, url)).await?;
        Ok(body.into_page())
    }

    async fn get_grant(&self, id: &str) -> Result<Grant, ApiError> {
        require(id, "grant id")?;
        let url = self.url(&["api", "grants", id])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn create_grant(&self, draft: &GrantDraft) -> Result<Grant, ApiError> {
        require(&draft.title, "grant title")?;
        let url = self.url(&["api", "grants"])?;
        self.send_json(self.request(Method::POST, url).json(draft))
            .await
    }

    async fn update_grant(&self, id: &str, draft: &GrantDraft) -> Result<Grant, ApiError> {
        require(id, "grant id")?;
        let url = self.url(&["api", "grants", id])?;
        self.send_json(self.request(Method::PUT, url).json(draft))
            .await
    }

    async fn delete_grant(&self, id: &str) -> Result<(), ApiError> {
        require(id, "grant id")?;
        let url = self.url(&["api", "grants", id])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn analytics(&self) -> Result<GrantAnalytics, ApiError> {
        let url = self.url(&["api", "grants", "analytics"])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GrantRecommendation>, ApiError> {
        let url = self.url(&["api", "grants", "ai", "recommendations"])?;
        let body: RecommendationsBody = self
            .send_json(self.request(Method::POST, url).json(request))
            .await?;
        Ok(match body {
            RecommendationsBody::Bare(items) => items,
            RecommendationsBody::Wrapped { recommendations } => recommendations,
        })
    }

    async fn smart_search(&self, request: &SmartSearchRequest) -> Result<Vec<Grant>, ApiError> {
        require(&request.query, "search query")?;
        let url = self.url(&["api", "grants", "search", "smart"])?;
        let body: GrantListBody = self
            .send_json(self.request(Method::POST, url).json(request))
            .await?;
        Ok(body.into_page().grants)
    }

    async fn export_grants(
        &self,
        format: ExportFormat,
        query: &GrantQuery,
    ) -> Result<Vec<u8>, ApiError> {
        let mut url = with_query(self.url(&["api", "grants", "export"])?, query);
        url.query_pairs_mut().append_pair("format", format.as_str());
        let res = self.send(self.request(Method::GET, url)).await?;
        let bytes = res.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidResponse(
                "export returned an empty body".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }

    async fn impact_report(
        &self,
        request: &ImpactReportRequest,
    ) -> Result<ImpactReportReceipt, ApiError> {
        require(&request.project_id, "project id")?;
        let url = self.url(&["api", "impact", "reports"])?;
        self.send_json(self.request(Method::POST, url).json(request))
            .await
    }
}
