use std::collections::BTreeMap;

use navimpact_core::{Grant, ImpactMetrics, ProjectProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl GrantQuery {
    /// Query-string pairs for the fields that are set, in a stable order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.search {
            pairs.push(("search", v.clone()));
        }
        if let Some(v) = &self.category {
            pairs.push(("category", v.clone()));
        }
        if let Some(v) = &self.status {
            pairs.push(("status", v.clone()));
        }
        if let Some(v) = self.min_amount {
            pairs.push(("min_amount", v.to_string()));
        }
        if let Some(v) = self.max_amount {
            pairs.push(("max_amount", v.to_string()));
        }
        if let Some(v) = self.page {
            pairs.push(("page", v.to_string()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantDraft {
    pub title: String,
    #[serde(default)]
    pub funder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The list endpoint answers either with a bare array or a wrapped page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GrantListBody {
    Bare(Vec<Grant>),
    Wrapped {
        #[serde(alias = "data", alias = "items", alias = "results")]
        grants: Vec<Grant>,
        #[serde(default)]
        total: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrantPage {
    pub grants: Vec<Grant>,
    pub total: u64,
}

impl GrantListBody {
    pub(crate) fn into_page(self) -> GrantPage {
        match self {
            Self::Bare(grants) => GrantPage {
                total: grants.len() as u64,
                grants,
            },
            Self::Wrapped { grants, total } => GrantPage {
                total: total.unwrap_or(grants.len() as u64),
                grants,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantAnalytics {
    #[serde(default, alias = "totalGrants")]
    pub total_grants: u64,
    #[serde(default, alias = "totalFunding")]
    pub total_funding: f64,
    #[serde(default, alias = "successRate")]
    pub success_rate: f64,
    #[serde(default, alias = "byCategory")]
    pub by_category: BTreeMap<String, u64>,
    /// Any additional fields the backend reports.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub profile: ProjectProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantRecommendation {
    pub grant: Grant,
    #[serde(default, alias = "matchScore")]
    pub match_score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Json,
}

impl ExportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReportRequest {
    pub project_id: String,
    pub metrics: ImpactMetrics,
    #[serde(default)]
    pub profile: ProjectProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReportReceipt {
    #[serde(alias = "reportId", alias = "id")]
    pub report_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
