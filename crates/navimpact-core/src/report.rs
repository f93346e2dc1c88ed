use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alignment::{FrameworkAlignment, ProjectProfile};
use crate::impact::{ImpactScore, ImpactScoreEngine};
use crate::metrics::ImpactMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub project_id: String,
    pub score: ImpactScore,
    pub alignment: FrameworkAlignment,
    pub generated_at: DateTime<Utc>,
}

impl ImpactReport {
    pub fn build(
        project_id: impl Into<String>,
        metrics: &ImpactMetrics,
        profile: &ProjectProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            score: ImpactScoreEngine::default().calculate_at(metrics, now),
            alignment: FrameworkAlignment::calculate(profile),
            generated_at: now,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: impact {:.1} ({} confidence, {}), framework alignment {:.1}",
            self.project_id,
            self.score.weighted_score,
            self.score.confidence_level.as_str(),
            self.score.trend.as_str(),
            self.alignment.total_score,
        )
    }
}
