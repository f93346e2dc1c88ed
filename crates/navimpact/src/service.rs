use std::sync::Arc;

use chrono::Utc;
use navimpact_client::{GrantApi, HttpGrantApi};
use navimpact_core::{
    Grant, ImpactMetrics, ImpactReport, ImpactScore, ImpactScoreEngine, ProjectProfile,
    grants_to_csv,
};
use navimpact_storage::{ComparisonEntry, FileKeyValueStore, GrantTracker, KeyValueStore};

use crate::error::NavImpactError;
use crate::settings::Settings;

/// Grants API, local grant tracking and impact scoring behind one handle.
pub struct NavImpact {
    api: Arc<dyn GrantApi>,
    tracker: GrantTracker,
    engine: ImpactScoreEngine,
}

impl NavImpact {
    pub fn open(settings: &Settings) -> Result<Self, NavImpactError> {
        let api = HttpGrantApi::new(settings.api.clone())?;
        let store = FileKeyValueStore::open(settings.store_path())?;
        tracing::info!(
            api = %api.config().base_url,
            store = %store.path().display(),
            "navimpact opened"
        );
        Ok(Self::with_parts(Arc::new(api), Box::new(store)))
    }

    pub fn with_parts(api: Arc<dyn GrantApi>, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            api,
            tracker: GrantTracker::new(store),
            engine: ImpactScoreEngine::default(),
        }
    }

    pub fn api(&self) -> &Arc<dyn GrantApi> {
        &self.api
    }

    pub fn tracker(&self) -> &GrantTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut GrantTracker {
        &mut self.tracker
    }

    /// Fetches a grant and records the view. A failed fetch records nothing.
    pub async fn view_grant(&mut self, id: &str) -> Result<Grant, NavImpactError> {
        let grant = self.api.get_grant(id).await?;
        self.tracker.record_view(&grant.id)?;
        tracing::debug!(api = self.api.name(), id = %grant.id, "grant viewed");
        Ok(grant)
    }

    /// Fetches and saves a grant. Returns false when a grant with the id the
    /// backend returned was already saved.
    pub async fn save_grant(&mut self, id: &str) -> Result<bool, NavImpactError> {
        let grant = self.api.get_grant(id).await?;
        Ok(self.tracker.save_grant(grant)?)
    }

    pub async fn compare_grants(
        &mut self,
        ids: &[&str],
    ) -> Result<(Vec<Grant>, ComparisonEntry), NavImpactError> {
        let mut grants = Vec::with_capacity(ids.len());
        for id in ids {
            grants.push(self.api.get_grant(id).await?);
        }
        let entry = self
            .tracker
            .add_comparison(grants.iter().map(|g| g.id.clone()).collect())?;
        Ok((grants, entry))
    }

    pub fn saved_grants_csv(&self) -> Result<String, NavImpactError> {
        let grants: Vec<Grant> = self
            .tracker
            .saved_grants()?
            .into_iter()
            .map(|s| s.grant)
            .collect();
        Ok(grants_to_csv(&grants))
    }

    pub fn score(&self, metrics: &ImpactMetrics) -> ImpactScore {
        self.engine.calculate(metrics)
    }

    pub fn evaluate(
        &self,
        project_id: &str,
        metrics: &ImpactMetrics,
        profile: &ProjectProfile,
    ) -> ImpactReport {
        if metrics.is_empty() {
            tracing::warn!(project_id, "evaluating a project with no usable metrics");
        }
        let report = ImpactReport::build(project_id, metrics, profile, Utc::now());
        tracing::debug!(summary = %report.summary(), "impact evaluated");
        report
    }
}
