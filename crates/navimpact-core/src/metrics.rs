use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    ReachCount,
    OutcomeCount,
    SustainabilityScore,
    InnovationScore,
    EvidenceQuality,
    StakeholderSatisfaction,
    CostEffectiveness,
    ScalabilityPotential,
    CommunityEngagement,
    PolicyInfluence,
    MediaReach,
    PartnershipStrength,
    VolunteerHours,
    FundingLeverage,
    DigitalReach,
    DiversityInclusion,
}

impl MetricName {
    /// Declaration order: the eight weighted core metrics, then the extended ones.
    pub const ALL: [Self; 16] = [
        Self::ReachCount,
        Self::OutcomeCount,
        Self::SustainabilityScore,
        Self::InnovationScore,
        Self::EvidenceQuality,
        Self::StakeholderSatisfaction,
        Self::CostEffectiveness,
        Self::ScalabilityPotential,
        Self::CommunityEngagement,
        Self::PolicyInfluence,
        Self::MediaReach,
        Self::PartnershipStrength,
        Self::VolunteerHours,
        Self::FundingLeverage,
        Self::DigitalReach,
        Self::DiversityInclusion,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReachCount => "reach_count",
            Self::OutcomeCount => "outcome_count",
            Self::SustainabilityScore => "sustainability_score",
            Self::InnovationScore => "innovation_score",
            Self::EvidenceQuality => "evidence_quality",
            Self::StakeholderSatisfaction => "stakeholder_satisfaction",
            Self::CostEffectiveness => "cost_effectiveness",
            Self::ScalabilityPotential => "scalability_potential",
            Self::CommunityEngagement => "community_engagement",
            Self::PolicyInfluence => "policy_influence",
            Self::MediaReach => "media_reach",
            Self::PartnershipStrength => "partnership_strength",
            Self::VolunteerHours => "volunteer_hours",
            Self::FundingLeverage => "funding_leverage",
            Self::DigitalReach => "digital_reach",
            Self::DiversityInclusion => "diversity_inclusion",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }
}

/// Raw metric inputs for one impact calculation. Every field is optional;
/// absent fields do not contribute to any aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innovation_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholder_satisfaction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_effectiveness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalability_potential: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_engagement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_influence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_reach: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_leverage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_reach: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_inclusion: Option<f64>,
}

impl ImpactMetrics {
    const fn slot(&self, name: MetricName) -> Option<f64> {
        match name {
            MetricName::ReachCount => self.reach_count,
            MetricName::OutcomeCount => self.outcome_count,
            MetricName::SustainabilityScore => self.sustainability_score,
            MetricName::InnovationScore => self.innovation_score,
            MetricName::EvidenceQuality => self.evidence_quality,
            MetricName::StakeholderSatisfaction => self.stakeholder_satisfaction,
            MetricName::CostEffectiveness => self.cost_effectiveness,
            MetricName::ScalabilityPotential => self.scalability_potential,
            MetricName::CommunityEngagement => self.community_engagement,
            MetricName::PolicyInfluence => self.policy_influence,
            MetricName::MediaReach => self.media_reach,
            MetricName::PartnershipStrength => self.partnership_strength,
            MetricName::VolunteerHours => self.volunteer_hours,
            MetricName::FundingLeverage => self.funding_leverage,
            MetricName::DigitalReach => self.digital_reach,
            MetricName::DiversityInclusion => self.diversity_inclusion,
        }
    }

    fn slot_mut(&mut self, name: MetricName) -> &mut Option<f64> {
        match name {
            MetricName::ReachCount => &mut self.reach_count,
            MetricName::OutcomeCount => &mut self.outcome_count,
            MetricName::SustainabilityScore => &mut self.sustainability_score,
            MetricName::InnovationScore => &mut self.innovation_score,
            MetricName::EvidenceQuality => &mut self.evidence_quality,
            MetricName::StakeholderSatisfaction => &mut self.stakeholder_satisfaction,
            MetricName::CostEffectiveness => &mut self.cost_effectiveness,
            MetricName::ScalabilityPotential => &mut self.scalability_potential,
            MetricName::CommunityEngagement => &mut self.community_engagement,
            MetricName::PolicyInfluence => &mut self.policy_influence,
            MetricName::MediaReach => &mut self.media_reach,
            MetricName::PartnershipStrength => &mut self.partnership_strength,
            MetricName::VolunteerHours => &mut self.volunteer_hours,
            MetricName::FundingLeverage => &mut self.funding_leverage,
            MetricName::DigitalReach => &mut self.digital_reach,
            MetricName::DiversityInclusion => &mut self.diversity_inclusion,
        }
    }

    /// Value of `name`, or `None` when absent or not a finite number.
    pub fn get(&self, name: MetricName) -> Option<f64> {
        self.slot(name).filter(|v| v.is_finite())
    }

    pub fn set(&mut self, name: MetricName, value: f64) -> &mut Self {
        *self.slot_mut(name) = Some(value);
        self
    }

    #[must_use]
    pub fn with(mut self, name: MetricName, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn present(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        MetricName::ALL
            .into_iter()
            .filter_map(|name| self.get(name).map(|v| (name, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Builds metrics from raw form fields. Unknown keys are ignored, blank
    /// values stay absent and unparsable numbers coerce to zero.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut metrics = Self::default();
        for (key, raw) in fields {
            let Some(name) = MetricName::from_key(key.trim()) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            metrics.set(name, parse_leading_float(raw).unwrap_or(0.0));
        }
        metrics
    }
}

/// Parses the longest numeric prefix of `raw`, so `"12.5 people"` yields 12.5.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let candidate_len = raw
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(idx, c)| idx + c.len_utf8())
        .last()?;
    let candidate = raw.get(..candidate_len)?;
    (1..=candidate.len())
        .rev()
        .filter_map(|end| candidate.get(..end))
        .find_map(|prefix| prefix.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
