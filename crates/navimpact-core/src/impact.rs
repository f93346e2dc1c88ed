use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{ImpactMetrics, MetricName};

/// Weights of the eight core metrics. They sum to 1.0.
pub const CORE_WEIGHTS: [(MetricName, f64); 8] = [
    (MetricName::ReachCount, 0.15),
    (MetricName::OutcomeCount, 0.20),
    (MetricName::SustainabilityScore, 0.12),
    (MetricName::InnovationScore, 0.10),
    (MetricName::EvidenceQuality, 0.18),
    (MetricName::StakeholderSatisfaction, 0.12),
    (MetricName::CostEffectiveness, 0.08),
    (MetricName::ScalabilityPotential, 0.05),
];

pub const REC_EVIDENCE: &str =
    "Strengthen evidence collection with rigorous data gathering and independent evaluation";
pub const REC_STAKEHOLDER: &str =
    "Improve stakeholder engagement through regular feedback loops and co-design sessions";
pub const REC_SUSTAINABILITY: &str =
    "Develop a long-term sustainability plan with diversified funding sources";
pub const REC_COST: &str =
    "Review cost structures to improve cost-effectiveness and value for money";
pub const REC_OVERALL: &str =
    "Overall impact is below target; prioritise the lowest scoring metrics for improvement";

pub const RISK_EVIDENCE: &str = "Low evidence quality may undermine credibility with funders";
pub const RISK_STAKEHOLDER: &str = "Low stakeholder satisfaction risks disengagement and attrition";
pub const RISK_SUSTAINABILITY: &str = "Project sustainability is at risk beyond the funding period";
pub const RISK_COST: &str = "Poor cost-effectiveness may jeopardise future funding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactScore {
    pub weighted_score: f64,
    pub raw_score: f64,
    pub breakdown: BTreeMap<MetricName, f64>,
    pub factors: BTreeMap<MetricName, f64>,
    pub confidence_level: ConfidenceLevel,
    pub trend: Trend,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ImpactScoreEngine {
    weights: Vec<(MetricName, f64)>,
}

impl Default for ImpactScoreEngine {
    fn default() -> Self {
        Self {
            weights: CORE_WEIGHTS.to_vec(),
        }
    }
}

impl ImpactScoreEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &[(MetricName, f64)] {
        &self.weights
    }

    pub fn calculate(&self, metrics: &ImpactMetrics) -> ImpactScore {
        self.calculate_at(metrics, Utc::now())
    }

    pub fn calculate_at(&self, metrics: &ImpactMetrics, now: DateTime<Utc>) -> ImpactScore {
        let mut raw_score = 0.0_f64;
        let mut total_weight = 0.0_f64;
        let mut breakdown = BTreeMap::new();
        let mut factors = BTreeMap::new();

        for &(name, weight) in &self.weights {
            let Some(value) = metrics.get(name) else {
                continue;
            };
            let normalized = normalize(name, value);
            raw_score += normalized * weight;
            total_weight += weight;
            breakdown.insert(name, normalized);
            factors.insert(name, weight);
        }

        let weighted_score = if total_weight > 0.0 {
            raw_score / total_weight
        } else {
            0.0
        };

        ImpactScore {
            weighted_score,
            raw_score,
            breakdown,
            factors,
            confidence_level: confidence_level(metrics),
            trend: trend(metrics),
            recommendations: recommendations(metrics, weighted_score),
            risk_factors: risk_factors(metrics),
            last_updated: now,
        }
    }
}

pub fn calculate_impact_score(metrics: &ImpactMetrics) -> ImpactScore {
    ImpactScoreEngine::default().calculate(metrics)
}

/// Maps a raw value onto 0..=100.
pub fn normalize(name: MetricName, value: f64) -> f64 {
    let scaled = match name {
        MetricName::ReachCount => (value / 1000.0).min(100.0),
        MetricName::OutcomeCount => (value * 10.0).min(100.0),
        MetricName::CostEffectiveness => value * 100.0,
        _ => value,
    };
    scaled.clamp(0.0, 100.0)
}

/// Both evidence and satisfaction must clear the same bar; a strong value
/// does not compensate for a weak partner.
pub fn confidence_level(metrics: &ImpactMetrics) -> ConfidenceLevel {
    let (Some(evidence), Some(satisfaction)) = (
        metrics.get(MetricName::EvidenceQuality),
        metrics.get(MetricName::StakeholderSatisfaction),
    ) else {
        return ConfidenceLevel::Low;
    };

    if evidence >= 80.0 && satisfaction >= 80.0 {
        ConfidenceLevel::High
    } else if evidence >= 60.0 && satisfaction >= 60.0 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Uses the unweighted mean of every present raw value, not the weighted score.
pub fn trend(metrics: &ImpactMetrics) -> Trend {
    let (sum, count) = metrics
        .present()
        .fold((0.0_f64, 0_u32), |(sum, count), (_, v)| (sum + v, count + 1));
    let mean = if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    };

    if mean > 70.0 {
        Trend::Improving
    } else if mean > 50.0 {
        Trend::Stable
    } else {
        Trend::Declining
    }
}

fn below(metrics: &ImpactMetrics, name: MetricName, threshold: f64) -> bool {
    metrics.get(name).is_some_and(|v| v < threshold)
}

pub fn recommendations(metrics: &ImpactMetrics, score: f64) -> Vec<String> {
    let checks = [
        (MetricName::EvidenceQuality, 70.0, REC_EVIDENCE),
        (MetricName::StakeholderSatisfaction, 70.0, REC_STAKEHOLDER),
        (MetricName::SustainabilityScore, 60.0, REC_SUSTAINABILITY),
        (MetricName::CostEffectiveness, 0.6, REC_COST),
    ];

    let mut out: Vec<String> = checks
        .into_iter()
        .filter(|(name, threshold, _)| below(metrics, *name, *threshold))
        .map(|(_, _, message)| message.to_string())
        .collect();
    if score < 60.0 {
        out.push(REC_OVERALL.to_string());
    }
    out
}

pub fn risk_factors(metrics: &ImpactMetrics) -> Vec<String> {
    let checks = [
        (MetricName::EvidenceQuality, 50.0, RISK_EVIDENCE),
        (MetricName::StakeholderSatisfaction, 50.0, RISK_STAKEHOLDER),
        (MetricName::SustainabilityScore, 40.0, RISK_SUSTAINABILITY),
        (MetricName::CostEffectiveness, 0.4, RISK_COST),
    ];

    checks
        .into_iter()
        .filter(|(name, threshold, _)| below(metrics, *name, *threshold))
        .map(|(_, _, message)| message.to_string())
        .collect()
}
