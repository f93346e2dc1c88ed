use std::fs;
use std::path::PathBuf;

use navimpact::{ConfidenceLevel, ImpactMetrics, ImpactScoreEngine, Trend};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    metrics: ImpactMetrics,
    expected_score: f64,
    expected_confidence: ConfidenceLevel,
    expected_trend: Trend,
    expected_recommendations: usize,
    expected_risk_factors: usize,
}

#[test]
fn scoring_cases_pass() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let fixture = root
        .join("..")
        .join("..")
        .join("data")
        .join("impact")
        .join("scoring_cases.json");

    let content = fs::read_to_string(&fixture)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", fixture.display()));
    let cases: Vec<Case> = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", fixture.display()));
    assert!(!cases.is_empty(), "fixture has no cases");

    let engine = ImpactScoreEngine::default();
    for case in cases {
        let score = engine.calculate(&case.metrics);
        assert!(
            (score.weighted_score - case.expected_score).abs() < 1e-6,
            "case {} score: got {}, expected {}",
            case.name,
            score.weighted_score,
            case.expected_score
        );
        assert!(
            (0.0..=100.0).contains(&score.weighted_score),
            "case {} out of range",
            case.name
        );
        assert_eq!(
            score.confidence_level, case.expected_confidence,
            "case {} confidence",
            case.name
        );
        assert_eq!(score.trend, case.expected_trend, "case {} trend", case.name);
        assert_eq!(
            score.recommendations.len(),
            case.expected_recommendations,
            "case {} recommendations",
            case.name
        );
        assert_eq!(
            score.risk_factors.len(),
            case.expected_risk_factors,
            "case {} risk factors",
            case.name
        );
    }
}
