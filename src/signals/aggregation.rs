//! Weighted fusion of factor votes

use crate::config::EngineConfig;
use crate::models::signal::{Direction, FactorContribution, FusedAssessment};

fn weighted_score(votes: &[&FactorContribution]) -> f64 {
    let total_weight: f64 = votes.iter().map(|v| v.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let net: f64 = votes.iter().map(|v| v.signed_contribution()).sum();
    (net / total_weight).clamp(-1.0, 1.0)
}

/// Combine votes into one assessment.
///
/// Neutral votes stay in the denominator, so a lone strong factor cannot
/// carry the result. An advisory vote, when present, joins both sums.
/// When the technical score and the advisory point opposite ways with
/// magnitudes within `tie_break_epsilon`, the result is forced neutral.
pub fn fuse(mut votes: Vec<FactorContribution>, config: &EngineConfig) -> FusedAssessment {
    let technical: Vec<&FactorContribution> =
        votes.iter().filter(|v| v.factor.is_technical()).collect();
    let technical_score = weighted_score(&technical);

    let all: Vec<&FactorContribution> = votes.iter().collect();
    let score = weighted_score(&all);

    let advisory = votes.iter().find(|v| !v.factor.is_technical());
    let abstained = advisory.is_some_and(|advisory| {
        let technical_direction = Direction::from_score(technical_score, config.neutral_dead_zone);
        technical_direction.opposes(advisory.direction)
            && (technical_score.abs() - advisory.magnitude).abs() <= config.tie_break_epsilon
    });

    votes.sort_by(|a, b| {
        b.signed_contribution()
            .abs()
            .total_cmp(&a.signed_contribution().abs())
    });

    let (direction, confidence) = if abstained {
        (Direction::Neutral, 0.0)
    } else {
        (
            Direction::from_score(score, config.neutral_dead_zone),
            score.abs().min(1.0),
        )
    };

    FusedAssessment {
        direction,
        confidence,
        score,
        technical_score,
        abstained,
        contributing_factors: votes,
    }
}
