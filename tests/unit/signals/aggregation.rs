//! Unit tests for weighted fusion

use sigfuse::config::EngineConfig;
use sigfuse::models::{Direction, FactorContribution, FactorKind};
use sigfuse::signals::aggregation::fuse;

fn vote(factor: FactorKind, weight: f64, direction: Direction, magnitude: f64) -> FactorContribution {
    FactorContribution { factor, weight, direction, magnitude }
}

fn technical(ma: f64, macd: f64) -> Vec<FactorContribution> {
    let dir = |v: f64| {
        if v > 0.0 {
            Direction::Bullish
        } else if v < 0.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    };
    vec![
        vote(FactorKind::MovingAverage, 1.0, dir(ma), ma.abs()),
        FactorContribution::neutral(FactorKind::Rsi, 0.75),
        vote(FactorKind::Macd, 1.0, dir(macd), macd.abs()),
        FactorContribution::neutral(FactorKind::VolumeSpike, 0.5),
        FactorContribution::neutral(FactorKind::PriceLevels, 0.75),
    ]
}

#[test]
fn test_neutral_votes_dilute() {
    let fused = fuse(technical(1.0, 1.0), &EngineConfig::default());
    assert_eq!(fused.score, 0.5);
    assert_eq!(fused.technical_score, 0.5);
    assert_eq!(fused.direction, Direction::Bullish);
    assert_eq!(fused.confidence, 0.5);
    assert!(!fused.abstained);
}

#[test]
fn test_dead_zone() {
    let fused = fuse(technical(0.3, 0.0), &EngineConfig::default());
    // 0.3 / 4 = 0.075
    assert_eq!(fused.direction, Direction::Neutral);
    assert!(fused.confidence < 0.1);
}

#[test]
fn test_advisory_joins_denominator() {
    let mut votes = technical(1.0, 1.0);
    votes.push(vote(FactorKind::Advisory, 3.0, Direction::Bullish, 1.0));
    let fused = fuse(votes, &EngineConfig::default());
    assert!((fused.score - 5.0 / 7.0).abs() < 1e-12);
    assert_eq!(fused.technical_score, 0.5);
}

#[test]
fn test_opposed_near_equal_abstains() {
    let mut votes = technical(1.0, 1.0);
    votes.push(vote(FactorKind::Advisory, 3.0, Direction::Bearish, 0.55));
    let fused = fuse(votes, &EngineConfig::default());
    assert!(fused.abstained);
    assert_eq!(fused.direction, Direction::Neutral);
    assert_eq!(fused.confidence, 0.0);
}

#[test]
fn test_opposed_far_apart_does_not_abstain() {
    let mut votes = technical(1.0, 1.0);
    votes.push(vote(FactorKind::Advisory, 3.0, Direction::Bearish, 1.0));
    let fused = fuse(votes, &EngineConfig::default());
    assert!(!fused.abstained);
    // (2 - 3) / 7
    assert!((fused.score + 1.0 / 7.0).abs() < 1e-12);
    assert_eq!(fused.direction, Direction::Bearish);
}

#[test]
fn test_agreeing_near_equal_does_not_abstain() {
    let mut votes = technical(1.0, 1.0);
    votes.push(vote(FactorKind::Advisory, 3.0, Direction::Bullish, 0.5));
    assert!(!fuse(votes, &EngineConfig::default()).abstained);
}

#[test]
fn test_factors_ordered_by_contribution() {
    let mut votes = technical(0.2, -0.9);
    votes.push(vote(FactorKind::Advisory, 3.0, Direction::Bullish, 0.5));
    let fused = fuse(votes, &EngineConfig::default());
    let order: Vec<FactorKind> = fused.contributing_factors.iter().map(|f| f.factor).collect();
    assert_eq!(order[0], FactorKind::Advisory);
    assert_eq!(order[1], FactorKind::Macd);
    assert_eq!(order[2], FactorKind::MovingAverage);
    // neutral votes keep their relative order
    assert_eq!(
        &order[3..],
        &[FactorKind::Rsi, FactorKind::VolumeSpike, FactorKind::PriceLevels]
    );
}
