//! Support and resistance levels

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Support,
    Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    /// 0..=1
    pub strength: f64,
    pub kind: LevelKind,
}

/// Levels sorted by strength, strongest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    levels: Vec<PriceLevel>,
}

impl LevelSet {
    pub fn new(mut levels: Vec<PriceLevel>) -> Self {
        levels.sort_by(|a, b| {
            b.strength
                .total_cmp(&a.strength)
                .then(a.price.total_cmp(&b.price))
        });
        Self { levels }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn of_kind(&self, kind: LevelKind) -> impl Iterator<Item = &PriceLevel> {
        self.levels.iter().filter(move |l| l.kind == kind)
    }

    /// Highest support strictly below `price` with at least `min_strength`.
    pub fn nearest_support_below(&self, price: f64, min_strength: f64) -> Option<&PriceLevel> {
        self.of_kind(LevelKind::Support)
            .filter(|l| l.price < price && l.strength >= min_strength)
            .max_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Lowest resistance strictly above `price` with at least `min_strength`.
    pub fn nearest_resistance_above(&self, price: f64, min_strength: f64) -> Option<&PriceLevel> {
        self.of_kind(LevelKind::Resistance)
            .filter(|l| l.price > price && l.strength >= min_strength)
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Nearest qualifying support at or below `price` and resistance at or above it.
    pub fn bracketing(&self, price: f64, min_strength: f64) -> LevelSet {
        let support = self
            .of_kind(LevelKind::Support)
            .filter(|l| l.price <= price && l.strength >= min_strength)
            .max_by(|a, b| a.price.total_cmp(&b.price));
        let resistance = self
            .of_kind(LevelKind::Resistance)
            .filter(|l| l.price >= price && l.strength >= min_strength)
            .min_by(|a, b| a.price.total_cmp(&b.price));
        LevelSet::new(support.into_iter().chain(resistance).cloned().collect())
    }
}
