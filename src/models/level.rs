//! Career-ladder level model and catalog surface.
//!
//! The ladder itself (which levels exist, their factors and benefits)
//! is host data: dashboards ship their own catalog and expose it to
//! the engine through [`LevelCatalog`]. The engine only ever asks one
//! question of it — the base factor behind a `level_id` — when no
//! override factor is set on the active assignment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One position on the career ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerLevel {
    /// Unique level identifier (e.g. `"JMM"`).
    pub id: String,
    /// Full display name.
    pub name: String,
    /// Abbreviation shown in badges. Top ladder positions may have
    /// none and display their full name instead.
    pub short_code: Option<String>,
    /// Commission factor earned at this level.
    pub base_factor: Decimal,
    /// Position on the ladder (1 = entry level, ascending).
    pub rank: u32,
    /// Perks unlocked at this level.
    pub benefits: Vec<String>,
}

impl CareerLevel {
    /// Creates a level with the given id and commission factor.
    pub fn new(id: impl Into<String>, base_factor: Decimal) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            short_code: None,
            base_factor,
            rank: 0,
            benefits: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the badge abbreviation.
    pub fn with_short_code(mut self, short_code: impl Into<String>) -> Self {
        self.short_code = Some(short_code.into());
        self
    }

    /// Sets the ladder rank.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = rank;
        self
    }

    /// Adds a benefit.
    pub fn with_benefit(mut self, benefit: impl Into<String>) -> Self {
        self.benefits.push(benefit.into());
        self
    }
}

/// Read access to the host's career-ladder catalog.
pub trait LevelCatalog {
    /// Looks up a level by id.
    fn level(&self, level_id: &str) -> Option<&CareerLevel>;

    /// The commission factor behind a level id, if the catalog knows
    /// the level.
    fn base_factor(&self, level_id: &str) -> Option<Decimal> {
        self.level(level_id).map(|level| level.base_factor)
    }
}

/// Map-backed catalog, keyed by level id.
///
/// The reference implementation for hosts that load their ladder into
/// memory; anything implementing [`LevelCatalog`] works equally well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    levels: HashMap<String, CareerLevel>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a level, keyed by its id.
    pub fn with_level(mut self, level: CareerLevel) -> Self {
        self.levels.insert(level.id.clone(), level);
        self
    }

    /// Number of levels in the catalog.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the catalog has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelCatalog for InMemoryCatalog {
    fn level(&self, level_id: &str) -> Option<&CareerLevel> {
        self.levels.get(level_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_level(
                CareerLevel::new("JMM", factor("6.0"))
                    .with_name("Junior Marketing Manager")
                    .with_short_code("JMM")
                    .with_rank(3)
                    .with_benefit("Mentoring programme"),
            )
            .with_level(
                CareerLevel::new("EMM", factor("6.5"))
                    .with_name("Executive Marketing Manager")
                    .with_short_code("EMM")
                    .with_rank(4),
            )
            .with_level(
                CareerLevel::new("SPB", factor("7.0"))
                    .with_name("Spitzen Botschafter")
                    .with_rank(6),
            )
    }

    #[test]
    fn test_level_builder() {
        let level = CareerLevel::new("SMA", factor("5.0"))
            .with_name("Starting Marketing Advisor")
            .with_short_code("SMA")
            .with_rank(1)
            .with_benefit("Base commission")
            .with_benefit("Training access");

        assert_eq!(level.id, "SMA");
        assert_eq!(level.base_factor, factor("5.0"));
        assert_eq!(level.rank, 1);
        assert_eq!(level.benefits.len(), 2);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);

        let jmm = catalog.level("JMM").unwrap();
        assert_eq!(jmm.name, "Junior Marketing Manager");
        assert!(catalog.level("UNKNOWN").is_none());
    }

    #[test]
    fn test_base_factor_helper() {
        let catalog = sample_catalog();
        assert_eq!(catalog.base_factor("EMM"), Some(factor("6.5")));
        assert_eq!(catalog.base_factor("UNKNOWN"), None);
    }

    #[test]
    fn test_top_levels_may_lack_short_code() {
        let catalog = sample_catalog();
        assert!(catalog.level("SPB").unwrap().short_code.is_none());
    }
}
