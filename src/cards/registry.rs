//! District catalogue.
//!
//! The `DistrictRegistry` holds one template per distinct district together
//! with how many copies go into the deck. Catalogues are read from a
//! tab-separated table:
//!
//! ```text
//! name    quantity    color    cost    ability
//! Temple  3           blue     1
//! Keep    1           purple   3       The Keep cannot be destroyed by the Warlord.
//! ```
//!
//! The header row is skipped, blank lines are ignored, and lines with fewer
//! than four fields or unparseable numbers/colors are skipped with a warning.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::district::{Color, DistrictCard};

/// The catalogue bundled with the crate.
pub const STANDARD_DISTRICTS: &str = include_str!("../../data/districts.tsv");

/// A district template and its number of copies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictTemplate {
    pub card: DistrictCard,
    pub quantity: u32,
}

/// Registry of district templates.
///
/// ## Example
///
/// ```
/// use citadels::cards::{Color, DistrictCard, DistrictRegistry};
///
/// let mut registry = DistrictRegistry::new();
/// registry.register(DistrictCard::new("Temple", Color::Blue, 1), 3);
///
/// assert_eq!(registry.get("temple").unwrap().cost, 1);
/// assert_eq!(registry.expand().len(), 3);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DistrictRegistry {
    templates: Vec<DistrictTemplate>,
    by_name: FxHashMap<String, usize>,
}

impl DistrictRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled catalogue.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_tsv(STANDARD_DISTRICTS)
    }

    /// Parse a tab-separated catalogue.
    #[must_use]
    pub fn from_tsv(source: &str) -> Self {
        let mut registry = Self::new();

        for (line_no, line) in source.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some((card, quantity)) => {
                    registry.register(card, quantity);
                }
                None => warn!(line = line_no + 1, text = line, "skipping malformed district line"),
            }
        }

        registry
    }

    /// Register a template. Returns `false` if the name is already taken.
    pub fn register(&mut self, card: DistrictCard, quantity: u32) -> bool {
        let key = card.name.to_ascii_lowercase();
        if self.by_name.contains_key(&key) {
            warn!(name = %card.name, "duplicate district template ignored");
            return false;
        }
        self.by_name.insert(key, self.templates.len());
        self.templates.push(DistrictTemplate { card, quantity });
        true
    }

    /// Case-insensitive lookup of a template card.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DistrictCard> {
        self.by_name
            .get(&name.trim().to_ascii_lowercase())
            .map(|&i| &self.templates[i].card)
    }

    /// Number of distinct templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Total number of cards once every template is expanded.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.templates.iter().map(|t| t.quantity as usize).sum()
    }

    /// Expand every template into `quantity` copies, in catalogue order.
    #[must_use]
    pub fn expand(&self) -> Vec<DistrictCard> {
        self.templates
            .iter()
            .flat_map(|t| std::iter::repeat(t.card.clone()).take(t.quantity as usize))
            .collect()
    }
}

fn parse_line(line: &str) -> Option<(DistrictCard, u32)> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 4 {
        return None;
    }

    let name = fields[0].trim();
    if name.is_empty() {
        return None;
    }
    let quantity: u32 = fields[1].trim().parse().ok()?;
    let color: Color = fields[2].parse().ok()?;
    let cost: u32 = fields[3].trim().parse().ok()?;

    let mut card = DistrictCard::new(name, color, cost);
    if let Some(ability) = fields.get(4) {
        card = card.with_ability(ability.trim());
    }
    Some((card, quantity))
}
