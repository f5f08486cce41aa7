//! Configurable drop tables rolled on entity deaths.
//!
//! Tables live in an ordered list rather than a map, so duplicate
//! configurations stay representable and get reported instead of being
//! silently merged. Validation runs eagerly at load time and surfaces
//! typed findings; the event handler re-checks per event because a
//! reload can reintroduce bad data.

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::warn;

/// Category key for mob drop tables.
pub const MOBS_CATEGORY: &str = "mobs";

/// An item as it appears in a drop list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
}

/// Resolver interface consumed by the entity-death handler.
pub trait LootResolver {
    /// Number of configured tables matching `category`/`key`. More than
    /// one signals a misconfiguration the caller reports and aborts on.
    fn count_tables(&self, category: &str, key: &str) -> usize;

    /// Cumulative chance of the first matching table, or `None` when no
    /// table matches. Must be exactly 100.0 for a valid table.
    fn max_cumulative_chance(&self, category: &str, key: &str) -> Option<f64>;

    /// Whether the first matching table replaces the default drops.
    fn replaces_default_drops(&self, category: &str, key: &str) -> bool;

    /// Weighted random selection from the first matching table. `None`
    /// means "no drop".
    fn roll_drop<R: Rng>(&self, category: &str, key: &str, rng: &mut R) -> Option<ItemStack>;
}

/// A load-time validation finding. Non-fatal: the plugin keeps running
/// and the event handler guards per event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("{count} duplicate drop tables configured for {category}/{key}")]
    DuplicateTables {
        category: String,
        key: String,
        count: usize,
    },
    #[error("drop table {category}/{key} has cumulative chance {total}, expected exactly 100")]
    InvalidCumulativeChance {
        category: String,
        key: String,
        total: f64,
    },
    #[error("drop table {category}/{key} entry '{item}' has invalid chance {chance}")]
    InvalidEntryChance {
        category: String,
        key: String,
        item: String,
        chance: f64,
    },
    #[error("drop table {category}/{key} has an entry with an empty item token")]
    EmptyItem { category: String, key: String },
}

/// One weighted drop candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEntry {
    pub item: String,
    pub count: u32,
    /// Percentage weight out of the table's 100.0 total.
    pub chance: f64,
}

/// One configured table for a category/key pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub category: String,
    pub key: String,
    pub replace_default_drops: bool,
    pub entries: Vec<DropEntry>,
}

impl DropTable {
    pub fn cumulative_chance(&self) -> f64 {
        self.entries.iter().map(|entry| entry.chance).sum()
    }

    /// Walk a uniform draw in `[0, 100)` against cumulative entry
    /// chances. A draw past the configured total means "no drop".
    pub fn roll(&self, rng: &mut impl Rng) -> Option<ItemStack> {
        let draw: f64 = rng.gen_range(0.0..100.0);
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.chance;
            if draw < cumulative {
                return Some(ItemStack {
                    item: entry.item.clone(),
                    count: entry.count,
                });
            }
        }
        None
    }
}

/// All configured drop tables, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropTables {
    tables: Vec<DropTable>,
}

#[derive(Debug, Deserialize)]
struct TablesFile {
    #[serde(default)]
    mobs: Vec<TableDefinition>,
}

#[derive(Debug, Deserialize)]
struct TableDefinition {
    mob: String,
    #[serde(default)]
    replace_default_drops: bool,
    #[serde(default)]
    drops: Vec<DropDefinition>,
}

#[derive(Debug, Deserialize)]
struct DropDefinition {
    item: String,
    #[serde(default = "default_count")]
    count: u32,
    chance: f64,
}

fn default_count() -> u32 {
    1
}

impl DropTables {
    pub fn new(tables: Vec<DropTable>) -> Self {
        Self { tables }
    }

    /// Parse the tables file. Entity keys are normalized to uppercase,
    /// matching the host's entity type names.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: TablesFile =
            serde_json::from_str(contents).context("Failed to parse drop tables")?;
        let tables = file
            .mobs
            .into_iter()
            .map(|def| DropTable {
                category: MOBS_CATEGORY.to_string(),
                key: def.mob.trim().to_uppercase(),
                replace_default_drops: def.replace_default_drops,
                entries: def
                    .drops
                    .into_iter()
                    .map(|drop| DropEntry {
                        item: drop.item.trim().to_string(),
                        count: drop.count,
                        chance: drop.chance,
                    })
                    .collect(),
            })
            .collect();
        Ok(Self { tables })
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load tables, falling back to an empty set on errors. A missing
    /// file is normal for a fresh install and only logged once.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(tables) => tables,
                Err(err) => {
                    warn!("Failed to parse {}: {err:#}. Using no tables", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using no tables", path.display());
                } else {
                    warn!("Drop tables not found at {}. Using no tables", path.display());
                }
                Self::default()
            }
        }
    }

    /// Eager validation. Duplicate keys are reported once per key;
    /// per-table findings are reported for every table.
    pub fn validate(&self) -> Vec<TableError> {
        let mut findings = Vec::new();
        let mut reported_duplicates: Vec<(&str, &str)> = Vec::new();

        for table in &self.tables {
            let count = self.count_tables(&table.category, &table.key);
            let pair = (table.category.as_str(), table.key.as_str());
            if count > 1 && !reported_duplicates.contains(&pair) {
                reported_duplicates.push(pair);
                findings.push(TableError::DuplicateTables {
                    category: table.category.clone(),
                    key: table.key.clone(),
                    count,
                });
            }

            for entry in &table.entries {
                if entry.item.is_empty() {
                    findings.push(TableError::EmptyItem {
                        category: table.category.clone(),
                        key: table.key.clone(),
                    });
                }
                if !entry.chance.is_finite() || entry.chance < 0.0 {
                    findings.push(TableError::InvalidEntryChance {
                        category: table.category.clone(),
                        key: table.key.clone(),
                        item: entry.item.clone(),
                        chance: entry.chance,
                    });
                }
            }

            let total = table.cumulative_chance();
            if total != 100.0 {
                findings.push(TableError::InvalidCumulativeChance {
                    category: table.category.clone(),
                    key: table.key.clone(),
                    total,
                });
            }
        }
        findings
    }

    fn first_match(&self, category: &str, key: &str) -> Option<&DropTable> {
        self.tables
            .iter()
            .find(|table| table.category == category && table.key == key)
    }
}

impl LootResolver for DropTables {
    fn count_tables(&self, category: &str, key: &str) -> usize {
        self.tables
            .iter()
            .filter(|table| table.category == category && table.key == key)
            .count()
    }

    fn max_cumulative_chance(&self, category: &str, key: &str) -> Option<f64> {
        self.first_match(category, key)
            .map(DropTable::cumulative_chance)
    }

    fn replaces_default_drops(&self, category: &str, key: &str) -> bool {
        self.first_match(category, key)
            .map(|table| table.replace_default_drops)
            .unwrap_or(false)
    }

    fn roll_drop<R: Rng>(&self, category: &str, key: &str, rng: &mut R) -> Option<ItemStack> {
        self.first_match(category, key)
            .and_then(|table| table.roll(rng))
    }
}
