//! The in-memory reference catalog built from the fetched tables.
//!
//! All collections are populated once and read-only afterwards. The catalog
//! is an explicit value handed to the assembler, so tests can build one from
//! fixture rows without touching the network.

pub mod activity;
pub mod raw;

pub use activity::{activity_name, Activity, ACTIVITIES, MANUFACTURING, REACTIONS};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::error::{Error, Result};
use crate::fetch::TableSource;
use raw::{
    RawActivityMaterial, RawActivityProbability, RawActivityProduct, RawActivitySkill,
    RawActivityTime, RawCategory, RawGroup, RawMarketGroup, RawType,
};

pub const TABLE_TYPES: &str = "invTypes";
pub const TABLE_GROUPS: &str = "invGroups";
pub const TABLE_CATEGORIES: &str = "invCategories";
pub const TABLE_MARKET_GROUPS: &str = "invMarketGroups";
pub const TABLE_ACTIVITY_TIMES: &str = "industryActivity";
pub const TABLE_ACTIVITY_MATERIALS: &str = "industryActivityMaterials";
pub const TABLE_ACTIVITY_PRODUCTS: &str = "industryActivityProducts";
pub const TABLE_ACTIVITY_SKILLS: &str = "industryActivitySkills";
pub const TABLE_ACTIVITY_PROBABILITIES: &str = "industryActivityProbabilities";

/// Every logical table the pipeline fetches, in fetch order.
pub const REQUIRED_TABLES: &[&str] = &[
    TABLE_MARKET_GROUPS,
    TABLE_CATEGORIES,
    TABLE_GROUPS,
    TABLE_TYPES,
    TABLE_ACTIVITY_TIMES,
    TABLE_ACTIVITY_MATERIALS,
    TABLE_ACTIVITY_PRODUCTS,
    TABLE_ACTIVITY_SKILLS,
    TABLE_ACTIVITY_PROBABILITIES,
];

/// A published item type, pruned to the attributes the join needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub name: String,
    pub description: Option<String>,
    pub group_id: i64,
    pub market_group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    pub name: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketGroupEntry {
    pub name: String,
    pub description: Option<String>,
}

/// One filtered `industryActivityProducts` row. Source order (ascending
/// typeID) is preserved; it fixes which blueprint wins when several produce
/// the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRow {
    pub type_id: i64,
    pub activity_id: i64,
    pub product_type_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRow {
    pub material_type_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillRow {
    pub skill_id: i64,
    pub level: i64,
}

/// The raw decoded tables, before filtering and re-keying.
#[derive(Debug, Default)]
pub struct RawTables {
    pub types: Vec<RawType>,
    pub groups: Vec<RawGroup>,
    pub categories: Vec<RawCategory>,
    pub market_groups: Vec<RawMarketGroup>,
    pub times: Vec<RawActivityTime>,
    pub materials: Vec<RawActivityMaterial>,
    pub products: Vec<RawActivityProduct>,
    pub skills: Vec<RawActivitySkill>,
    pub probabilities: Vec<RawActivityProbability>,
}

impl RawTables {
    /// Fetch and decode all required tables from the given source.
    pub fn load(source: &mut impl TableSource) -> Result<Self> {
        Ok(Self {
            market_groups: fetch(source, TABLE_MARKET_GROUPS)?,
            categories: fetch(source, TABLE_CATEGORIES)?,
            groups: fetch(source, TABLE_GROUPS)?,
            types: fetch(source, TABLE_TYPES)?,
            times: fetch(source, TABLE_ACTIVITY_TIMES)?,
            materials: fetch(source, TABLE_ACTIVITY_MATERIALS)?,
            products: fetch(source, TABLE_ACTIVITY_PRODUCTS)?,
            skills: fetch(source, TABLE_ACTIVITY_SKILLS)?,
            probabilities: fetch(source, TABLE_ACTIVITY_PROBABILITIES)?,
        })
    }
}

fn fetch<T: DeserializeOwned>(source: &mut impl TableSource, table: &'static str) -> Result<Vec<T>> {
    let rows = source.table(table)?;
    let count = rows.len();
    let decoded = serde_json::from_value(Value::Array(rows))
        .map_err(|source| Error::BadRow { table, source })?;
    info!(table, rows = count, "loaded table");
    Ok(decoded)
}

/// The filtered, re-keyed reference tables.
///
/// Map absence is the NotFound contract for the lookups in
/// [`crate::lookup`]; anything filtered out here does not exist as far as
/// the join is concerned.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) types: BTreeMap<i64, TypeEntry>,
    pub(crate) groups: BTreeMap<i64, GroupEntry>,
    pub(crate) categories: BTreeMap<i64, String>,
    pub(crate) market_groups: BTreeMap<i64, MarketGroupEntry>,
    pub(crate) times: BTreeMap<(i64, i64), i64>,
    pub(crate) materials: BTreeMap<(i64, i64), Vec<MaterialRow>>,
    pub(crate) skills: BTreeMap<(i64, i64), Vec<SkillRow>>,
    pub(crate) probabilities: BTreeMap<(i64, i64), f64>,
    pub(crate) products: Vec<ProductRow>,
}

impl Catalog {
    /// Fetch every required table and build the catalog.
    pub fn load(source: &mut impl TableSource) -> Result<Self> {
        Ok(Self::from_tables(RawTables::load(source)?))
    }

    /// Build the catalog from already-decoded tables. Pure and
    /// deterministic: the same input always yields the same catalog.
    pub fn from_tables(tables: RawTables) -> Self {
        let types: BTreeMap<i64, TypeEntry> = tables
            .types
            .into_iter()
            .filter(|row| row.published)
            .map(|row| {
                (
                    row.type_id,
                    TypeEntry {
                        name: row.type_name,
                        description: row.description,
                        group_id: row.group_id,
                        market_group_id: row.market_group_id,
                    },
                )
            })
            .collect();

        let groups: BTreeMap<i64, GroupEntry> = tables
            .groups
            .into_iter()
            .filter(|row| row.published)
            .map(|row| {
                (
                    row.group_id,
                    GroupEntry {
                        name: row.group_name,
                        category_id: row.category_id,
                    },
                )
            })
            .collect();

        let categories = tables
            .categories
            .into_iter()
            .filter(|row| row.published)
            .map(|row| (row.category_id, row.category_name))
            .collect();

        let market_groups = tables
            .market_groups
            .into_iter()
            .map(|row| {
                (
                    row.market_group_id,
                    MarketGroupEntry {
                        name: row.market_group_name,
                        description: row.description,
                    },
                )
            })
            .collect();

        // Activity rows referencing unpublished types are dropped; the
        // published type key set is the filter for every table below.
        let times = tables
            .times
            .into_iter()
            .filter(|row| types.contains_key(&row.type_id))
            .map(|row| ((row.type_id, row.activity_id), row.time))
            .collect();

        let mut materials: BTreeMap<(i64, i64), Vec<MaterialRow>> = BTreeMap::new();
        for row in tables.materials {
            if !types.contains_key(&row.type_id) {
                continue;
            }
            materials
                .entry((row.type_id, row.activity_id))
                .or_default()
                .push(MaterialRow {
                    material_type_id: row.material_type_id,
                    quantity: row.quantity,
                });
        }

        let mut skills: BTreeMap<(i64, i64), Vec<SkillRow>> = BTreeMap::new();
        for row in tables.skills {
            if !types.contains_key(&row.type_id) {
                continue;
            }
            skills
                .entry((row.type_id, row.activity_id))
                .or_default()
                .push(SkillRow {
                    skill_id: row.skill_id,
                    level: row.level,
                });
        }

        let probabilities = tables
            .probabilities
            .into_iter()
            .filter(|row| types.contains_key(&row.type_id))
            .map(|row| ((row.type_id, row.activity_id), row.probability))
            .collect();

        // Products define the blueprint universe: both ends must be
        // published and the activity must actually produce items.
        let mut products: Vec<ProductRow> = tables
            .products
            .into_iter()
            .filter(|row| {
                types.contains_key(&row.type_id)
                    && types.contains_key(&row.product_type_id)
                    && (row.activity_id == MANUFACTURING || row.activity_id == REACTIONS)
            })
            .map(|row| ProductRow {
                type_id: row.type_id,
                activity_id: row.activity_id,
                product_type_id: row.product_type_id,
                quantity: row.quantity,
            })
            .collect();
        products.sort_by_key(|row| row.type_id);

        info!(
            types = types.len(),
            groups = groups.len(),
            products = products.len(),
            "catalog built"
        );

        Self {
            types,
            groups,
            categories,
            market_groups,
            times,
            materials,
            skills,
            probabilities,
            products,
        }
    }

    /// The filtered product rows, in presentation order.
    pub fn products(&self) -> &[ProductRow] {
        &self.products
    }

    /// Whether a typeID survived the published filter.
    pub fn is_published(&self, type_id: i64) -> bool {
        self.types.contains_key(&type_id)
    }
}
