//! The join pipeline: one denormalized blueprint record per distinct
//! product type.

use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::catalog::{Catalog, ProductRow};
use crate::lookup::LookupError;

const IMAGE_BASE: &str = "https://images.evetech.net/types";

/// Which icon variant an image URL points at. A blueprint's own icon is a
/// different render from the generic item icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Blueprint,
    Icon,
}

impl ImageVariant {
    fn as_str(self) -> &'static str {
        match self {
            ImageVariant::Blueprint => "bp",
            ImageVariant::Icon => "icon",
        }
    }
}

pub fn image_url(type_id: i64, variant: ImageVariant) -> String {
    format!("{IMAGE_BASE}/{type_id}/{}", variant.as_str())
}

/// Denormalized description of a single type: the blueprint itself, its
/// product, or a material.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub name: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_group: Option<String>,
    pub category: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub name: String,
    pub quantity: i64,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_group: Option<String>,
    pub category: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequirement {
    pub skill_name: String,
    pub level: i64,
}

/// One crafting recipe: what the blueprint is, what it makes, and what a
/// run costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub blueprint: ItemInfo,
    pub product: ItemInfo,
    /// Units of product per run.
    pub quantity: i64,
    pub activity_type: String,
    pub materials: Vec<Material>,
    /// Build time in seconds.
    pub time: i64,
    pub probability: f64,
    pub skills: Vec<SkillRequirement>,
}

/// Assemble one record per distinct product type, in first-seen order of
/// the filtered product table.
///
/// A record whose mandatory lookups fail is dropped with a warning; the
/// rest of the batch is unaffected. The first product row for a given
/// product wins even if its record then fails to build; a later row for
/// the same product is an alternate recipe, not a fallback.
pub fn assemble(catalog: &Catalog) -> Vec<Blueprint> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for row in catalog.products() {
        if !seen.insert(row.product_type_id) {
            continue;
        }
        match build_record(catalog, row) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                product_type_id = row.product_type_id,
                blueprint_type_id = row.type_id,
                %err,
                "dropping blueprint record"
            ),
        }
    }

    records
}

fn build_record(catalog: &Catalog, row: &ProductRow) -> Result<Blueprint, LookupError> {
    let blueprint_type_id = row.type_id;
    let activity_id = row.activity_id;

    let materials = catalog
        .materials(blueprint_type_id, activity_id)
        .iter()
        .map(|material| {
            let info = item_info(catalog, material.material_type_id, ImageVariant::Icon)?;
            Ok(Material {
                name: info.name,
                quantity: material.quantity,
                group: info.group,
                market_group: info.market_group,
                category: info.category,
                image_url: info.image_url,
            })
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    let skills = catalog
        .skills(blueprint_type_id, activity_id)
        .iter()
        .map(|skill| {
            Ok(SkillRequirement {
                skill_name: catalog.type_name(skill.skill_id)?.to_string(),
                level: skill.level,
            })
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    Ok(Blueprint {
        blueprint: item_info(catalog, blueprint_type_id, ImageVariant::Blueprint)?,
        product: item_info(catalog, row.product_type_id, ImageVariant::Icon)?,
        quantity: row.quantity,
        activity_type: catalog.activity_name(activity_id)?.to_string(),
        materials,
        time: catalog.time(blueprint_type_id, activity_id)?,
        probability: catalog.probability(blueprint_type_id, activity_id),
        skills,
    })
}

/// Denormalize a type through the group/category/market-group chain.
///
/// The market group is optional twice over: the type may not have one, and
/// a dangling marketGroupID resolves to an omitted field rather than an
/// error.
fn item_info(
    catalog: &Catalog,
    type_id: i64,
    variant: ImageVariant,
) -> Result<ItemInfo, LookupError> {
    let name = catalog.type_name(type_id)?.to_string();
    let group_id = catalog.group_id(type_id)?;
    let group = catalog.group_name(group_id)?.to_string();
    let category = catalog
        .category_name(catalog.category_id(group_id)?)?
        .to_string();
    let market_group = match catalog.market_group_id(type_id)? {
        Some(market_group_id) => catalog
            .market_group_name(market_group_id)
            .ok()
            .map(str::to_string),
        None => None,
    };

    Ok(ItemInfo {
        name,
        group,
        market_group,
        category,
        image_url: image_url(type_id, variant),
    })
}
