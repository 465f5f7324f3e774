//! Raw row types for the fetched SDE tables.
//!
//! Each struct lists exactly the attributes the pipeline keeps; everything
//! else in a source row is ignored during deserialization. The zzeve
//! conversions are not consistent about ID representation (some exports
//! carry numeric strings), so ID fields accept either form and normalize
//! to `i64`. `published` likewise arrives as `0`/`1` or as a bool.

use serde::{Deserialize, Deserializer};

/// Deserialize an ID that may be a JSON number or a numeric string.
fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Str(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Int(n) => Ok(n),
        Repr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric ID {s:?}"))),
    }
}

/// Like [`id`], but tolerates a missing or null field.
fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "id")] i64);

    Ok(Option::<Wrap>::deserialize(deserializer)?.map(|w| w.0))
}

/// Deserialize a published flag that may be `0`/`1` or a bool.
fn published<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Bool(bool),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Int(n) => n != 0,
        Repr::Bool(b) => b,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawType {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "typeName")]
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "groupID", deserialize_with = "id")]
    pub group_id: i64,
    #[serde(rename = "marketGroupID", default, deserialize_with = "opt_id")]
    pub market_group_id: Option<i64>,
    #[serde(default, deserialize_with = "published")]
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    #[serde(rename = "groupID", deserialize_with = "id")]
    pub group_id: i64,
    #[serde(rename = "groupName")]
    pub group_name: String,
    #[serde(rename = "categoryID", deserialize_with = "id")]
    pub category_id: i64,
    #[serde(default, deserialize_with = "published")]
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "categoryID", deserialize_with = "id")]
    pub category_id: i64,
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(default, deserialize_with = "published")]
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarketGroup {
    #[serde(rename = "marketGroupID", deserialize_with = "id")]
    pub market_group_id: i64,
    #[serde(rename = "marketGroupName")]
    pub market_group_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A row of `industryActivity`: the build time per (blueprint, activity).
#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityTime {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "activityID", deserialize_with = "id")]
    pub activity_id: i64,
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityMaterial {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "activityID", deserialize_with = "id")]
    pub activity_id: i64,
    #[serde(rename = "materialTypeID", deserialize_with = "id")]
    pub material_type_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityProduct {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "activityID", deserialize_with = "id")]
    pub activity_id: i64,
    #[serde(rename = "productTypeID", deserialize_with = "id")]
    pub product_type_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActivitySkill {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "activityID", deserialize_with = "id")]
    pub activity_id: i64,
    #[serde(rename = "skillID", deserialize_with = "id")]
    pub skill_id: i64,
    pub level: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActivityProbability {
    #[serde(rename = "typeID", deserialize_with = "id")]
    pub type_id: i64,
    #[serde(rename = "activityID", deserialize_with = "id")]
    pub activity_id: i64,
    pub probability: f64,
}
