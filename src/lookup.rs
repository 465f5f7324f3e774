//! Point lookups over the [`Catalog`].
//!
//! Every fallible lookup returns a [`LookupError`] naming the table and the
//! ID that failed to resolve, so a chained join step can tell exactly where
//! it broke instead of propagating a sentinel into the output.

use thiserror::Error;

use crate::catalog::{activity_name, Catalog, MaterialRow, SkillRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no published type with typeID {0}")]
    Type(i64),
    #[error("no published group with groupID {0}")]
    Group(i64),
    #[error("no published category with categoryID {0}")]
    Category(i64),
    #[error("no market group with marketGroupID {0}")]
    MarketGroup(i64),
    #[error("no industry activity with activityID {0}")]
    Activity(i64),
    #[error("no activity time for typeID {type_id}, activityID {activity_id}")]
    Time { type_id: i64, activity_id: i64 },
}

impl Catalog {
    pub fn type_name(&self, type_id: i64) -> Result<&str, LookupError> {
        self.types
            .get(&type_id)
            .map(|entry| entry.name.as_str())
            .ok_or(LookupError::Type(type_id))
    }

    pub fn group_id(&self, type_id: i64) -> Result<i64, LookupError> {
        self.types
            .get(&type_id)
            .map(|entry| entry.group_id)
            .ok_or(LookupError::Type(type_id))
    }

    pub fn group_name(&self, group_id: i64) -> Result<&str, LookupError> {
        self.groups
            .get(&group_id)
            .map(|entry| entry.name.as_str())
            .ok_or(LookupError::Group(group_id))
    }

    pub fn category_id(&self, group_id: i64) -> Result<i64, LookupError> {
        self.groups
            .get(&group_id)
            .map(|entry| entry.category_id)
            .ok_or(LookupError::Group(group_id))
    }

    pub fn category_name(&self, category_id: i64) -> Result<&str, LookupError> {
        self.categories
            .get(&category_id)
            .map(String::as_str)
            .ok_or(LookupError::Category(category_id))
    }

    /// A type with no market group is `Ok(None)`; only an unknown typeID is
    /// an error.
    pub fn market_group_id(&self, type_id: i64) -> Result<Option<i64>, LookupError> {
        self.types
            .get(&type_id)
            .map(|entry| entry.market_group_id)
            .ok_or(LookupError::Type(type_id))
    }

    pub fn market_group_name(&self, market_group_id: i64) -> Result<&str, LookupError> {
        self.market_groups
            .get(&market_group_id)
            .map(|entry| entry.name.as_str())
            .ok_or(LookupError::MarketGroup(market_group_id))
    }

    pub fn activity_name(&self, activity_id: i64) -> Result<&'static str, LookupError> {
        activity_name(activity_id)
    }

    /// Every recipe must declare a build time; absence is an error.
    pub fn time(&self, type_id: i64, activity_id: i64) -> Result<i64, LookupError> {
        self.times
            .get(&(type_id, activity_id))
            .copied()
            .ok_or(LookupError::Time {
                type_id,
                activity_id,
            })
    }

    /// Materials for a recipe; recipes without material rows are empty.
    pub fn materials(&self, type_id: i64, activity_id: i64) -> &[MaterialRow] {
        self.materials
            .get(&(type_id, activity_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn skills(&self, type_id: i64, activity_id: i64) -> &[SkillRow] {
        self.skills
            .get(&(type_id, activity_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Success probability; only invention-style activities have a row, so
    /// absence means certain success.
    pub fn probability(&self, type_id: i64, activity_id: i64) -> f64 {
        self.probabilities
            .get(&(type_id, activity_id))
            .copied()
            .unwrap_or(1.0)
    }
}
