//! The fixed industry activity table.
//!
//! Activities are not fetched; the set is a game constant.

use crate::lookup::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub id: i64,
    pub name: &'static str,
}

pub const MANUFACTURING: i64 = 1;
pub const REACTIONS: i64 = 9;

pub static ACTIVITIES: &[Activity] = &[
    Activity {
        id: MANUFACTURING,
        name: "Manufacturing",
    },
    Activity {
        id: 3,
        name: "Researching Time Efficiency",
    },
    Activity {
        id: 4,
        name: "Researching Material Efficiency",
    },
    Activity {
        id: 5,
        name: "Copying",
    },
    Activity {
        id: 8,
        name: "Invention",
    },
    Activity {
        id: REACTIONS,
        name: "Reactions",
    },
];

pub fn activity_name(activity_id: i64) -> Result<&'static str, LookupError> {
    ACTIVITIES
        .iter()
        .find(|activity| activity.id == activity_id)
        .map(|activity| activity.name)
        .ok_or(LookupError::Activity(activity_id))
}
