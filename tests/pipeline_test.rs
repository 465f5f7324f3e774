//! End-to-end pipeline tests over an in-memory table source.
//!
//! These tests feed the catalog the same JSON shapes the zzeve conversion
//! service serves and assert the assembled blueprint output, so the whole
//! fetch-decode-filter-join chain is exercised without a network.

use serde_json::{json, Value};
use std::collections::HashMap;

use eve_sde_blueprints::assemble::assemble;
use eve_sde_blueprints::catalog::{Catalog, REQUIRED_TABLES};
use eve_sde_blueprints::error::Error;
use eve_sde_blueprints::fetch::TableSource;

// =============================================================================
// Fixture Table Source
// =============================================================================

struct FixtureSource {
    tables: HashMap<String, Value>,
}

impl FixtureSource {
    fn new(tables: &[(&str, Value)]) -> Self {
        Self {
            tables: tables
                .iter()
                .map(|(name, rows)| (name.to_string(), rows.clone()))
                .collect(),
        }
    }
}

impl TableSource for FixtureSource {
    fn table(&mut self, name: &str) -> eve_sde_blueprints::Result<Vec<Value>> {
        match self.tables.get(name) {
            Some(Value::Array(rows)) => Ok(rows.clone()),
            Some(_) => Err(Error::MalformedResponse {
                url: format!("fixture://{name}"),
                reason: "expected a JSON array".to_string(),
            }),
            None => Err(Error::TableNotFound(name.to_string())),
        }
    }
}

/// The reference fixture: a manufactured widget, an invented prototype with
/// a success probability, and an unpublished type that must cascade out.
fn fixture_source() -> FixtureSource {
    FixtureSource::new(&[
        (
            "invTypes",
            json!([
                {"typeID": 100, "typeName": "Widget Blueprint", "groupID": 10, "marketGroupID": 500, "published": 1},
                {"typeID": 200, "typeName": "Widget", "groupID": 20, "marketGroupID": 501, "published": 1},
                {"typeID": 300, "typeName": "Mineral", "groupID": 20, "published": 1},
                {"typeID": 900, "typeName": "Industry", "groupID": 20, "published": 1},
                // Unpublished: must vanish from publishedTypeIDs.
                {"typeID": 400, "typeName": "Secret Prototype", "groupID": 20, "published": 0}
            ]),
        ),
        (
            "invGroups",
            json!([
                {"groupID": 10, "groupName": "Blueprints", "categoryID": 1, "published": 1},
                {"groupID": 20, "groupName": "Components", "categoryID": 2, "published": 1}
            ]),
        ),
        (
            "invCategories",
            json!([
                {"categoryID": 1, "categoryName": "Blueprint", "published": 1},
                {"categoryID": 2, "categoryName": "Component", "published": 1}
            ]),
        ),
        (
            "invMarketGroups",
            json!([
                {"marketGroupID": 500, "marketGroupName": "Blueprints & Reactions"},
                {"marketGroupID": 501, "marketGroupName": "Components"}
            ]),
        ),
        (
            "industryActivity",
            json!([
                {"typeID": 100, "activityID": 1, "time": 600},
                {"typeID": 400, "activityID": 1, "time": 60}
            ]),
        ),
        (
            "industryActivityMaterials",
            json!([
                {"typeID": 100, "activityID": 1, "materialTypeID": 300, "quantity": 5}
            ]),
        ),
        (
            "industryActivityProducts",
            json!([
                {"typeID": 100, "activityID": 1, "productTypeID": 200, "quantity": 1},
                // References the unpublished type on the product side.
                {"typeID": 100, "activityID": 1, "productTypeID": 400, "quantity": 1},
                // Unpublished on the blueprint side.
                {"typeID": 400, "activityID": 1, "productTypeID": 200, "quantity": 9},
                // Copying: outside the production activity set.
                {"typeID": 100, "activityID": 5, "productTypeID": 200, "quantity": 1}
            ]),
        ),
        (
            "industryActivitySkills",
            json!([
                {"typeID": 100, "activityID": 1, "skillID": 900, "level": 3}
            ]),
        ),
        ("industryActivityProbabilities", json!([])),
    ])
}

// =============================================================================
// Round-Trip Scenario
// =============================================================================

#[test]
fn assembles_exactly_one_widget_record() {
    let mut source = fixture_source();
    let catalog = Catalog::load(&mut source).unwrap();
    let records = assemble(&catalog);

    assert_eq!(records.len(), 1);
    let record = &records[0];

    assert_eq!(record.activity_type, "Manufacturing");
    assert_eq!(record.time, 600);
    assert_eq!(record.probability, 1.0);
    assert_eq!(record.quantity, 1);
    assert_eq!(record.blueprint.name, "Widget Blueprint");
    assert_eq!(record.product.name, "Widget");
    assert_eq!(record.materials.len(), 1);
    assert_eq!(record.materials[0].name, "Mineral");
    assert_eq!(record.materials[0].quantity, 5);
    assert_eq!(record.skills.len(), 1);
    assert_eq!(record.skills[0].skill_name, "Industry");
    assert_eq!(record.skills[0].level, 3);
}

#[test]
fn unpublished_types_cascade_out_of_the_output() {
    let mut source = fixture_source();
    let catalog = Catalog::load(&mut source).unwrap();

    assert!(!catalog.is_published(400));
    let records = assemble(&catalog);

    // Neither the unpublished product nor the unpublished blueprint made it.
    assert!(records.iter().all(|r| r.product.name != "Secret Prototype"));
    assert!(records.iter().all(|r| r.quantity != 9));
}

#[test]
fn activity_type_is_always_a_known_activity() {
    let mut source = fixture_source();
    let catalog = Catalog::load(&mut source).unwrap();

    const NAMES: &[&str] = &[
        "Manufacturing",
        "Researching Time Efficiency",
        "Researching Material Efficiency",
        "Copying",
        "Invention",
        "Reactions",
    ];

    for record in assemble(&catalog) {
        assert!(NAMES.contains(&record.activity_type.as_str()));
        assert!(record.probability > 0.0 && record.probability <= 1.0);
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn identical_input_produces_byte_identical_output() {
    let run = || {
        let mut source = fixture_source();
        let catalog = Catalog::load(&mut source).unwrap();
        serde_json::to_string(&assemble(&catalog)).unwrap()
    };

    assert_eq!(run(), run());
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn missing_table_is_a_fatal_configuration_error() {
    let mut tables = fixture_source();
    tables.tables.remove("industryActivityMaterials");

    let result = Catalog::load(&mut tables);
    assert!(matches!(
        result,
        Err(Error::TableNotFound(name)) if name == "industryActivityMaterials"
    ));
}

#[test]
fn non_array_table_body_is_malformed() {
    let mut source = fixture_source();
    source
        .tables
        .insert("invTypes".to_string(), json!({"oops": true}));

    let result = Catalog::load(&mut source);
    assert!(matches!(result, Err(Error::MalformedResponse { .. })));
}

#[test]
fn rows_with_the_wrong_shape_are_rejected() {
    let mut source = fixture_source();
    source.tables.insert(
        "invGroups".to_string(),
        json!([{"groupID": "not-a-number", "groupName": "Broken", "categoryID": 1}]),
    );

    let result = Catalog::load(&mut source);
    assert!(matches!(
        result,
        Err(Error::BadRow { table, .. }) if table == "invGroups"
    ));
}

#[test]
fn fixture_covers_every_required_table() {
    let source = fixture_source();
    for name in REQUIRED_TABLES {
        assert!(source.tables.contains_key(*name), "fixture missing {name}");
    }
}

// =============================================================================
// Numeric-String IDs
// =============================================================================

#[test]
fn string_ids_join_against_numeric_ids() {
    let mut source = fixture_source();
    // Re-key the material row with string IDs; the join must still resolve.
    source.tables.insert(
        "industryActivityMaterials".to_string(),
        json!([
            {"typeID": "100", "activityID": "1", "materialTypeID": "300", "quantity": 5}
        ]),
    );

    let catalog = Catalog::load(&mut source).unwrap();
    let records = assemble(&catalog);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].materials[0].name, "Mineral");
}
