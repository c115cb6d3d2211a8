//! Property tests for catalog ordering and the single-active config rule.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tessera_core::{Catalog, ConfigManager, ConfigStatus, Entity, Error, Versioned};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Venue {
    id: i64,
    name: String,
}

impl Entity for Venue {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RateLimits {
    version: i64,
    status: ConfigStatus,
    per_minute: u32,
}

impl Versioned for RateLimits {
    fn version(&self) -> i64 {
        self.version
    }

    fn status(&self) -> ConfigStatus {
        self.status
    }

    fn set_status(&mut self, status: ConfigStatus) {
        self.status = status;
    }
}

#[derive(Debug, Clone)]
enum CatalogOp {
    Insert(i64),
    Update(i64),
    Remove(i64),
}

fn catalog_op() -> impl Strategy<Value = CatalogOp> {
    prop_oneof![
        (1i64..40).prop_map(CatalogOp::Insert),
        (1i64..40).prop_map(CatalogOp::Update),
        (1i64..40).prop_map(CatalogOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum ConfigOp {
    Add(i64, bool),
    Update(i64, bool, u32),
    Activate(i64),
    Remove(i64),
    Deactivate,
}

fn config_op() -> impl Strategy<Value = ConfigOp> {
    prop_oneof![
        (0i64..8, any::<bool>()).prop_map(|(v, a)| ConfigOp::Add(v, a)),
        (0i64..8, any::<bool>(), 0u32..100).prop_map(|(v, a, n)| ConfigOp::Update(v, a, n)),
        (0i64..8).prop_map(ConfigOp::Activate),
        (0i64..8).prop_map(ConfigOp::Remove),
        Just(ConfigOp::Deactivate),
    ]
}

fn status(active: bool) -> ConfigStatus {
    if active {
        ConfigStatus::Active
    } else {
        ConfigStatus::Inactive
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn catalog_stays_sorted_and_unique(ops in prop::collection::vec(catalog_op(), 1..80)) {
        let mut catalog = Catalog::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                CatalogOp::Insert(id) => {
                    let result = catalog.insert(&Venue { id, name: format!("v{id}") });
                    if model.insert(id) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert_eq!(result.unwrap_err(), Error::DuplicateIdentity(id));
                    }
                }
                CatalogOp::Update(id) => {
                    let result = catalog.update(&Venue { id, name: "renamed".to_string() });
                    if model.contains(&id) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert_eq!(result.unwrap_err(), Error::IdentityNotFound(id));
                    }
                }
                CatalogOp::Remove(id) => {
                    let removed = catalog.remove(id).unwrap();
                    prop_assert_eq!(removed.is_some(), model.remove(&id));
                }
            }

            let ids = catalog.ids();
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert_eq!(ids, model.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(catalog.len(), model.len());
        }
    }

    #[test]
    fn config_has_at_most_one_active(ops in prop::collection::vec(config_op(), 1..80)) {
        let mut manager = ConfigManager::new();

        for op in ops {
            let size_before = manager.len();
            let active_before = manager.active_version();

            let failed = match op {
                ConfigOp::Add(version, active) => manager
                    .add(&RateLimits { version, status: status(active), per_minute: 10 })
                    .is_err(),
                ConfigOp::Update(version, active, per_minute) => manager
                    .update(&RateLimits { version, status: status(active), per_minute })
                    .is_err(),
                ConfigOp::Activate(version) => manager.activate(version).is_err(),
                ConfigOp::Remove(version) => manager.remove(version).is_err(),
                ConfigOp::Deactivate => {
                    manager.deactivate();
                    false
                }
            };

            if failed {
                prop_assert_eq!(manager.len(), size_before);
                prop_assert_eq!(manager.active_version(), active_before);
            }

            let active: Vec<i64> = manager
                .get_all()
                .iter()
                .filter(|c| c.status.is_active())
                .map(|c| c.version)
                .collect();
            prop_assert!(active.len() <= 1);
            prop_assert_eq!(active.first().copied(), manager.active_version());
        }
    }
}

#[test]
fn test_records_loaded_from_json() {
    let raw = r#"[
        {"version": 1, "status": 1, "per_minute": 60},
        {"version": 2, "status": 0, "per_minute": 120}
    ]"#;
    let records: Vec<RateLimits> = serde_json::from_str(raw).unwrap();

    let mut manager = ConfigManager::new();
    for record in &records {
        manager.add(record).unwrap();
    }
    manager.activate(2).unwrap();

    let active = manager.active().unwrap();
    assert_eq!(active.per_minute, 120);
    assert_eq!(
        manager.get(1).unwrap().unwrap().status,
        ConfigStatus::Inactive
    );

    let dumped = serde_json::to_value(manager.get_all()).unwrap();
    assert_eq!(dumped[0]["status"], 0);
    assert_eq!(dumped[1]["status"], 1);
}

#[test]
fn test_unknown_status_code_rejected() {
    let raw = r#"{"version": 1, "status": 7, "per_minute": 60}"#;
    assert!(serde_json::from_str::<RateLimits>(raw).is_err());
}

#[test]
fn test_catalog_lifecycle() {
    let mut catalog = Catalog::new();
    assert!(catalog.find_by_id(5).unwrap().is_none());

    let mut venue = Venue {
        id: 5,
        name: "Crocodile".to_string(),
    };
    catalog.insert(&venue).unwrap();
    venue.name.clear();

    assert_eq!(catalog.find_by_id(5).unwrap().unwrap().name, "Crocodile");
    assert_eq!(
        catalog.insert(&venue).unwrap_err(),
        Error::DuplicateIdentity(5)
    );

    catalog.remove(5).unwrap();
    assert!(catalog.find_by_id(5).unwrap().is_none());
}
