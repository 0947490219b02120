//! End-to-end scenarios across sophconf and sophconf-store

use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;
use sophconf::{Config, Error, OptionType, Policy, TypedOption, Value};
use sophconf_store::ConfigStore;
use sophconf_test_utils::dir::TestDir;
use sophconf_test_utils::seeds::{application_json, table};

#[test]
fn test_edit_saved_config_and_reload() {
    let dir = TestDir::new();
    let path = dir.path("settings/app.toml");
    let store = ConfigStore::new();

    store
        .save(&path, &Config::from_table(table(application_json())))
        .unwrap();
    dir.assert_file_exists("settings/app.toml");

    let mut config = store.load(&path).unwrap();
    config.set("verbose", true).unwrap();
    config
        .lookup_section_mut("Simulation.Output")
        .unwrap()
        .set("every", 25)
        .unwrap();
    config.remove_section("Solver").unwrap();
    store.save(&path, &config).unwrap();

    let reloaded = store.load(&path).unwrap();
    assert_eq!(reloaded.option("verbose").unwrap(), &Value::Bool(true));
    assert_eq!(
        reloaded.lookup("Simulation.Output.every").unwrap().as_value(),
        Some(&Value::Integer(25))
    );
    assert!(!reloaded.contains("Solver"));
    assert_eq!(reloaded, config);
}

#[test]
fn test_strict_root_over_file() {
    let dir = TestDir::new();
    let path = dir.write(
        "app.json",
        &json!({"threads": 4, "Solver": {"method": "rk4"}}).to_string(),
    );

    let mut config = ConfigStore::with_policy(Policy::strict()).load(&path).unwrap();
    let before = config.clone();

    let failures = [
        config.set("thread", 2).unwrap_err(),
        config.set("threads", 2.0).unwrap_err(),
        config.set("Solver", "euler").unwrap_err(),
    ];
    let codes: Vec<&str> = failures.iter().map(Error::code).collect();
    assert_eq!(
        codes,
        vec!["CREATION_FORBIDDEN", "TYPE_MISMATCH", "SECTION_IMMUTABLE"]
    );
    assert_eq!(config, before);
}

#[test]
fn test_typed_option_reads_loaded_values() {
    let store = ConfigStore::new();
    let config = store
        .parse_str("weight = 32.1\ncount = \"7\"\n", sophconf_store::Format::Toml)
        .unwrap();

    let weight = TypedOption::new(
        "weight",
        config.option("weight").unwrap().clone(),
        OptionType::Int,
    );
    assert_eq!(weight.get().unwrap(), Value::Integer(32));

    let count = TypedOption::new(
        "count",
        config.option("count").unwrap().clone(),
        OptionType::Float,
    );
    assert_eq!(count.get().unwrap(), Value::Float(7.0));
}

#[test]
fn test_shared_tree_behind_mutex() {
    let config = Arc::new(Mutex::new(Config::new()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let mut guard = config.lock().unwrap();
                guard.set(&format!("worker{i}"), i).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let guard = config.lock().unwrap();
    assert_eq!(guard.len(), 4);
    assert_eq!(guard.option("worker3").unwrap(), &Value::Integer(3));
}
