//! Seed tables shared by the test suites.

use serde_json::{Value as Json, json};
use sophconf::{Config, InitTable};

/// The nested reference document:
///
/// ```text
/// option1 = 5
/// section1.option2 = true
/// section1.section3 = {}
/// ```
pub fn scenario_json() -> Json {
    json!({
        "option1": 5,
        "section1": {
            "option2": true,
            "section3": {}
        }
    })
}

/// [`scenario_json`] as a seed table.
pub fn scenario_seed() -> InitTable {
    table(scenario_json())
}

/// [`scenario_json`] built into an unprotected, untyped tree.
pub fn scenario_config() -> Config {
    Config::from_table(scenario_seed())
}

/// A deeper document with every scalar kind, used by the store tests.
pub fn application_json() -> Json {
    json!({
        "name": "simulation",
        "verbose": false,
        "threads": 4,
        "tolerance": 0.001,
        "tags": ["fast", "nightly"],
        "Simulation": {
            "steps": 1000,
            "dt": 0.5,
            "Output": {
                "directory": "out",
                "every": 10
            }
        },
        "Solver": {
            "method": "rk4"
        }
    })
}

/// Convert a JSON object into a seed table.
///
/// # Panics
/// Panics if `value` is not an object.
pub fn table(value: Json) -> InitTable {
    serde_json::from_value(value).expect("seed must be a JSON object")
}
