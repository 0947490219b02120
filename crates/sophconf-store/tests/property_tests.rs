use proptest::prelude::*;
use sophconf::{Config, Value};
use sophconf_store::{ConfigStore, Format};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn test_toml_and_json_roundtrip(
        options in prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", scalar(), 0..8),
        nested in prop::collection::btree_map("[A-Z][a-z]{0,8}", scalar(), 0..4),
    ) {
        let mut config = Config::new();
        for (name, value) in &options {
            config.create_option(name, value.clone());
        }
        config.create_section("Nested", None);
        let section = config.section_mut("Nested").unwrap();
        for (name, value) in &nested {
            section.create_option(name, value.clone());
        }

        let store = ConfigStore::new();
        for format in [Format::Toml, Format::Json] {
            let text = store.to_string(&config, format).unwrap();
            let loaded = store.parse_str(&text, format).unwrap();
            prop_assert_eq!(&loaded, &config);
        }
    }
}
