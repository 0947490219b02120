use proptest::prelude::*;
use sophconf::{Config, Error, Policy, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn test_fresh_config_has_nothing(n in name()) {
        let c = Config::new();
        let is_not_found = matches!(c.get(&n), Err(Error::NotFound { .. }));
        prop_assert!(is_not_found);
    }

    #[test]
    fn test_create_option_then_get(n in name(), v in scalar()) {
        let mut c = Config::new();
        c.create_option(&n, v.clone());
        prop_assert_eq!(c.option(&n).unwrap(), &v);
    }

    #[test]
    fn test_typed_mismatch_leaves_value(n in name(), old in scalar(), new in scalar()) {
        prop_assume!(old.kind() != new.kind());
        let mut c = Config::with_policy(Policy::typed());
        c.create_option(&n, old.clone());

        let is_mismatch = matches!(c.set(&n, new), Err(Error::TypeMismatch { .. }));
        prop_assert!(is_mismatch);
        prop_assert_eq!(c.option(&n).unwrap(), &old);
    }

    #[test]
    fn test_protected_refuses_unknown_names(n in name(), v in scalar()) {
        let mut c = Config::with_policy(Policy::protected());
        let is_forbidden = matches!(c.set(&n, v), Err(Error::CreationForbidden { .. }));
        prop_assert!(is_forbidden);
        prop_assert!(c.is_empty());
    }

    #[test]
    fn test_sections_survive_assignment(n in name(), v in scalar()) {
        let mut c = Config::new();
        c.create_section(&n, None);
        c.section_mut(&n).unwrap().create_option("inner", 1);
        let before = c.clone();

        let is_immutable = matches!(c.set(&n, v), Err(Error::SectionImmutable { .. }));
        prop_assert!(is_immutable);
        prop_assert_eq!(c, before);
    }
}
