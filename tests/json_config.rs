use std::io::Write;

use fitrule::{BlameMode, CompileError, Context, FitruleError, RuleCollection, RuleGroup};

const PRICING: &str = r#"{
    "name": "pricing",
    "msg": "no price tier",
    "groups": [
        {
            "name": "wholesale",
            "logic": "1 and (2 or 3)",
            "value": 0.7,
            "rules": [
                { "op": "=",  "key": "account.kind",  "val": "business" },
                { "op": ">=", "key": "order.units",   "val": 100 },
                { "op": "in", "key": "account.tier",  "val": "gold,platinum" }
            ]
        },
        {
            "logic": "",
            "value": 0.9,
            "blame_mode": "exhaustive",
            "rules": [
                { "op": "gte", "key": "order.units", "val": 10 }
            ]
        },
        {
            "name": "retail",
            "value": 1.0,
            "rules": []
        }
    ]
}"#;

fn order(kind: &str, units: i64, tier: &str) -> Context {
    Context::from_json(&serde_json::json!({
        "account": { "kind": kind, "tier": tier },
        "order": { "units": units }
    }))
}

#[test]
fn collection_from_json() {
    let pricing = RuleCollection::from_json(PRICING).unwrap();
    assert_eq!(pricing.name(), "pricing");
    assert_eq!(pricing.msg(), "no price tier");
    assert_eq!(pricing.groups().len(), 3);
    assert_eq!(pricing.groups()[1].name(), Some("2"));
    assert_eq!(pricing.groups()[1].blame_mode(), BlameMode::Exhaustive);
}

#[test]
fn first_fitting_group_wins() {
    let pricing = RuleCollection::from_json(PRICING).unwrap();
    assert_eq!(pricing.fit_f64(&order("business", 500, "bronze")), Some(0.7));
    assert_eq!(pricing.fit_f64(&order("consumer", 50, "gold")), Some(0.9));
    assert_eq!(pricing.fit_f64(&order("consumer", 1, "none")), Some(1.0));
}

#[test]
fn later_disjuncts_do_not_rescue_a_group() {
    let pricing = RuleCollection::from_json(PRICING).unwrap();
    let ctx = order("business", 5, "gold");
    assert!(!pricing.groups()[0].fits(&ctx));
    assert_eq!(pricing.fit(&ctx).and_then(RuleGroup::name), Some("retail"));
}

#[test]
fn fit_all_lists_every_match() {
    let pricing = RuleCollection::from_json(PRICING).unwrap();
    assert_eq!(
        pricing.fit_all(&order("business", 500, "bronze")),
        vec!["wholesale", "2", "retail"]
    );
    assert_eq!(pricing.fit_all(&order("consumer", 1, "none")), vec!["retail"]);
}

#[test]
fn typed_getters_reject_other_types() {
    let pricing = RuleCollection::from_json(PRICING).unwrap();
    let ctx = order("business", 500, "gold");
    assert_eq!(pricing.fit_i64(&ctx), None);
    assert_eq!(pricing.fit_str(&ctx), None);
    assert_eq!(pricing.fit_bool(&ctx), None);
    assert_eq!(pricing.fit_i64(&ctx).unwrap_or_default(), 0);
}

#[test]
fn collection_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PRICING.as_bytes()).unwrap();
    let pricing = RuleCollection::from_file(file.path()).unwrap();
    assert_eq!(pricing.groups().len(), 3);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RuleCollection::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FitruleError::Io(_)));
}

#[test]
fn malformed_json_is_json_error() {
    let err = RuleCollection::from_json(r#"{ "groups": [ { "rules": 3 } ] }"#).unwrap_err();
    assert!(matches!(err, FitruleError::Json(_)));
}

#[test]
fn bad_group_fails_the_whole_collection() {
    let text = r#"{ "groups": [
        { "rules": [ { "op": "=", "key": "a", "val": 1 } ], "logic": "1" },
        { "rules": [ { "op": "=", "key": "a", "val": 1 } ], "logic": "1 and 2" }
    ] }"#;
    let err = RuleCollection::from_json(text).unwrap_err();
    assert!(matches!(
        err,
        FitruleError::Compile(CompileError::UndefinedAtomRef { id: 2 })
    ));
}

#[test]
fn group_from_json_with_explicit_ids() {
    let group = RuleGroup::from_json(
        r#"[
            { "op": "nempty", "key": "token", "id": 7 },
            { "op": "!@",     "key": "role",  "val": "guest,anonymous", "id": 3 }
        ]"#,
        "7 AND 3",
    )
    .unwrap();
    assert_eq!(group.logic(), "7 and 3");
    let ctx = Context::new().set("token", "abc").set("role", "admin");
    assert!(group.fits(&ctx));
    let ctx = Context::new().set("token", "abc").set("role", "guest");
    assert_eq!(group.evaluate(&ctx).reason_ids().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn error_messages_are_readable() {
    let err = RuleGroup::from_json(r#"[{ "op": "like", "key": "a" }]"#, "").unwrap_err();
    assert_eq!(err.to_string(), "unknown operator 'like' on atom 1");
}
