use fitrule::{
    AtomDef, BlameMode, CompileError, Context, NodeKind, RuleGroupBuilder, TreeCache, Value, atom,
    normalize, rule_ids_referenced_by,
};

#[test]
fn group_without_atoms_fits_everything() {
    let group = RuleGroupBuilder::new().compile().unwrap();
    assert!(group.fits(&Context::new()));
}

#[test]
fn whitespace_logic_means_no_logic() {
    let group = RuleGroupBuilder::new()
        .atom(atom("a", "=", 1_i64))
        .atom(atom("b", "=", 1_i64))
        .logic(" \t\n ")
        .compile()
        .unwrap();
    assert!(group.tree().is_none());
    let verdict = group.evaluate(&Context::new().set("a", 1_i64));
    assert_eq!(verdict.reason_ids().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn adjacent_ids_fail_to_compile() {
    let err = RuleGroupBuilder::new()
        .atom(atom("a", "=", 1_i64))
        .atom(atom("b", "=", 1_i64))
        .logic("1 2")
        .compile()
        .unwrap_err();
    assert!(matches!(err, CompileError::MalformedLogic { .. }));
}

#[test]
fn configuration_errors_cache_nothing() {
    let cache = TreeCache::new();
    for logic in ["1 and", "1 or (2", "1 2", "1 and 9"] {
        let result = RuleGroupBuilder::new()
            .atom(atom("a", "=", 1_i64))
            .atom(atom("b", "=", 1_i64))
            .logic(logic)
            .compile_with_cache(&cache);
        assert!(result.is_err(), "compiled {logic:?}");
    }
    assert!(cache.is_empty());
}

#[test]
fn deeply_nested_brackets() {
    let mut logic = "1".to_owned();
    for _ in 0..40 {
        logic = format!("({logic})");
    }
    let group = RuleGroupBuilder::new()
        .atom(atom("x", "=", 1_i64))
        .logic(&logic)
        .compile()
        .unwrap();
    let tree = group.tree().unwrap();
    assert_eq!(tree.nodes().len(), 1);
    assert_eq!(tree.root().kind(), NodeKind::Leaf(1));
    assert!(group.fits(&Context::new().set("x", 1_i64)));
}

#[test]
fn runaway_nesting_is_rejected() {
    let cache = TreeCache::new();
    let n = 5_000;
    let negations = format!("{}1", "not ".repeat(n));
    let brackets = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    for logic in [negations, brackets] {
        let err = RuleGroupBuilder::new()
            .atom(atom("x", "=", 1_i64))
            .logic(&logic)
            .compile_with_cache(&cache)
            .unwrap_err();
        assert!(matches!(err, CompileError::MalformedLogic { .. }));
    }
    assert!(cache.is_empty());
}

#[test]
fn long_disjunction_chain() {
    let atoms: Vec<AtomDef> = (0_i64..30).map(|i| atom("x", "=", i)).collect();
    let logic: Vec<String> = (1..=30).map(|i| i.to_string()).collect();
    let group = RuleGroupBuilder::new()
        .atoms(atoms)
        .logic(&logic.join(" or "))
        .blame_mode(BlameMode::Exhaustive)
        .compile()
        .unwrap();
    assert_eq!(group.tree().unwrap().root().children().len(), 30);
    assert!(group.fits(&Context::new().set("x", 29_i64)));
    assert_eq!(group.evaluate(&Context::new().set("x", 99_i64)).reasons().len(), 30);
}

#[test]
fn same_atom_referenced_twice() {
    let group = RuleGroupBuilder::new()
        .atom(atom("x", ">", 0_i64))
        .logic("1 and not not 1")
        .compile()
        .unwrap();
    assert_eq!(group.tree().unwrap().leaves().count(), 2);
    let verdict = group.evaluate(&Context::new().set("x", 0_i64));
    assert_eq!(verdict.reason_ids().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn nested_map_value_is_unsupported_but_present() {
    let ctx = Context::new().set("user.age", 30_i64);
    let group = RuleGroupBuilder::new()
        .atom(AtomDef::new("user", "nempty"))
        .atom(atom("user", "=", 30_i64))
        .logic("1 and not 2")
        .compile()
        .unwrap();
    assert!(group.fits(&ctx));
}

#[test]
fn path_through_a_scalar_is_absent() {
    let ctx = Context::new().set("user", "alice");
    let group = RuleGroupBuilder::new()
        .atom(AtomDef::new("user.name", "empty"))
        .compile()
        .unwrap();
    assert!(group.fits(&ctx));
}

#[test]
fn bool_fields_compare_as_numbers() {
    let group = RuleGroupBuilder::new()
        .atom(atom("flag", "=", 1_i64))
        .atom(atom("flag", ">", 0.5_f64))
        .compile()
        .unwrap();
    assert!(group.fits(&Context::new().set("flag", true)));
    assert!(!group.fits(&Context::new().set("flag", false)));
}

#[test]
fn verbose_values_show_what_atoms_saw() {
    let group = RuleGroupBuilder::new()
        .atom(atom("a", "=", 1_i64))
        .atom(atom("b.c", "=", "x"))
        .atom(atom("missing", "=", 0_i64))
        .compile()
        .unwrap();
    let report = group.evaluate_verbose(&Context::new().set("a", 2_i64).set("b.c", "x"));
    assert_eq!(report.values()[&1], Some(Value::Int(2)));
    assert_eq!(report.values()[&2], Some(Value::String("x".into())));
    assert_eq!(report.values()[&3], None);
    assert_eq!(
        report.verdict().reason_ids().collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[test]
fn helpers_agree_on_messy_input() {
    let raw = "  7AND( 3or NOT 7 )";
    assert_eq!(normalize(raw), "7 and ( 3 or not 7 )");
    assert_eq!(rule_ids_referenced_by(raw).unwrap(), vec![7, 3]);
}

#[test]
fn invalid_literals_degrade_to_false() {
    let group = RuleGroupBuilder::new()
        .atom(atom("name", "regex", "[unterminated"))
        .atom(atom("age", "between", "18..65"))
        .logic("not 1 and not 2")
        .compile()
        .unwrap();
    let ctx = Context::new().set("name", "[unterminated").set("age", 30_i64);
    assert!(group.fits(&ctx));
}
