use std::sync::Arc;
use std::thread;

use fitrule::{AtomId, Context, RuleGroup, RuleGroupBuilder, TreeCache, atom};

fn eligibility() -> RuleGroup {
    RuleGroupBuilder::new()
        .atom(atom("user.age", ">=", 18_i64).msg("underage"))
        .atom(atom("user.status", "=", "active").msg("inactive account"))
        .atom(atom("user.banned", "=", true).msg("banned"))
        .logic("1 and 2 and not 3")
        .name("eligible")
        .compile()
        .unwrap()
}

#[test]
fn evaluate_across_threads() {
    let group = Arc::new(eligibility());

    let records = vec![
        (25_i64, "active", false),
        (30, "active", true),
        (15, "active", false),
        (25, "inactive", false),
    ];

    let handles: Vec<_> = records
        .into_iter()
        .map(|(age, status, banned)| {
            let group = Arc::clone(&group);
            thread::spawn(move || {
                let ctx = Context::new()
                    .set("user.age", age)
                    .set("user.status", status)
                    .set("user.banned", banned);
                group.evaluate(&ctx).reason_ids().collect::<Vec<AtomId>>()
            })
        })
        .collect();

    let results: Vec<Vec<AtomId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], Vec::<AtomId>::new());
    assert_eq!(results[1], vec![3]);
    assert_eq!(results[2], vec![1]);
    assert_eq!(results[3], vec![2]);
}

#[test]
fn concurrent_compilation_shares_one_tree() {
    let cache = Arc::new(TreeCache::new());

    let handles: Vec<_> = (0_i64..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                // Spelling varies per thread, the normalized text does not.
                let logic = if i % 2 == 0 {
                    "(1 OR 2) and not 3"
                } else {
                    "( 1 or 2 )AND NOT 3"
                };
                RuleGroupBuilder::new()
                    .atom(atom("a", "=", i))
                    .atom(atom("b", "=", 1_i64))
                    .atom(atom("c", "=", 1_i64))
                    .logic(logic)
                    .compile_with_cache(&cache)
                    .unwrap()
            })
        })
        .collect();

    let groups: Vec<RuleGroup> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(cache.len(), 1);
    let first = groups[0].tree().unwrap();
    for group in &groups[1..] {
        assert!(std::ptr::eq(first, group.tree().unwrap()));
    }
}
