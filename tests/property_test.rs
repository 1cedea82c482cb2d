use proptest::prelude::*;
use relsql::prelude::*;

const FIELDS: [&str; 5] = ["a", "b", "doc__k", "doc__0", "c"];
const SUFFIXES: [&str; 11] = [
    "", "__gt", "__not_eq", "__in", "__like", "__not_lte", "__has", "__null", "__any", "__not_any",
    "__all",
];

fn arb_scalar() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<i64>().prop_map(serde_json::Value::from),
        any::<bool>().prop_map(serde_json::Value::from),
        "[a-z%_]{0,6}".prop_map(serde_json::Value::from),
    ]
}

fn arb_list() -> impl Strategy<Value = serde_json::Value> {
    prop::collection::vec(arb_scalar(), 0..4).prop_map(serde_json::Value::Array)
}

/// Keyword pairs with distinct keys and values the operator accepts.
fn arb_pairs() -> impl Strategy<Value = Vec<(String, serde_json::Value)>> {
    prop::collection::btree_map(
        (0..FIELDS.len(), 0..SUFFIXES.len()),
        (arb_scalar(), arb_list()),
        1..6,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|((field, suffix), (scalar, list))| {
                let suffix = SUFFIXES[suffix];
                let value = match suffix {
                    "__in" | "__has" | "__any" | "__not_any" | "__all" => list,
                    _ => scalar,
                };
                (format!("{}{suffix}", FIELDS[field]), value)
            })
            .collect()
    })
}

fn query(pairs: &[(String, serde_json::Value)]) -> Statement {
    let inner = Statement::select(terms!["id"])
        .and_then(|inner| inner.from(terms!["places"]))
        .and_then(|inner| inner.filter(Terms::kwargs(pairs.to_vec())))
        .unwrap();

    let nested = Criteria::or(terms![place__in = inner]).unwrap();

    Statement::select(terms!["*"])
        .and_then(|outer| outer.from(terms!["people"]))
        .and_then(|outer| outer.filter(Terms::kwargs(pairs.to_vec()).arg(nested)))
        .and_then(|outer| outer.limit(terms![10, 5]))
        .unwrap()
}

proptest! {
    #[test]
    fn placeholders_match_args(pairs in arb_pairs(), indent in 0usize..4) {
        for dialect in [Dialect::default(), Dialect::mysql(), Dialect::postgres()] {
            let mut query = query(&pairs);
            let (sql, args) = query.render_pretty(&dialect, indent);
            prop_assert_eq!(sql.matches(dialect.placeholder.as_str()).count(), args.len());
        }
    }

    #[test]
    fn no_dangling_keywords(pairs in arb_pairs(), indent in 0usize..4) {
        let mut query = Statement::select(terms!["*"])
            .and_then(|query| query.filter(Terms::kwargs(pairs.clone())))
            .unwrap();

        let (sql, _) = query.render_pretty(&Dialect::default(), indent);
        let sql = sql.trim_end();
        prop_assert!(!sql.ends_with("WHERE"), "{}", sql);
        prop_assert!(!sql.ends_with("NOT"), "{}", sql);
        prop_assert!(!sql.contains("()"), "{}", sql);

        let mut criteria = Criteria::and(Terms::kwargs(pairs)).unwrap();
        let (sql, _) = criteria.render(&Dialect::default());
        prop_assert_eq!(criteria.is_empty(), sql.is_empty());
    }

    #[test]
    fn keyword_order_is_irrelevant(pairs in arb_pairs()) {
        let mut reversed = pairs.clone();
        reversed.reverse();

        let mut forward = Criteria::and(Terms::kwargs(pairs)).unwrap();
        let mut backward = Criteria::and(Terms::kwargs(reversed)).unwrap();

        let dialect = Dialect::default();
        prop_assert_eq!(forward.render(&dialect), backward.render(&dialect));
    }

    #[test]
    fn generate_is_idempotent(pairs in arb_pairs(), indent in 0usize..4) {
        let dialect = Dialect::default();
        let mut query = query(&pairs);

        let first = query.render_pretty(&dialect, indent);
        let second = query.render_pretty(&dialect, indent);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn clones_carry_no_cache(pairs in arb_pairs()) {
        let mut query = query(&pairs);
        query.render(&Dialect::default());

        let copy = query.clone();
        prop_assert!(!copy.rendered().is_rendered());
        prop_assert!(copy.clauses().iter().all(|clause| !clause.rendered().is_rendered()));
    }

    #[test]
    fn empty_in_is_constant(field in 0..FIELDS.len(), invert in any::<bool>()) {
        let mut terms = Terms::new().arg(FIELDS[field]).arg(Vec::<i64>::new());
        if invert {
            terms = terms.invert();
        }

        let mut criterion = Criterion::from_terms(Comparison::In, terms).unwrap();
        let (sql, args) = criterion.render(&Dialect::default());
        prop_assert_eq!(sql, "%s");
        prop_assert_eq!(args, vec![serde_json::Value::Bool(invert)]);
    }
}
