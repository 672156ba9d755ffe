use proptest::prelude::*;
use scim_expr::{compile_filter, compile_path, compile_path_in, AttrPath, CompareOp, Filter, Step};
use serde_json::json;

const USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

fn attribute_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,8}"
}

fn dotted_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(attribute_name(), 1..5)
}

fn leaf() -> impl Strategy<Value = Filter> {
    let attr = prop::sample::select(vec!["type", "value", "primary", "display", "meta.version"]);
    let op = prop::sample::select(vec![
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Co,
        CompareOp::Sw,
        CompareOp::Gt,
        CompareOp::Le,
    ]);
    prop_oneof![
        (attr.clone(), op, "[a-z@. ]{0,6}").prop_map(|(a, op, v)| {
            Filter::compare(AttrPath::new(a.split('.').map(str::to_string).collect()), op, json!(v))
        }),
        (attr.clone(), any::<i32>())
            .prop_map(|(a, n)| Filter::compare(AttrPath::single(a), CompareOp::Eq, json!(n))),
        attr.prop_map(|a| Filter::Present(AttrPath::single(a))),
    ]
}

fn filter() -> impl Strategy<Value = Filter> {
    leaf().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.and(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.or(r)),
            inner.prop_map(Filter::negate),
        ]
    })
}

proptest! {
    #[test]
    fn dotted_paths_compile_to_one_step_per_name(names in dotted_path()) {
        let text = names.join(".");
        let expr = compile_path(&text).unwrap();
        let tokens: Vec<&str> = expr.steps().iter().filter_map(Step::as_path).collect();
        prop_assert_eq!(tokens, names.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(expr.to_string(), text);
    }

    #[test]
    fn next_consumes_one_step_without_mutating(names in dotted_path()) {
        let expr = compile_path(&names.join(".")).unwrap();
        let before = expr.clone();
        let mut cursor = Some(expr.clone());
        let mut seen = Vec::new();
        while let Some(e) = cursor {
            seen.push(e.token().unwrap().to_string());
            cursor = e.next();
        }
        prop_assert_eq!(seen, names);
        prop_assert_eq!(expr, before);
    }

    #[test]
    fn namespace_prefix_becomes_leading_step(names in dotted_path()) {
        let rest = names.join(".");
        let prefixed = compile_path_in(&format!("{USER}:{rest}"), &[USER]).unwrap();
        let plain = compile_path(&rest).unwrap();
        prop_assert_eq!(prefixed.token(), Some(USER));
        prop_assert_eq!(prefixed.next(), Some(plain));
    }

    #[test]
    fn filter_display_is_stable_under_reparse(f in filter()) {
        let shown = f.to_string();
        let reparsed = compile_filter(&shown).unwrap();
        prop_assert_eq!(reparsed.to_string(), shown);
    }
}
