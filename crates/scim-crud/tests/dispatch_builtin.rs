use proptest::prelude::*;
use scim_crud::{add, apply_patch, delete, replace, PatchOp, PatchOperation, PatchRequest};
use scim_prop::Resource;
use scim_schema::{ScimError, SchemaRegistry, ENTERPRISE_USER_SCHEMA, USER_SCHEMA};
use serde_json::{json, Value};

fn user(value: Value) -> Resource {
    let registry = SchemaRegistry::builtin().unwrap();
    Resource::from_json(registry.resource_type("User").unwrap(), value).unwrap()
}

fn bjensen() -> Resource {
    user(json!({
        "schemas": [USER_SCHEMA],
        "id": "2819c223-7f76-453a-919d-413861904646",
        "userName": "bjensen",
        "name": {"givenName": "Barbara", "familyName": "Jensen"},
        "emails": [
            {"value": "bjensen@example.com", "type": "work", "primary": true},
            {"value": "babs@jensen.org", "type": "home"}
        ],
        "phoneNumbers": [{"value": "555-555-8377", "type": "work"}]
    }))
}

#[test]
fn delete_list_payload_removes_each_match() {
    let mut r = bjensen();
    add(
        &mut r,
        "emails",
        json!({"value": "barbara@other.net", "type": "other"}),
    )
    .unwrap();
    delete(
        &mut r,
        "emails",
        Some(json!([
            {"value": "bjensen@example.com"},
            {"value": "barbara@other.net"}
        ])),
    )
    .unwrap();
    assert_eq!(
        r.to_json()["emails"],
        json!([{"value": "babs@jensen.org", "type": "home"}])
    );
}

#[test]
fn delete_with_filtered_path() {
    let mut r = bjensen();
    delete(&mut r, r#"emails[type eq "home"].value"#, None).unwrap();
    assert_eq!(
        r.to_json()["emails"],
        json!([
            {"value": "bjensen@example.com", "type": "work", "primary": true},
            {"type": "home"}
        ])
    );
}

#[test]
fn extension_attributes_are_addressable() {
    let mut r = bjensen();
    let department = format!("{ENTERPRISE_USER_SCHEMA}:department");
    add(&mut r, &department, json!("Tour Operations")).unwrap();
    replace(
        &mut r,
        &format!("{ENTERPRISE_USER_SCHEMA}:manager"),
        json!({"value": "26118915-6090-4610-87e4-49d8ca9f808d"}),
    )
    .unwrap();
    assert_eq!(
        r.to_json()[ENTERPRISE_USER_SCHEMA],
        json!({
            "department": "Tour Operations",
            "manager": {"value": "26118915-6090-4610-87e4-49d8ca9f808d"}
        })
    );
    delete(&mut r, &department, None).unwrap();
    assert_eq!(
        r.to_json()[ENTERPRISE_USER_SCHEMA],
        json!({"manager": {"value": "26118915-6090-4610-87e4-49d8ca9f808d"}})
    );
}

#[test]
fn namespace_case_does_not_matter() {
    let mut r = bjensen();
    let upper = format!("{}:nickName", USER_SCHEMA.to_ascii_uppercase());
    add(&mut r, &upper, json!("Babs")).unwrap();
    assert_eq!(r.to_json()["nickName"], json!("Babs"));
}

#[test]
fn patch_stops_at_first_failure() {
    let mut r = bjensen();
    let ops = vec![
        PatchOperation::new(PatchOp::Replace, Some("displayName"), Some(json!("Babs Jensen"))),
        PatchOperation::new(PatchOp::Add, Some("loginCount"), Some(json!("many"))),
        PatchOperation::new(PatchOp::Add, Some("title"), Some(json!("Tour Guide"))),
    ];
    let err = apply_patch(&mut r, &ops).unwrap_err();
    assert!(matches!(err, ScimError::InvalidValue(_)));
    let json = r.to_json();
    assert_eq!(json["displayName"], json!("Babs Jensen"));
    assert!(json.get("title").is_none());
}

#[test]
fn patch_request_end_to_end() {
    let body = r#"{
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
        "Operations": [
            {"op": "Add", "path": "roles", "value": ["admin"]},
            {"op": "Remove", "path": "emails", "value": {"type": "home"}},
            {"op": "Replace", "value": {"active": false}}
        ]
    }"#;
    let mut r = bjensen();
    PatchRequest::from_json(body).unwrap().apply(&mut r).unwrap();
    let json = r.to_json();
    assert_eq!(json["roles"], json!(["admin"]));
    assert_eq!(json["active"], json!(false));
    assert_eq!(json["emails"].as_array().map(Vec::len), Some(1));
}

#[test]
fn patch_add_without_value_is_invalid() {
    let mut r = bjensen();
    let op = PatchOperation::new(PatchOp::Add, Some("title"), None);
    assert!(matches!(
        apply_patch(&mut r, &[op]),
        Err(ScimError::InvalidValue(_))
    ));
}

fn simple_attribute() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "userName",
        "displayName",
        "nickName",
        "title",
        "locale",
        "name.givenName",
        "name.familyName",
    ])
}

proptest! {
    #[test]
    fn prefixed_paths_resolve_like_plain_paths(
        attr in simple_attribute(),
        value in "[a-zA-Z0-9 ]{1,16}",
        op in 0u8..3,
    ) {
        let mut plain = bjensen();
        let mut prefixed = bjensen();
        let prefixed_path = format!("{USER_SCHEMA}:{attr}");
        let (a, b) = match op {
            0 => (
                add(&mut plain, attr, json!(value)),
                add(&mut prefixed, &prefixed_path, json!(value)),
            ),
            1 => (
                replace(&mut plain, attr, json!(value)),
                replace(&mut prefixed, &prefixed_path, json!(value)),
            ),
            _ => (
                delete(&mut plain, attr, None),
                delete(&mut prefixed, &prefixed_path, None),
            ),
        };
        prop_assert_eq!(a, b);
        prop_assert_eq!(plain.to_json(), prefixed.to_json());
    }

    #[test]
    fn empty_delete_path_always_fails(value in prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(|s| json!(s)),
        "[a-z]{1,8}".prop_map(|s| json!({"value": s})),
    ]) {
        let mut r = bjensen();
        let payload = if value.is_null() { None } else { Some(value) };
        let err = delete(&mut r, "", payload).unwrap_err();
        prop_assert!(matches!(err, ScimError::InvalidPath(_)));
    }

    #[test]
    fn scalar_delete_payload_is_invalid_value(n in any::<i64>(), attr in simple_attribute()) {
        let mut r = bjensen();
        let err = delete(&mut r, attr, Some(json!(n))).unwrap_err();
        prop_assert!(matches!(err, ScimError::InvalidValue(_)));
    }
}
