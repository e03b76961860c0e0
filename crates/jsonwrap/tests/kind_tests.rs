use jsonwrap::{is_leaf, is_node};
use serde_json::json;

#[test]
fn leaves() {
    for value in [json!(null), json!(true), json!(0), json!(-2.5), json!(""), json!("x")] {
        assert!(is_leaf(&value), "{value} should be a leaf");
        assert!(!is_node(&value), "{value} should not be a node");
    }
}

#[test]
fn nodes() {
    for value in [json!([]), json!([1]), json!({}), json!({"a": {"b": []}})] {
        assert!(is_node(&value), "{value} should be a node");
        assert!(!is_leaf(&value), "{value} should not be a leaf");
    }
}
