//! Classification of tree values into leaves and nodes.

use serde_json::Value;

/// `true` if `value` is a boolean, number, string or null.
///
/// ```
/// use serde_json::json;
/// use jsonwrap::is_leaf;
///
/// assert!(is_leaf(&json!(null)));
/// assert!(!is_leaf(&json!([1])));
/// ```
pub fn is_leaf(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// `true` if `value` is a sequence or a mapping.
///
/// ```
/// use serde_json::json;
/// use jsonwrap::is_node;
///
/// assert!(is_node(&json!({})));
/// assert!(!is_node(&json!("x")));
/// ```
pub fn is_node(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}
