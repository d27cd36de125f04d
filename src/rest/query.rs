//! Sparse query-string encoding for request parameter structs.

use serde::Serialize;
use serde_json::{Number, Value};

/// Serializes a params struct into ordered query parameters.
///
/// Only fields holding a meaningful value are emitted. Nulls, empty
/// strings, zero numbers, `false`, and empty lists are omitted. Lists are
/// joined with commas. Nested objects are sent as JSON strings.
///
/// Fields are emitted in the order the struct declares them.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `params` cannot be serialized.
///
/// # Example
///
/// ```rust
/// use aftership_api::rest::to_query;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Params {
///     page: u32,
///     limit: u32,
///     keyword: String,
///     slug: Vec<String>,
/// }
///
/// let query = to_query(&Params {
///     page: 2,
///     limit: 0,
///     keyword: String::new(),
///     slug: vec!["dhl".into(), "ups".into()],
/// })
/// .unwrap();
///
/// assert_eq!(
///     query,
///     vec![
///         ("page".to_string(), "2".to_string()),
///         ("slug".to_string(), "dhl,ups".to_string()),
///     ]
/// );
/// ```
pub fn to_query<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, serde_json::Error> {
    let value = serde_json::to_value(params)?;

    let mut query = Vec::new();

    if let Value::Object(map) = value {
        for (key, val) in map {
            match val {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => query.push((key, "true".to_string())),
                Value::String(s) => {
                    if !s.is_empty() {
                        query.push((key, s));
                    }
                }
                Value::Number(n) => {
                    if !is_zero(&n) {
                        query.push((key, n.to_string()));
                    }
                }
                Value::Array(arr) => {
                    let values: Vec<String> = arr
                        .iter()
                        .filter_map(|v| match v {
                            Value::String(s) if !s.is_empty() => Some(s.clone()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect();
                    if !values.is_empty() {
                        query.push((key, values.join(",")));
                    }
                }
                Value::Object(ref map) => {
                    if !map.is_empty() {
                        query.push((key, val.to_string()));
                    }
                }
            }
        }
    }

    Ok(query)
}

fn is_zero(n: &Number) -> bool {
    n.as_u64() == Some(0)
        || n.as_i64() == Some(0)
        || n.as_f64() == Some(0.0)
}
