//! Evaluation of the small query dialect the engine emits.

use core::cmp::Ordering;

use barstore_core::{Document, Filter, SortDirection, SortSpec};
use serde_json::Value;

/// True when `doc` satisfies every condition in `filter`.
///
/// A `null` filter matches everything. Array-valued fields match a condition
/// when any element does, as in the production store.
pub fn matches(doc: &Document, filter: &Filter) -> bool {
    let Some(conds) = filter.as_object() else {
        return filter.is_null();
    };
    conds
        .iter()
        .all(|(key, cond)| field_matches(doc.get(key), cond))
}

fn field_matches(value: Option<&Value>, cond: &Value) -> bool {
    match cond.as_object() {
        Some(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
            ops.iter().all(|(op, arg)| op_matches(value, op, arg))
        }
        _ => any_element(value, |v| v == cond),
    }
}

fn op_matches(value: Option<&Value>, op: &str, arg: &Value) -> bool {
    let ordered = |accept: &[Ordering]| {
        any_element(value, |v| compare(v, arg).is_some_and(|o| accept.contains(&o)))
    };
    match op {
        "$eq" => any_element(value, |v| v == arg),
        "$ne" => !any_element(value, |v| v == arg),
        "$gt" => ordered(&[Ordering::Greater]),
        "$gte" => ordered(&[Ordering::Greater, Ordering::Equal]),
        "$lt" => ordered(&[Ordering::Less]),
        "$lte" => ordered(&[Ordering::Less, Ordering::Equal]),
        "$in" => arg
            .as_array()
            .is_some_and(|opts| opts.iter().any(|o| any_element(value, |v| v == o))),
        _ => false,
    }
}

fn any_element(value: Option<&Value>, pred: impl Fn(&Value) -> bool) -> bool {
    let Some(v) = value else {
        return false;
    };
    match v.as_array() {
        Some(items) => pred(v) || items.iter().any(|x| pred(x)),
        None => pred(v),
    }
}

/// Order two scalars of the same JSON type; mixed types are unordered.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Apply an inclusion or exclusion projection.
///
/// `{"_id": 0, "_d": 0}` drops those keys; `{"close": 1}` keeps only `close`
/// (and `_id` unless it is excluded explicitly).
pub fn project(doc: &Document, projection: Option<&Value>) -> Document {
    let Some(spec) = projection.and_then(Value::as_object) else {
        return doc.clone();
    };
    let included: Vec<&str> = spec
        .iter()
        .filter(|(_, v)| truthy(v))
        .map(|(k, _)| k.as_str())
        .collect();
    doc.iter()
        .filter(|(k, _)| {
            if included.is_empty() {
                !spec.contains_key(k.as_str())
            } else {
                included.contains(&k.as_str()) || (k.as_str() == "_id" && !spec.contains_key("_id"))
            }
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Stable sort on `sort.key`. Documents missing the key sort first; array
/// keys sort by their smallest element ascending and largest descending.
pub fn sort_documents(docs: &mut [Document], sort: &SortSpec) {
    let key_of = |doc: &Document| -> Option<Value> {
        let v = doc.get(&sort.key)?;
        match v {
            Value::Array(items) => {
                let pick = items.iter().filter(|x| !x.is_null());
                let extreme = match sort.direction {
                    SortDirection::Ascending => {
                        pick.min_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal))
                    }
                    SortDirection::Descending => {
                        pick.max_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal))
                    }
                };
                extreme.cloned()
            }
            other => Some(other.clone()),
        }
    };
    docs.sort_by(|a, b| {
        let ord = match (key_of(a), key_of(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare(&x, &y).unwrap_or(Ordering::Equal),
        };
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
