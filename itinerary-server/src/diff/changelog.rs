//! Structural changelogs between two serializable values.
//!
//! Both values are rendered to `serde_json::Value` and the two trees are
//! walked together: objects by key, arrays by index. Every leaf that differs
//! becomes one [`Change`] carrying the path to it.

use serde::Serialize;
use serde_json::Value;

use super::DiffError;

/// What happened at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// One field-level difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Field names and array indices from the root to the changed value.
    pub path: Vec<String>,
    pub from: Option<Value>,
    pub to: Option<Value>,
}

impl Change {
    fn create(path: &[String], to: &Value) -> Self {
        Self {
            kind: ChangeKind::Create,
            path: path.to_vec(),
            from: None,
            to: Some(to.clone()),
        }
    }

    fn update(path: &[String], from: &Value, to: &Value) -> Self {
        Self {
            kind: ChangeKind::Update,
            path: path.to_vec(),
            from: Some(from.clone()),
            to: Some(to.clone()),
        }
    }

    fn delete(path: &[String], from: &Value) -> Self {
        Self {
            kind: ChangeKind::Delete,
            path: path.to_vec(),
            from: Some(from.clone()),
            to: None,
        }
    }
}

/// Ordered list of changes turning one value into another.
pub type Changelog = Vec<Change>;

/// Compute the changes that turn `a` into `b`.
///
/// # Errors
///
/// Returns `Err` if either value fails to serialize.
///
/// # Examples
///
/// ```
/// use itinerary_server::diff::{ChangeKind, changelog};
/// use serde_json::json;
///
/// let a = json!({ "class": "Y", "stops": 0 });
/// let b = json!({ "class": "J", "stops": 0 });
///
/// let changes = changelog(&a, &b).unwrap();
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes[0].kind, ChangeKind::Update);
/// assert_eq!(changes[0].path, vec!["class".to_string()]);
/// ```
pub fn changelog<T: Serialize + ?Sized>(a: &T, b: &T) -> Result<Changelog, DiffError> {
    let a = serde_json::to_value(a)?;
    let b = serde_json::to_value(b)?;

    let mut changes = Changelog::new();
    walk(&a, &b, &mut Vec::new(), &mut changes);
    Ok(changes)
}

fn walk(a: &Value, b: &Value, path: &mut Vec<String>, out: &mut Changelog) {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            for (key, from) in left {
                path.push(key.clone());
                match right.get(key) {
                    Some(to) => walk(from, to, path, out),
                    None => out.push(Change::delete(path, from)),
                }
                path.pop();
            }
            for (key, to) in right {
                if !left.contains_key(key) {
                    path.push(key.clone());
                    out.push(Change::create(path, to));
                    path.pop();
                }
            }
        }
        (Value::Array(left), Value::Array(right)) => {
            for i in 0..left.len().max(right.len()) {
                path.push(i.to_string());
                match (left.get(i), right.get(i)) {
                    (Some(from), Some(to)) => walk(from, to, path, out),
                    (Some(from), None) => out.push(Change::delete(path, from)),
                    (None, Some(to)) => out.push(Change::create(path, to)),
                    (None, None) => {}
                }
                path.pop();
            }
        }
        _ if a == b => {}
        (Value::Null, to) => out.push(Change::create(path, to)),
        (from, Value::Null) => out.push(Change::delete(path, from)),
        (from, to) => out.push(Change::update(path, from, to)),
    }
}
