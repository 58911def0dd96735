use std::collections::HashMap;

use super::value::{Extracted, Value};

/// Evaluation record: nested string-keyed maps addressed by dot-separated paths.
///
/// Supports nested paths like `"user.profile.age"`.
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, ContextValue>,
}

#[derive(Debug, Clone)]
enum ContextValue {
    Leaf(Value),
    Nested(HashMap<String, ContextValue>),
    /// A value the predicate evaluator cannot compare (e.g. a JSON array).
    Opaque,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at a dot-separated path. Creates intermediate nested maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        Self::insert_recursive(&mut self.data, &segments, ContextValue::Leaf(value));
    }

    /// Build a context from a decoded JSON record.
    ///
    /// Objects become nested maps, `null` fields are left absent and arrays are
    /// kept as opaque values that no comparator accepts. A non-object root
    /// yields an empty context.
    #[must_use]
    pub fn from_json(record: &serde_json::Value) -> Self {
        match record {
            serde_json::Value::Object(map) => Self {
                data: Self::convert_object(map),
            },
            _ => Self::default(),
        }
    }

    /// Look up a value by dot-separated path.
    /// Returns `None` if the path does not exist or points to a nested map.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        match self.lookup_node(path)? {
            ContextValue::Leaf(v) => Some(v),
            ContextValue::Nested(_) | ContextValue::Opaque => None,
        }
    }

    /// Extract the operand for a predicate. Missing keys and non-map
    /// intermediates are [`Extracted::Absent`]; a path ending on a nested map
    /// or an opaque value is [`Extracted::Unsupported`].
    #[must_use]
    pub fn extract(&self, path: &str) -> Extracted<'_> {
        match self.lookup_node(path) {
            None => Extracted::Absent,
            Some(ContextValue::Leaf(v)) => v.extracted(),
            Some(ContextValue::Nested(_) | ContextValue::Opaque) => Extracted::Unsupported,
        }
    }

    fn lookup_node(&self, path: &str) -> Option<&ContextValue> {
        let segments: Vec<&str> = path.split('.').collect();
        Self::get_recursive(&self.data, &segments)
    }

    fn insert_recursive(
        map: &mut HashMap<String, ContextValue>,
        segments: &[&str],
        value: ContextValue,
    ) {
        match segments {
            [] => {}
            [last] => {
                map.insert((*last).to_owned(), value);
            }
            [first, rest @ ..] => {
                let entry = map
                    .entry((*first).to_owned())
                    .or_insert_with(|| ContextValue::Nested(HashMap::new()));
                match entry {
                    ContextValue::Nested(nested) => {
                        Self::insert_recursive(nested, rest, value);
                    }
                    ContextValue::Leaf(_) | ContextValue::Opaque => {
                        let mut nested = HashMap::new();
                        Self::insert_recursive(&mut nested, rest, value);
                        *entry = ContextValue::Nested(nested);
                    }
                }
            }
        }
    }

    fn get_recursive<'a>(
        map: &'a HashMap<String, ContextValue>,
        segments: &[&str],
    ) -> Option<&'a ContextValue> {
        match segments {
            [] => None,
            [last] => map.get(*last),
            [first, rest @ ..] => match map.get(*first)? {
                ContextValue::Nested(nested) => Self::get_recursive(nested, rest),
                ContextValue::Leaf(_) | ContextValue::Opaque => None,
            },
        }
    }

    fn convert_object(
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> HashMap<String, ContextValue> {
        map.iter()
            .filter_map(|(key, value)| {
                Self::convert_value(value).map(|converted| (key.clone(), converted))
            })
            .collect()
    }

    fn convert_value(value: &serde_json::Value) -> Option<ContextValue> {
        let converted = match value {
            serde_json::Value::Null => return None,
            serde_json::Value::Bool(b) => ContextValue::Leaf(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ContextValue::Leaf(Value::Int(i)),
                None => ContextValue::Leaf(Value::Float(n.as_f64()?)),
            },
            serde_json::Value::String(s) => ContextValue::Leaf(Value::String(s.clone())),
            serde_json::Value::Array(_) => ContextValue::Opaque,
            serde_json::Value::Object(map) => ContextValue::Nested(Self::convert_object(map)),
        };
        Some(converted)
    }
}
