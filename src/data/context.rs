use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

/// The facts a rule is evaluated against, keyed by top-level subject
/// (e.g. `{"referrer": {"status": "paid"}}`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct FactContext {
    facts: AHashMap<String, Value>,
}

impl FactContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fact context from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let context = serde_json::from_str(&content)?;
        Ok(context)
    }

    /// The mock context used to try a rule without real data: a paid referrer whose
    /// referred user subscribed.
    pub fn sample() -> Self {
        Self::new()
            .with_fact("referrer.status", "paid")
            .with_fact("referred.action", "subscribes")
    }

    /// Sets the fact at a dotted `path`, creating intermediate objects as needed.
    /// A non-object found on the way is replaced by an object.
    pub fn with_fact(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value);
        self
    }

    pub fn insert(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments = path.split('.');
        let Some(head) = segments.next() else {
            return;
        };
        let rest: Vec<&str> = segments.collect();

        let Some((last, middle)) = rest.split_last() else {
            self.facts.insert(head.to_string(), value.into());
            return;
        };

        let mut cursor = self
            .facts
            .entry(head.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        for segment in middle {
            cursor = ensure_object(cursor)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        ensure_object(cursor).insert(last.to_string(), value.into());
    }

    /// Looks up the fact at a dotted `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.facts.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}
