//! Logic trees of a definition.
//!
//! A logic entry is an arbitrary JSON tree. Objects are classified once,
//! when they are read, by their `level` and `type` fields, so walkers match
//! on [`NodeKind`] instead of probing keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vue_common::RenameMap;

/// What an object node in a logic tree stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A logic entry (`level: "logic"`).
    Logic,
    /// A statement (`level: "statement"`).
    Statement,
    /// `level: "expressionNode"` with `type: "Identifier"`: a name
    /// reference whose `name` follows renames.
    NameReference,
    /// Any other expression node.
    Expression,
    /// An object with no recognised level.
    Other,
}

impl NodeKind {
    fn classify(fields: &IndexMap<String, LogicNode>) -> Self {
        let text = |key: &str| match fields.get(key) {
            Some(LogicNode::Value(Value::String(s))) => Some(s.as_str()),
            _ => None,
        };
        match (text("level"), text("type")) {
            (Some("expressionNode"), Some("Identifier")) => NodeKind::NameReference,
            (Some("expressionNode"), _) => NodeKind::Expression,
            (Some("statement"), _) => NodeKind::Statement,
            (Some("logic"), _) => NodeKind::Logic,
            _ => NodeKind::Other,
        }
    }
}

/// An object node: its kind and its fields in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicObject {
    /// The classification of this node.
    pub kind: NodeKind,
    /// Fields in order.
    pub fields: IndexMap<String, LogicNode>,
}

impl LogicObject {
    /// Returns the `name` field if it is a string.
    pub fn name(&self) -> Option<&str> {
        match self.fields.get("name") {
            Some(LogicNode::Value(Value::String(name))) => Some(name),
            _ => None,
        }
    }

    /// Sets the `name` field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.insert(
            "name".to_string(),
            LogicNode::Value(Value::String(name.into())),
        );
    }
}

/// A node of a logic tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum LogicNode {
    /// A JSON object.
    Object(LogicObject),
    /// A JSON array.
    Array(Vec<LogicNode>),
    /// A string, number, boolean or null.
    Value(Value),
}

impl LogicNode {
    /// Returns the object, if this node is one.
    pub fn as_object(&self) -> Option<&LogicObject> {
        match self {
            LogicNode::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the object mutably, if this node is one.
    pub fn as_object_mut(&mut self) -> Option<&mut LogicObject> {
        match self {
            LogicNode::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the `name` of an object node.
    pub fn name(&self) -> Option<&str> {
        self.as_object()?.name()
    }

    /// Visits every object node depth-first, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut LogicObject)) {
        match self {
            LogicNode::Object(object) => {
                visit(object);
                for child in object.fields.values_mut() {
                    child.walk_mut(visit);
                }
            }
            LogicNode::Array(items) => {
                for item in items {
                    item.walk_mut(visit);
                }
            }
            LogicNode::Value(_) => {}
        }
    }

    /// Renames every name reference found in `renames`. Returns how many
    /// references changed.
    pub fn rename_references(&mut self, renames: &RenameMap) -> usize {
        let mut count = 0;
        self.walk_mut(&mut |object| {
            if object.kind != NodeKind::NameReference {
                return;
            }
            let new = object.name().and_then(|name| renames.get(name)).map(str::to_string);
            if let Some(new) = new {
                object.set_name(new);
                count += 1;
            }
        });
        count
    }
}

impl From<Value> for LogicNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                let fields: IndexMap<String, LogicNode> = map
                    .into_iter()
                    .map(|(key, value)| (key, LogicNode::from(value)))
                    .collect();
                LogicNode::Object(LogicObject {
                    kind: NodeKind::classify(&fields),
                    fields,
                })
            }
            Value::Array(items) => LogicNode::Array(items.into_iter().map(LogicNode::from).collect()),
            value => LogicNode::Value(value),
        }
    }
}

impl From<LogicNode> for Value {
    fn from(node: LogicNode) -> Self {
        match node {
            LogicNode::Object(object) => Value::Object(
                object
                    .fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
            LogicNode::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            LogicNode::Value(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn logic() -> LogicNode {
        LogicNode::from(json!({
            "name": "load",
            "level": "logic",
            "body": [{
                "level": "statement",
                "type": "Assignment",
                "left": { "level": "expressionNode", "type": "Identifier", "name": "count" },
                "right": {
                    "level": "expressionNode",
                    "type": "CallExpression",
                    "callee": { "level": "expressionNode", "type": "Identifier", "name": "fetch" },
                    "arguments": [{ "level": "expressionNode", "type": "Identifier", "name": "count" }]
                }
            }]
        }))
    }

    #[test]
    fn test_classification() {
        let node = logic();
        let object = node.as_object().unwrap();
        assert_eq!(object.kind, NodeKind::Logic);
        assert_eq!(object.name(), Some("load"));
    }

    #[test]
    fn test_nested_references_are_renamed() {
        let mut node = logic();
        let renames: RenameMap = [("count", "count1"), ("load", "load1")].into_iter().collect();
        assert_eq!(node.rename_references(&renames), 2);
        let value = Value::from(node);
        assert_eq!(value["name"], "load");
        assert_eq!(value["body"][0]["left"]["name"], "count1");
        assert_eq!(value["body"][0]["right"]["arguments"][0]["name"], "count1");
        assert_eq!(value["body"][0]["right"]["callee"]["name"], "fetch");
    }

    #[test]
    fn test_field_order_is_kept() {
        let value = json!({ "z": 1, "a": { "y": [true, null], "b": "x" } });
        let round = Value::from(LogicNode::from(value.clone()));
        assert_eq!(
            serde_json::to_string(&round).unwrap(),
            serde_json::to_string(&value).unwrap()
        );
    }
}
