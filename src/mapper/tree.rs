// This file is part of the terraform-provider-fortios project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;

use serde_json::Value;

/// Fields of a local object, keyed by local name. A missing key means "not set".
pub type Fields = BTreeMap<String, Node>;

/// Node of a local tree
///
/// Values coming from Terraform and values produced by the importer share this representation.
/// Numbers are always integers: FortiOS configuration has no fractional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<Node>),
    Object(Fields),
}

impl Node {
    pub fn is_set(&self) -> bool {
        !matches!(self, Node::Null)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Node::Null => true,
            Node::List(items) => items.is_empty(),
            Node::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::String(_) => "string",
            Node::List(_) => "list",
            Node::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Node::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Textual form of a scalar, as used for identities and sort keys
    pub fn render(&self) -> Option<String> {
        match self {
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::List(value)
    }
}

impl From<Fields> for Node {
    fn from(value: Fields) -> Self {
        Node::Object(value)
    }
}

/// Untyped conversion, without any descriptor: integral numbers become [`Node::Int`],
/// other numbers keep their textual form.
impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::String(n.to_string()),
            },
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(fields) => Node::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_and_empty() {
        assert!(!Node::Null.is_set());
        assert!(Node::List(vec![]).is_set());
        assert!(Node::List(vec![]).is_empty());
        assert!(!Node::from("").is_empty());
    }

    #[test]
    fn from_json() {
        let node = Node::from(json!({"name": "a", "id": 3, "tags": ["x"], "ratio": 0.5}));
        let fields = node.as_object().unwrap();
        assert_eq!(fields["name"], Node::from("a"));
        assert_eq!(fields["id"], Node::Int(3));
        assert_eq!(fields["tags"], Node::List(vec![Node::from("x")]));
        assert_eq!(fields["ratio"], Node::from("0.5"));
    }

    #[test]
    fn render_scalars() {
        assert_eq!(Node::Int(12).render().as_deref(), Some("12"));
        assert_eq!(Node::from("port1").render().as_deref(), Some("port1"));
        assert_eq!(Node::List(vec![]).render(), None);
    }
}
