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
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tf_provider::value::Value;

use crate::mapper::{Fields, FieldKind, Node, ObjectDescriptor};

/// Attribute value as exchanged with Terraform, possibly null or unknown
pub type TfValue = Value<TfNode>;
pub type TfObject = BTreeMap<String, TfValue>;

/// Known Terraform value whose shape is given by the resource schema
#[derive(Debug, Clone, PartialEq)]
pub enum TfNode {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<TfValue>),
    Object(TfObject),
}

impl From<&str> for TfNode {
    fn from(value: &str) -> Self {
        TfNode::String(value.to_owned())
    }
}

impl Serialize for TfNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TfNode::Bool(b) => serializer.serialize_bool(*b),
            TfNode::Int(i) => serializer.serialize_i64(*i),
            TfNode::Float(f) => serializer.serialize_f64(*f),
            TfNode::String(s) => serializer.serialize_str(s),
            TfNode::List(items) => items.serialize(serializer),
            TfNode::Object(attributes) => attributes.serialize(serializer),
        }
    }
}

struct TfNodeVisitor;

impl<'de> Visitor<'de> for TfNodeVisitor {
    type Value = TfNode;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a terraform value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(TfNode::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TfNode::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(match i64::try_from(v) {
            Ok(v) => TfNode::Int(v),
            Err(_) => TfNode::Float(v as f64),
        })
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(TfNode::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(TfNode::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(TfNode::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element::<TfValue>()? {
            items.push(item);
        }
        Ok(TfNode::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut attributes = TfObject::new();
        while let Some((name, value)) = map.next_entry::<String, TfValue>()? {
            attributes.insert(name, value);
        }
        Ok(TfNode::Object(attributes))
    }
}

impl<'de> Deserialize<'de> for TfNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TfNodeVisitor)
    }
}

/// Convert a Terraform value to a local node; null and unknown values are not set
fn node_of(value: &TfValue) -> Option<Node> {
    let Value::Value(node) = value else {
        return None;
    };
    Some(match node {
        TfNode::Bool(b) => Node::Bool(*b),
        TfNode::Int(i) => Node::Int(*i),
        TfNode::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Node::Int(*f as i64),
        TfNode::Float(f) => Node::String(f.to_string()),
        TfNode::String(s) => Node::String(s.clone()),
        TfNode::List(items) => Node::List(
            items
                .iter()
                .map(|item| node_of(item).unwrap_or(Node::Null))
                .collect(),
        ),
        TfNode::Object(attributes) => Node::Object(
            attributes
                .iter()
                .filter_map(|(name, value)| Some((name.clone(), node_of(value)?)))
                .collect(),
        ),
    })
}

/// Local tree of the attributes declared by `descriptor`
///
/// Nested blocks without any element are not set.
pub fn to_local(descriptor: &ObjectDescriptor, object: &TfObject) -> Fields {
    let mut fields = Fields::new();
    for field in descriptor.fields() {
        let Some(value) = object.get(field.local_name) else {
            continue;
        };
        let node = match (&field.kind, value) {
            (
                FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested),
                Value::Value(TfNode::List(items)),
            ) => {
                if items.is_empty() {
                    continue;
                }
                Node::List(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Value(TfNode::Object(item)) => {
                                Node::Object(to_local(nested, item))
                            }
                            other => node_of(other).unwrap_or(Node::Null),
                        })
                        .collect(),
                )
            }
            (_, value) => match node_of(value) {
                Some(node) => node,
                None => continue,
            },
        };
        fields.insert(field.local_name.to_owned(), node);
    }
    fields
}

fn value_of(node: &Node) -> TfValue {
    match node {
        Node::Null => Value::Null,
        Node::Bool(b) => Value::Value(TfNode::Bool(*b)),
        Node::Int(i) => Value::Value(TfNode::Int(*i)),
        Node::String(s) => Value::Value(TfNode::String(s.clone())),
        Node::List(items) => Value::Value(TfNode::List(items.iter().map(value_of).collect())),
        Node::Object(fields) => Value::Value(TfNode::Object(
            fields
                .iter()
                .map(|(name, node)| (name.clone(), value_of(node)))
                .collect(),
        )),
    }
}

/// Terraform object holding every attribute declared by `descriptor`
///
/// Unset attributes are null and unset nested blocks are empty.
pub fn from_local(descriptor: &ObjectDescriptor, fields: &Fields) -> TfObject {
    descriptor
        .fields()
        .map(|field| {
            let value = match (&field.kind, fields.get(field.local_name)) {
                (FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested), node) => {
                    let items = match node {
                        Some(Node::List(items)) => items.as_slice(),
                        Some(object @ Node::Object(_)) => std::slice::from_ref(object),
                        _ => &[],
                    };
                    Value::Value(TfNode::List(
                        items
                            .iter()
                            .map(|item| match item {
                                Node::Object(item) => {
                                    Value::Value(TfNode::Object(from_local(nested, item)))
                                }
                                other => value_of(other),
                            })
                            .collect(),
                    ))
                }
                (_, Some(node)) => value_of(node),
                (_, None) => Value::Null,
            };
            (field.local_name.to_owned(), value)
        })
        .collect()
}
