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

use serde_json::{Map, Number, Value};

use super::descriptor::{FieldDescriptor, FieldKind, ObjectDescriptor, Presence, ScalarType};
use super::error::{describe, MapError};
use super::path::FieldPath;
use super::sort::{sort_by_key, SortMode};
use super::tree::{Fields, Node};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Refresh nested tables even when they are not tracked locally
    pub import_all: bool,
    pub sort: SortMode,
}

/// Import a wire object into a local tree
///
/// `prior` is the local tree currently known for this object; `None` for a fresh import.
pub fn flatten(
    descriptor: &ObjectDescriptor,
    wire: &Value,
    prior: Option<&Fields>,
    options: ImportOptions,
) -> Result<Fields, MapError> {
    let root = FieldPath::root();
    let object = wire
        .as_object()
        .ok_or_else(|| MapError::mismatch(&root, "object", describe(wire)))?;
    flatten_object(descriptor, object, prior, options, &root)
}

fn flatten_object(
    descriptor: &ObjectDescriptor,
    wire: &Map<String, Value>,
    prior: Option<&Fields>,
    options: ImportOptions,
    path: &FieldPath,
) -> Result<Fields, MapError> {
    let mut fields = Fields::new();

    for field in descriptor.fields() {
        let prior_value = prior
            .and_then(|prior| prior.get(field.local_name))
            .filter(|value| value.is_set());

        // The API masks secrets: the local value stays authoritative
        if field.sensitive {
            if let Some(value) = prior_value {
                fields.insert(field.local_name.to_owned(), value.clone());
            }
            continue;
        }

        if !is_tracked(field, prior.is_some(), prior_value, options) {
            continue;
        }

        let wire_value = match wire.get(field.wire_name.as_str()) {
            None | Some(Value::Null) => continue,
            Some(value) => value,
        };

        let field_path = path.field(field.local_name);
        if let Some(node) = flatten_value(field, wire_value, prior_value, options, &field_path)? {
            fields.insert(field.local_name.to_owned(), node);
        }
    }

    Ok(fields)
}

fn is_tracked(
    field: &FieldDescriptor,
    has_prior: bool,
    prior_value: Option<&Node>,
    options: ImportOptions,
) -> bool {
    if field.kind.is_nested() {
        return options.import_all || prior_value.is_some_and(|value| !value.is_empty());
    }
    match field.presence {
        Presence::Optional => options.import_all || !has_prior || prior_value.is_some(),
        Presence::Required | Presence::OptionalComputed => true,
    }
}

fn flatten_value(
    field: &FieldDescriptor,
    wire: &Value,
    prior: Option<&Node>,
    options: ImportOptions,
    path: &FieldPath,
) -> Result<Option<Node>, MapError> {
    match &field.kind {
        FieldKind::Scalar(scalar_type) => {
            let node = match (coerce(*scalar_type, wire, path)?, field.transform) {
                (Node::String(s), Some(transform)) => Node::String(transform.import(s, prior)),
                (node, _) => node,
            };
            Ok(Some(node))
        }
        FieldKind::ScalarList(scalar_type) => {
            let items = as_array(wire, path)?;
            if items.is_empty() {
                return Ok(None);
            }
            let list = items
                .iter()
                .enumerate()
                .map(|(i, item)| coerce(*scalar_type, item, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Node::List(list)))
        }
        FieldKind::ObjectList(nested) => {
            let items = as_array(wire, path)?;
            if items.is_empty() {
                return Ok(None);
            }
            let prior_items = prior.and_then(Node::as_list).unwrap_or_default();
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                let object = item
                    .as_object()
                    .ok_or_else(|| MapError::mismatch(&item_path, "object", describe(item)))?;
                let key = wire_key(nested, object);
                let prior_item = nested.match_prior(key.as_ref(), prior_items, i);
                list.push(Node::Object(flatten_object(
                    nested, object, prior_item, options, &item_path,
                )?));
            }
            if let Some(key) = nested.sort_key {
                sort_by_key(&mut list, key, options.sort);
            }
            Ok(Some(Node::List(list)))
        }
        FieldKind::SingleObject(nested) => {
            let object = match wire {
                Value::Object(object) => object,
                Value::Array(items) if items.is_empty() => return Ok(None),
                Value::Array(items) if items.len() == 1 => {
                    items[0].as_object().ok_or_else(|| {
                        MapError::mismatch(&path.index(0), "object", describe(&items[0]))
                    })?
                }
                other => return Err(MapError::mismatch(path, "object", describe(other))),
            };
            let prior_item = prior
                .and_then(Node::as_list)
                .and_then(<[Node]>::first)
                .and_then(Node::as_object);
            let node = flatten_object(nested, object, prior_item, options, &path.index(0))?;
            Ok(Some(Node::List(vec![Node::Object(node)])))
        }
    }
}

fn as_array<'v>(wire: &'v Value, path: &FieldPath) -> Result<&'v [Value], MapError> {
    wire.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| MapError::mismatch(path, "array", describe(wire)))
}

/// Sort key of a remote element, coerced to its local form
fn wire_key(nested: &ObjectDescriptor, object: &Map<String, Value>) -> Option<Node> {
    let field = nested.field(nested.sort_key?)?;
    let FieldKind::Scalar(scalar_type) = &field.kind else {
        return None;
    };
    let wire_key = object.get(field.wire_name.as_str())?;
    coerce(*scalar_type, wire_key, &FieldPath::root()).ok()
}

/// Normalize a wire scalar to its declared type
///
/// The API is loose with types: integers may arrive as floats or numeric strings,
/// and strings may arrive as bare numbers.
pub(crate) fn coerce(
    scalar_type: ScalarType,
    wire: &Value,
    path: &FieldPath,
) -> Result<Node, MapError> {
    let coerced = match (scalar_type, wire) {
        (ScalarType::String, Value::String(s)) => Some(Node::String(s.clone())),
        (ScalarType::String, Value::Number(n)) => Some(Node::String(n.to_string())),
        (ScalarType::String, Value::Bool(b)) => Some(Node::String(b.to_string())),
        (ScalarType::Int, Value::Number(n)) => number_to_int(n).map(Node::Int),
        (ScalarType::Int, Value::String(s)) => parse_int(s).map(Node::Int),
        (ScalarType::Bool, Value::Bool(b)) => Some(Node::Bool(*b)),
        (ScalarType::Bool, Value::String(s)) => match s.as_str() {
            "true" | "enable" => Some(Node::Bool(true)),
            "false" | "disable" => Some(Node::Bool(false)),
            _ => None,
        },
        (ScalarType::Bool, Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(Node::Bool(false)),
            Some(1) => Some(Node::Bool(true)),
            _ => None,
        },
        _ => None,
    };
    coerced.ok_or_else(|| MapError::mismatch(path, scalar_type.name(), describe(wire)))
}

const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn float_to_int(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT).then_some(f as i64)
}

fn number_to_int(n: &Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
        .or_else(|| n.as_f64().and_then(float_to_int))
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
}
