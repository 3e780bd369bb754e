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

use serde_json::{Map, Value};

use super::descriptor::{FieldDescriptor, FieldKind, ObjectDescriptor, ScalarType};
use super::error::MapError;
use super::path::FieldPath;
use super::transform::Transform;
use super::tree::{Fields, Node};

/// Export a local tree into a wire object
///
/// Only fields set in `local` are emitted. A field that is not set anymore but was set in
/// `prior` is emitted as an explicit null (or empty list) so the remote API clears it.
/// With `clear`, every field is emitted cleared, which resets the object to its defaults.
pub fn expand(
    descriptor: &ObjectDescriptor,
    local: &Fields,
    prior: Option<&Fields>,
    clear: bool,
) -> Result<Value, MapError> {
    expand_object(descriptor, local, prior, clear, &FieldPath::root()).map(Value::Object)
}

fn expand_object(
    descriptor: &ObjectDescriptor,
    local: &Fields,
    prior: Option<&Fields>,
    clear: bool,
    path: &FieldPath,
) -> Result<Map<String, Value>, MapError> {
    let mut object = Map::new();

    for field in descriptor.fields() {
        if clear {
            object.insert(field.wire_name.clone(), cleared(&field.kind));
            continue;
        }

        let prior_value = prior
            .and_then(|prior| prior.get(field.local_name))
            .filter(|value| value.is_set());

        match local.get(field.local_name).filter(|value| value.is_set()) {
            Some(value) => {
                let field_path = path.field(field.local_name);
                let wire = expand_value(field, value, prior_value, &field_path)?;
                object.insert(field.wire_name.clone(), wire);
            }
            None if prior_value.is_some() => {
                object.insert(field.wire_name.clone(), cleared(&field.kind));
            }
            None => (),
        }
    }

    Ok(object)
}

/// Wire value instructing the API to reset a field
fn cleared(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Scalar(_) | FieldKind::SingleObject(_) => Value::Null,
        FieldKind::ScalarList(_) | FieldKind::ObjectList(_) => Value::Array(Vec::new()),
    }
}

fn expand_value(
    field: &FieldDescriptor,
    value: &Node,
    prior: Option<&Node>,
    path: &FieldPath,
) -> Result<Value, MapError> {
    match &field.kind {
        FieldKind::Scalar(scalar_type) => expand_scalar(*scalar_type, value, field.transform, path),
        FieldKind::ScalarList(scalar_type) => {
            let items = as_list(value, path)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| expand_scalar(*scalar_type, item, None, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::ObjectList(nested) => {
            let items = as_list(value, path)?;
            let prior_items = prior.and_then(Node::as_list).unwrap_or_default();
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = path.index(i);
                    let object = item
                        .as_object()
                        .ok_or_else(|| MapError::mismatch(&item_path, "object", item.kind()))?;
                    let key = nested
                        .sort_key
                        .and_then(|key| object.get(key))
                        .filter(|key| key.is_set());
                    let prior_item = nested.match_prior(key, prior_items, i);
                    expand_object(nested, object, prior_item, false, &item_path).map(Value::Object)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::SingleObject(nested) => {
            let object = match value {
                Node::Object(object) => object,
                Node::List(items) => match items.as_slice() {
                    [] => return Ok(Value::Null),
                    [Node::Object(object)] => object,
                    [other] => {
                        return Err(MapError::mismatch(&path.index(0), "object", other.kind()))
                    }
                    _ => {
                        return Err(MapError::mismatch(
                            path,
                            "a single object",
                            format!("list of {} elements", items.len()),
                        ))
                    }
                },
                other => return Err(MapError::mismatch(path, "object", other.kind())),
            };
            let prior_object = prior.and_then(|prior| match prior {
                Node::Object(object) => Some(object),
                Node::List(items) => items.first().and_then(Node::as_object),
                _ => None,
            });
            expand_object(nested, object, prior_object, false, &path.index(0)).map(Value::Object)
        }
    }
}

fn as_list<'n>(value: &'n Node, path: &FieldPath) -> Result<&'n [Node], MapError> {
    value
        .as_list()
        .ok_or_else(|| MapError::mismatch(path, "list", value.kind()))
}

fn expand_scalar(
    scalar_type: ScalarType,
    value: &Node,
    transform: Option<Transform>,
    path: &FieldPath,
) -> Result<Value, MapError> {
    match (scalar_type, value) {
        (ScalarType::String, Node::String(s)) => Ok(Value::String(match transform {
            Some(transform) => transform.export(s),
            None => s.clone(),
        })),
        (ScalarType::Int, Node::Int(i)) => Ok(Value::from(*i)),
        (ScalarType::Bool, Node::Bool(b)) => Ok(Value::Bool(*b)),
        (_, other) => Err(MapError::mismatch(path, scalar_type.name(), other.kind())),
    }
}
