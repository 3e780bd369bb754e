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

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::mapper::{FieldDescriptor, FieldKind, Node, ObjectDescriptor, ScalarType, SortMode};

use super::state::{TfNode, TfObject, TfValue};
use super::{SORT, VDOMPARAM};

fn attribute(path: &Option<AttributePath>, name: &str) -> AttributePath {
    match path {
        Some(path) => path.clone().attribute(name.to_owned()),
        None => AttributePath::new(name.to_owned()),
    }
}

fn check_scalar(
    diags: &mut Diagnostics,
    field: &FieldDescriptor,
    scalar_type: ScalarType,
    value: &TfValue,
    path: AttributePath,
) {
    let node = match value {
        Value::Value(TfNode::String(s)) => Node::String(s.clone()),
        Value::Value(TfNode::Int(i)) => Node::Int(*i),
        Value::Value(TfNode::Float(f)) if scalar_type == ScalarType::Int => {
            if f.fract() != 0.0 {
                diags.error(
                    format!("Invalid value for `{}`", field.local_name),
                    format!("{f} is not an integer"),
                    path,
                );
                return;
            }
            Node::Int(*f as i64)
        }
        _ => return,
    };
    if let Some(message) = field.constraints.check(&node) {
        diags.error(format!("Invalid value for `{}`", field.local_name), message, path);
    }
}

/// Check the constraints of every known value of `object`
pub fn validate_fields(
    diags: &mut Diagnostics,
    descriptor: &ObjectDescriptor,
    object: &TfObject,
    path: Option<AttributePath>,
) {
    for field in descriptor.fields() {
        let Some(value) = object.get(field.local_name) else {
            continue;
        };
        let field_path = attribute(&path, field.local_name);
        match (&field.kind, value) {
            (FieldKind::Scalar(scalar_type), value) => {
                check_scalar(diags, field, *scalar_type, value, field_path)
            }
            (FieldKind::ScalarList(scalar_type), Value::Value(TfNode::List(items))) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = field_path.clone().index(i as i64);
                    check_scalar(diags, field, *scalar_type, item, item_path);
                }
            }
            (
                FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested),
                Value::Value(TfNode::List(items)),
            ) => {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Value(TfNode::Object(item)) = item {
                        let item_path = field_path.clone().index(i as i64);
                        validate_fields(diags, nested, item, Some(item_path));
                    }
                }
            }
            _ => (),
        }
    }
}

/// Check the engine-wide attributes shared by every resource
pub fn validate_meta(diags: &mut Diagnostics, object: &TfObject) {
    if let Some(Value::Value(TfNode::String(mode))) = object.get(SORT) {
        if let Err(message) = mode.parse::<SortMode>() {
            diags.error("Invalid sort mode", message, AttributePath::new(SORT));
        }
    }
    if let Some(Value::Value(TfNode::String(vdom))) = object.get(VDOMPARAM) {
        if vdom.trim().is_empty() {
            diags.error_short("`vdomparam` must not be empty", AttributePath::new(VDOMPARAM));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;

    fn object(attributes: Vec<(&str, TfValue)>) -> TfObject {
        attributes
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect()
    }

    #[test]
    fn valid_configuration() {
        let ippool = resources::find("firewall_ippool").unwrap();
        let config = object(vec![
            ("name", Value::Value("pool1".into())),
            ("block_size", Value::Value(TfNode::Int(128))),
            ("comments", Value::Unknown),
        ]);
        let mut diags = Diagnostics::default();
        validate_fields(&mut diags, &ippool.object, &config, None);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn range_and_length_violations() {
        let ippool = resources::find("firewall_ippool").unwrap();
        let config = object(vec![
            ("name", Value::Value("x".repeat(80).as_str().into())),
            ("block_size", Value::Value(TfNode::Int(8))),
        ]);
        let mut diags = Diagnostics::default();
        validate_fields(&mut diags, &ippool.object, &config, None);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn fractional_numbers_are_not_integers() {
        let ippool = resources::find("firewall_ippool").unwrap();
        let mut diags = Diagnostics::default();
        let whole = object(vec![("block_size", Value::Value(TfNode::Float(128.0)))]);
        validate_fields(&mut diags, &ippool.object, &whole, None);
        assert!(diags.errors.is_empty());

        let fraction = object(vec![("block_size", Value::Value(TfNode::Float(128.5)))]);
        validate_fields(&mut diags, &ippool.object, &fraction, None);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn nested_violations() {
        let profile = resources::find("filefilter_profile").unwrap();
        let long = "x".repeat(40);
        let file_type = object(vec![("name", Value::Value(long.as_str().into()))]);
        let rule = object(vec![(
            "file_type",
            Value::Value(TfNode::List(vec![Value::Value(TfNode::Object(file_type))])),
        )]);
        let config = object(vec![(
            "rules",
            Value::Value(TfNode::List(vec![Value::Value(TfNode::Object(rule))])),
        )]);
        let mut diags = Diagnostics::default();
        validate_fields(&mut diags, &profile.object, &config, None);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn meta_attributes() {
        let mut diags = Diagnostics::default();
        validate_meta(
            &mut diags,
            &object(vec![(SORT, Value::Value("alphabetical".into()))]),
        );
        assert!(diags.errors.is_empty());

        validate_meta(
            &mut diags,
            &object(vec![
                (SORT, Value::Value("descending".into())),
                (VDOMPARAM, Value::Value("".into())),
            ]),
        );
        assert_eq!(diags.errors.len(), 2);
    }
}
