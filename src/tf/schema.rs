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

use std::collections::HashMap;

use tf_provider::map;
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};

use crate::mapper::{
    FieldDescriptor, FieldKind, ObjectDescriptor, Presence, ResourceDescriptor, ScalarType,
};

use super::{GET_ALL_TABLES, ID, SORT, VDOMPARAM};

fn scalar_type(scalar_type: ScalarType) -> AttributeType {
    match scalar_type {
        ScalarType::String => AttributeType::String,
        ScalarType::Int => AttributeType::Number,
        ScalarType::Bool => AttributeType::Bool,
    }
}

fn description_of(field: &FieldDescriptor) -> Description {
    Description::plain(field.description.unwrap_or(field.local_name))
}

fn constraint(presence: Presence) -> AttributeConstraint {
    match presence {
        Presence::Required => AttributeConstraint::Required,
        Presence::Optional => AttributeConstraint::Optional,
        Presence::OptionalComputed => AttributeConstraint::OptionalComputed,
    }
}

fn meta_attributes(singleton: bool) -> HashMap<String, Attribute> {
    map! {
        ID => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(if singleton {
                "Name of the resource type"
            } else {
                "Identity of the object on the device"
            }),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        VDOMPARAM => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(
                "Virtual domain of the object, instead of the provider one",
            ),
            constraint: AttributeConstraint::Optional,
            ..Default::default()
        },
        SORT => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(
                "Sort order of nested tables read from the device: `true`, `natural`, `alphabetical` or `false`",
            ),
            constraint: AttributeConstraint::Optional,
            ..Default::default()
        },
        GET_ALL_TABLES => Attribute {
            attr_type: AttributeType::Bool,
            description: Description::plain(
                "Read nested tables even when they are not set in the configuration",
            ),
            constraint: AttributeConstraint::Optional,
            ..Default::default()
        },
    }
}

/// Terraform block of a resource object: scalars are attributes, nested objects are blocks
fn resource_block(descriptor: &ObjectDescriptor, description: Description) -> Block {
    let mut block = Block {
        description,
        ..Default::default()
    };
    for field in descriptor.fields() {
        let attr_type = match &field.kind {
            FieldKind::Scalar(t) => scalar_type(*t),
            FieldKind::ScalarList(t) => AttributeType::List(Box::new(scalar_type(*t))),
            FieldKind::ObjectList(nested) => {
                block.blocks.insert(
                    field.local_name.to_owned(),
                    NestedBlock::List(resource_block(nested, description_of(field))),
                );
                continue;
            }
            FieldKind::SingleObject(nested) => {
                block.blocks.insert(
                    field.local_name.to_owned(),
                    NestedBlock::Optional(resource_block(nested, description_of(field))),
                );
                continue;
            }
        };
        block.attributes.insert(
            field.local_name.to_owned(),
            Attribute {
                attr_type,
                description: description_of(field),
                constraint: constraint(field.presence),
                sensitive: field.sensitive,
                ..Default::default()
            },
        );
    }
    block
}

pub fn resource_schema(resource: &ResourceDescriptor) -> Schema {
    let mut block = resource_block(&resource.object, Description::plain(resource.description));
    block.attributes.extend(meta_attributes(resource.is_singleton()));
    Schema { version: 1, block }
}

/// Computed attributes of a data source; nested objects are lists of nested attributes
fn data_source_attributes(
    descriptor: &ObjectDescriptor,
    key: Option<&str>,
) -> HashMap<String, Attribute> {
    descriptor
        .fields()
        .map(|field| {
            let attr_type = match &field.kind {
                FieldKind::Scalar(t) => scalar_type(*t),
                FieldKind::ScalarList(t) => AttributeType::List(Box::new(scalar_type(*t))),
                FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested) => {
                    AttributeType::AttributeList(data_source_attributes(nested, None))
                }
            };
            let constraint = if key == Some(field.local_name) {
                AttributeConstraint::Required
            } else {
                AttributeConstraint::Computed
            };
            (
                field.local_name.to_owned(),
                Attribute {
                    attr_type,
                    description: description_of(field),
                    constraint,
                    sensitive: field.sensitive,
                    ..Default::default()
                },
            )
        })
        .collect()
}

pub fn data_source_schema(resource: &ResourceDescriptor) -> Schema {
    let mut attributes = data_source_attributes(&resource.object, resource.mkey);
    attributes.extend(
        meta_attributes(resource.is_singleton())
            .into_iter()
            .filter(|(name, _)| name == ID || name == VDOMPARAM),
    );
    Schema {
        version: 1,
        block: Block {
            attributes,
            description: Description::plain(resource.description),
            ..Default::default()
        },
    }
}
