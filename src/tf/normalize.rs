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

use crate::mapper::{FieldKind, ObjectDescriptor, Presence};

use super::state::{TfNode, TfObject};

/// Mark the attributes the device computes as unknown when they are not configured
pub fn mark_computed(descriptor: &ObjectDescriptor, object: &mut TfObject) {
    for field in descriptor.fields() {
        match &field.kind {
            FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested) => {
                if let Some(Value::Value(TfNode::List(items))) = object.get_mut(field.local_name) {
                    for item in items {
                        if let Value::Value(TfNode::Object(item)) = item {
                            mark_computed(nested, item);
                        }
                    }
                }
            }
            FieldKind::Scalar(_) | FieldKind::ScalarList(_) => {
                if field.presence == Presence::OptionalComputed {
                    let value = object
                        .entry(field.local_name.to_owned())
                        .or_insert(Value::Null);
                    if value.is_null() {
                        *value = Value::Unknown;
                    }
                }
            }
        }
    }
}
