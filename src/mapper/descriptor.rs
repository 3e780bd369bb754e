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

use std::collections::HashSet;

use super::transform::Transform;
use super::tree::{Fields, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Bool,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Int => "int",
            ScalarType::Bool => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    ScalarList(ScalarType),
    /// Ordered list of objects (a FortiOS table)
    ObjectList(ObjectDescriptor),
    /// Exactly one nested object, represented locally as a one-element list
    SingleObject(ObjectDescriptor),
}

impl FieldKind {
    pub fn nested(&self) -> Option<&ObjectDescriptor> {
        match self {
            FieldKind::ObjectList(nested) | FieldKind::SingleObject(nested) => Some(nested),
            _ => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested().is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Presence {
    /// Must be set by the practitioner
    Required,
    /// Exported only when set, refreshed only when tracked
    #[default]
    Optional,
    /// Exported only when set, always refreshed from the remote value
    OptionalComputed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Constraints {
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub min_int: Option<i64>,
    pub max_int: Option<i64>,
}

impl Constraints {
    /// Check a scalar value against the bounds, returning a message on violation
    pub fn check(&self, value: &Node) -> Option<String> {
        match value {
            Node::String(s) => {
                let len = s.chars().count();
                match (self.min_len, self.max_len) {
                    (Some(min), _) if len < min => {
                        Some(format!("length {len} is shorter than the minimum {min}"))
                    }
                    (_, Some(max)) if len > max => {
                        Some(format!("length {len} is longer than the maximum {max}"))
                    }
                    _ => None,
                }
            }
            Node::Int(i) => match (self.min_int, self.max_int) {
                (Some(min), Some(max)) if *i < min || *i > max => {
                    Some(format!("{i} is not in the range [{min}, {max}]"))
                }
                (Some(min), None) if *i < min => Some(format!("{i} is lower than {min}")),
                (None, Some(max)) if *i > max => Some(format!("{i} is greater than {max}")),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Default wire name of a field: FortiOS spells `snake_case` names with hyphens
pub fn wire_name_of(local_name: &str) -> String {
    local_name.replace('_', "-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub local_name: &'static str,
    pub wire_name: String,
    pub kind: FieldKind,
    pub constraints: Constraints,
    pub presence: Presence,
    pub sensitive: bool,
    pub transform: Option<Transform>,
    pub description: Option<&'static str>,
}

impl FieldDescriptor {
    pub fn new(local_name: &'static str, kind: FieldKind) -> Self {
        Self {
            local_name,
            wire_name: wire_name_of(local_name),
            kind,
            constraints: Default::default(),
            presence: Default::default(),
            sensitive: false,
            transform: None,
            description: None,
        }
    }

    pub fn string(local_name: &'static str) -> Self {
        Self::new(local_name, FieldKind::Scalar(ScalarType::String))
    }

    pub fn int(local_name: &'static str) -> Self {
        Self::new(local_name, FieldKind::Scalar(ScalarType::Int))
    }

    pub fn bool(local_name: &'static str) -> Self {
        Self::new(local_name, FieldKind::Scalar(ScalarType::Bool))
    }

    pub fn string_list(local_name: &'static str) -> Self {
        Self::new(local_name, FieldKind::ScalarList(ScalarType::String))
    }

    pub fn object_list(local_name: &'static str, nested: ObjectDescriptor) -> Self {
        Self::new(local_name, FieldKind::ObjectList(nested))
    }

    pub fn single_object(local_name: &'static str, nested: ObjectDescriptor) -> Self {
        Self::new(local_name, FieldKind::SingleObject(nested))
    }

    /// Override the wire name, for names the vendor API spells irregularly
    pub fn wire(mut self, wire_name: &str) -> Self {
        self.wire_name = wire_name.to_owned();
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn optional_computed(mut self) -> Self {
        self.presence = Presence::OptionalComputed;
        self
    }

    pub fn len(mut self, min: usize, max: usize) -> Self {
        self.constraints.min_len = Some(min);
        self.constraints.max_len = Some(max);
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.constraints.min_int = Some(min);
        self.constraints.max_int = Some(max);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub fields: Vec<FieldDescriptor>,
    /// Local name of the field used to order elements when this object is a list element
    pub sort_key: Option<&'static str>,
}

impl ObjectDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            sort_key: None,
        }
    }

    pub fn sorted_by(mut self, key: &'static str) -> Self {
        self.sort_key = Some(key);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn field(&self, local_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.local_name == local_name)
    }

    /// Find the prior element a list element corresponds to.
    ///
    /// Elements of a keyed table pair up by the value of their sort key, so reordered or
    /// removed elements still meet their own prior state. Without a key, pairing is by position.
    pub fn match_prior<'p>(
        &self,
        key: Option<&Node>,
        prior_items: &'p [Node],
        index: usize,
    ) -> Option<&'p Fields> {
        match self.sort_key.zip(key) {
            Some((key_name, key)) => prior_items
                .iter()
                .filter_map(Node::as_object)
                .find(|item| item.get(key_name) == Some(key)),
            None => prior_items.get(index).and_then(Node::as_object),
        }
    }

    /// Check the structural invariants of the descriptor tree:
    /// unique local and wire names, and sort keys naming a scalar field.
    pub fn check(&self) -> Result<(), String> {
        let mut local_names = HashSet::new();
        let mut wire_names = HashSet::new();
        for field in &self.fields {
            if !local_names.insert(field.local_name) {
                return Err(format!("duplicate local name `{}`", field.local_name));
            }
            if !wire_names.insert(field.wire_name.as_str()) {
                return Err(format!("duplicate wire name `{}`", field.wire_name));
            }
            if let Some(nested) = field.kind.nested() {
                nested
                    .check()
                    .map_err(|err| format!("{}: {err}", field.local_name))?;
            }
        }
        if let Some(key) = self.sort_key {
            match self.field(key).map(|field| &field.kind) {
                Some(FieldKind::Scalar(_)) => (),
                _ => return Err(format!("sort key `{key}` is not a scalar field")),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Name of the resource type, without the provider prefix (`firewall_ippool`)
    pub type_name: &'static str,
    /// REST path of the object (`firewall/ippool`)
    pub path: &'static str,
    pub description: &'static str,
    /// Local name of the key field; `None` for singleton objects
    pub mkey: Option<&'static str>,
    pub object: ObjectDescriptor,
}

impl ResourceDescriptor {
    /// Resource stored in a table, identified by the value of its key field
    pub fn table(
        type_name: &'static str,
        path: &'static str,
        mkey: &'static str,
        object: ObjectDescriptor,
    ) -> Self {
        Self {
            type_name,
            path,
            description: type_name,
            mkey: Some(mkey),
            object,
        }
    }

    pub fn singleton(
        type_name: &'static str,
        path: &'static str,
        object: ObjectDescriptor,
    ) -> Self {
        Self {
            type_name,
            path,
            description: type_name,
            mkey: None,
            object,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.mkey.is_none()
    }

    pub fn mkey_field(&self) -> Option<&FieldDescriptor> {
        self.mkey.and_then(|key| self.object.field(key))
    }
}
