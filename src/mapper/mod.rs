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

//! Schema-driven mapping between local trees and FortiOS wire objects

mod descriptor;
mod error;
mod expand;
mod flatten;
mod path;
mod sort;
mod transform;
mod tree;

pub use descriptor::{
    wire_name_of, Constraints, FieldDescriptor, FieldKind, ObjectDescriptor, Presence,
    ResourceDescriptor, ScalarType,
};
pub use error::MapError;
pub use expand::expand;
pub use flatten::{flatten, ImportOptions};
pub use path::{FieldPath, Segment};
pub use sort::{natural_cmp, sort_by_key, SortMode};
pub use transform::Transform;
pub use tree::{Fields, Node};
