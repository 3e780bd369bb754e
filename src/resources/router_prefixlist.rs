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

use crate::mapper::{FieldDescriptor as F, ObjectDescriptor, ResourceDescriptor, Transform};

pub fn descriptor() -> ResourceDescriptor {
    let rule = ObjectDescriptor::new(vec![
        F::int("id").optional_computed().range(0, 4294967295),
        F::string("action").optional_computed(),
        F::string("prefix")
            .optional_computed()
            .transform(Transform::Cidr),
        F::int("ge").range(0, 32),
        F::int("le").range(0, 32),
        F::int("flags").optional_computed().range(0, 4294967295),
    ])
    .sorted_by("id");

    ResourceDescriptor::table(
        "router_prefixlist",
        "router/prefix-list",
        "name",
        ObjectDescriptor::new(vec![
            F::string("name").required().len(0, 35),
            F::string("comments").len(0, 127),
            F::object_list("rule", rule).describe("IPv4 prefix list rule."),
        ]),
    )
    .describe("Configure IPv4 prefix lists.")
}
