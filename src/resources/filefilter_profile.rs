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

use crate::mapper::{FieldDescriptor as F, ObjectDescriptor, ResourceDescriptor};

pub fn descriptor() -> ResourceDescriptor {
    let file_type = ObjectDescriptor::new(vec![F::string("name").len(0, 39)]).sorted_by("name");

    let rules = ObjectDescriptor::new(vec![
        F::string("name").len(0, 35),
        F::string("comment").len(0, 255),
        F::string("protocol").optional_computed(),
        F::string("action").optional_computed(),
        F::string("direction").optional_computed(),
        F::string("password_protected").optional_computed(),
        F::object_list("file_type", file_type).describe("Select file type."),
    ])
    .sorted_by("name");

    ResourceDescriptor::table(
        "filefilter_profile",
        "file-filter/profile",
        "name",
        ObjectDescriptor::new(vec![
            F::string("name").required().len(0, 35),
            F::string("comment").len(0, 255),
            F::string("feature_set").optional_computed(),
            F::string("replacemsg_group").len(0, 35),
            F::string("log").optional_computed(),
            F::string("extended_log").optional_computed(),
            F::string("scan_archive_contents").optional_computed(),
            F::object_list("rules", rules).describe("File filter rules."),
        ]),
    )
    .describe("Configure file-filter profiles.")
}
