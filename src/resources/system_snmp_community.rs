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
    let hosts = ObjectDescriptor::new(vec![
        F::int("id").optional_computed().range(0, 4294967295),
        F::string("source_ip").optional_computed(),
        F::string("ip").optional_computed(),
        F::string("ha_direct").optional_computed(),
        F::string("host_type").optional_computed(),
    ])
    .sorted_by("id");

    let vdoms = ObjectDescriptor::new(vec![F::string("name").len(0, 79)]).sorted_by("name");

    ResourceDescriptor::table(
        "system_snmp_community",
        "system.snmp/community",
        "fosid",
        ObjectDescriptor::new(vec![
            // `id` is reserved for the identity attribute
            F::int("fosid")
                .wire("id")
                .required()
                .range(0, 4294967295),
            F::string("name").required().len(0, 35),
            F::string("status").optional_computed(),
            F::object_list("hosts", hosts).describe("Configure IPv4 SNMP managers (hosts)."),
            F::string("query_v1_status").optional_computed(),
            F::int("query_v1_port").optional_computed().range(0, 65535),
            F::string("query_v2c_status").optional_computed(),
            F::int("query_v2c_port").optional_computed().range(0, 65535),
            F::string("trap_v1_status").optional_computed(),
            F::string("trap_v2c_status").optional_computed(),
            F::string("events").optional_computed(),
            F::object_list("vdoms", vdoms).describe("SNMP access control VDOMs."),
        ]),
    )
    .describe("SNMP community configuration.")
}
