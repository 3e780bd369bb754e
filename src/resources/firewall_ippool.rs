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
    ResourceDescriptor::table(
        "firewall_ippool",
        "firewall/ippool",
        "name",
        ObjectDescriptor::new(vec![
            F::string("name").required().len(0, 79),
            F::string("type").optional_computed(),
            F::int("startport").optional_computed().range(1024, 65535),
            F::int("endport").optional_computed().range(1024, 65535),
            F::string("startip").required(),
            F::string("endip").required(),
            F::string("source_startip").optional_computed(),
            F::string("source_endip").optional_computed(),
            F::int("block_size").optional_computed().range(64, 4096),
            F::int("port_per_user").optional_computed().range(32, 60417),
            F::int("num_blocks_per_user").optional_computed().range(1, 128),
            F::int("pba_timeout").optional_computed().range(3, 300),
            F::string("permit_any_host").optional_computed(),
            F::string("arp_reply").optional_computed(),
            F::string("arp_intf").len(0, 15),
            F::string("associated_interface").len(0, 15),
            F::string("comments").len(0, 255),
        ]),
    )
    .describe("IPv4 IP address pool.")
}
