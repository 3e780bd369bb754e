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

fn permissions(names: &[&'static str]) -> ObjectDescriptor {
    ObjectDescriptor::new(
        names
            .iter()
            .map(|name| F::string(*name).optional_computed())
            .collect(),
    )
}

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::table(
        "system_accprofile",
        "system/accprofile",
        "name",
        ObjectDescriptor::new(vec![
            F::string("name").required().len(0, 35),
            F::string("scope").optional_computed(),
            F::string("comments").len(0, 255),
            F::string("secfabgrp").optional_computed(),
            F::string("ftviewgrp").optional_computed(),
            F::string("authgrp").optional_computed(),
            F::string("sysgrp").optional_computed(),
            F::string("netgrp").optional_computed(),
            F::string("loggrp").optional_computed(),
            F::string("fwgrp").optional_computed(),
            F::string("vpngrp").optional_computed(),
            F::string("utmgrp").optional_computed(),
            F::string("wanoptgrp").optional_computed(),
            F::string("wifi").optional_computed(),
            F::single_object(
                "netgrp_permission",
                permissions(&["cfg", "packet_capture", "route_cfg"]),
            )
            .describe("Custom network permission."),
            F::single_object(
                "sysgrp_permission",
                permissions(&["admin", "upd", "cfg", "mnt"]),
            )
            .describe("Custom system permission."),
            F::single_object(
                "fwgrp_permission",
                permissions(&["policy", "address", "service", "schedule", "others"]),
            )
            .describe("Custom firewall permission."),
            F::single_object(
                "loggrp_permission",
                permissions(&["config", "data_access", "report_access", "threat_weight"]),
            )
            .describe("Custom Log & Report permission."),
            F::string("admintimeout_override").optional_computed(),
            F::int("admintimeout").optional_computed().range(1, 480),
            F::string("system_diagnostics").optional_computed(),
            F::string("system_execute_ssh").optional_computed(),
            F::string("system_execute_telnet").optional_computed(),
        ]),
    )
    .describe("Configure access profiles for system administrators.")
}
