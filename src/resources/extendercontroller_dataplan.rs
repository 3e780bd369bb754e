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
        "extendercontroller_dataplan",
        "extender-controller/dataplan",
        "name",
        ObjectDescriptor::new(vec![
            F::string("name").required().len(0, 31),
            F::string("modem_id").optional_computed(),
            F::string("type").optional_computed(),
            F::string("slot").optional_computed(),
            F::string("iccid").len(0, 31),
            F::string("carrier").len(0, 31),
            F::string("apn").wire("APN").len(0, 63),
            F::string("auth_type").optional_computed(),
            F::string("username").len(0, 31),
            F::string("password").sensitive().len(0, 128),
            F::string("pdn").optional_computed(),
            F::int("signal_threshold").optional_computed().range(50, 100),
            F::int("signal_period").optional_computed().range(600, 18000),
            F::int("capacity").optional_computed().range(0, 102400000),
            F::int("monthly_fee").optional_computed().range(0, 1000000),
            F::int("billing_date").optional_computed().range(1, 31),
            F::string("overage").optional_computed(),
            F::int("preferred_subnet").optional_computed().range(0, 32),
            F::string("private_network").optional_computed(),
        ]),
    )
    .describe("FortiExtender dataplan configuration.")
}
