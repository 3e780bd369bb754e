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
    let server_hostname =
        ObjectDescriptor::new(vec![F::string("hostname").len(0, 127)]).sorted_by("hostname");
    let domain = ObjectDescriptor::new(vec![F::string("domain").len(0, 79)]).sorted_by("domain");

    ResourceDescriptor::singleton(
        "system_dns",
        "system/dns",
        ObjectDescriptor::new(vec![
            F::string("primary").optional_computed(),
            F::string("secondary").optional_computed(),
            F::string("protocol").optional_computed(),
            F::string("ssl_certificate").optional_computed().len(0, 35),
            F::object_list("server_hostname", server_hostname)
                .describe("DNS server host name list."),
            F::object_list("domain", domain).describe("Search suffix list for hostname lookup."),
            F::string("ip6_primary").optional_computed(),
            F::string("ip6_secondary").optional_computed(),
            F::int("timeout").optional_computed().range(1, 10),
            F::int("retry").optional_computed().range(0, 5),
            F::int("dns_cache_limit").optional_computed(),
            F::int("dns_cache_ttl").optional_computed().range(60, 86400),
            F::string("cache_notfound_responses").optional_computed(),
            F::string("source_ip").optional_computed(),
            F::string("interface_select_method").optional_computed(),
            F::string("interface").optional_computed().len(0, 15),
            F::int("fqdn_cache_ttl").optional_computed().range(0, 86400),
        ]),
    )
    .describe("Configure DNS.")
}
