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

//! Catalog of the FortiOS objects exposed by the provider

use lazy_static::lazy_static;

use crate::mapper::ResourceDescriptor;

mod extendercontroller_dataplan;
mod filefilter_profile;
mod firewall_ippool;
mod router_prefixlist;
mod system_accprofile;
mod system_dns;
mod system_snmp_community;

lazy_static! {
    /// Every resource type, built once at startup
    pub static ref CATALOG: Vec<ResourceDescriptor> = vec![
        extendercontroller_dataplan::descriptor(),
        filefilter_profile::descriptor(),
        firewall_ippool::descriptor(),
        router_prefixlist::descriptor(),
        system_accprofile::descriptor(),
        system_dns::descriptor(),
        system_snmp_community::descriptor(),
    ];
}

pub fn find(type_name: &str) -> Option<&'static ResourceDescriptor> {
    CATALOG
        .iter()
        .find(|resource| resource.type_name == type_name)
}
