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

use std::fmt::Debug;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[cfg(test)]
pub mod memory;
pub mod rest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    /// REST path of the object type (`firewall/ippool`)
    pub path: &'a str,
    /// Virtual domain the object lives in; the device default when `None`
    pub vdom: Option<&'a str>,
}

/// Answer of the device to a write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Confirmation {
    /// Identity of the written object, when the device reports it
    pub mkey: Option<String>,
}

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn create(&self, endpoint: &Endpoint<'_>, object: &Value) -> Result<Confirmation>;

    /// Fetch an object, `None` if it does not exist.
    /// `mkey` is `None` for singleton objects.
    async fn read(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>) -> Result<Option<Value>>;

    /// Merge the given fields into an existing object
    async fn update(
        &self,
        endpoint: &Endpoint<'_>,
        mkey: Option<&str>,
        object: &Value,
    ) -> Result<Confirmation>;

    /// Delete an object from a table
    async fn delete(&self, endpoint: &Endpoint<'_>, mkey: &str) -> Result<()>;
}

/// Render an identity returned by the device, which may be a number
pub(crate) fn mkey_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
