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

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::trace;

use super::{mkey_of, Confirmation, Endpoint, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Create,
    Read,
    Update,
    Delete,
}

/// A call received by a [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub vdom: Option<String>,
    pub mkey: Option<String>,
    pub body: Option<Value>,
}

/// In-process device holding objects in memory, with the FortiOS write semantics:
/// updates merge fields, a `null` field resets it, and renaming the key field moves the entry.
#[derive(Debug)]
pub struct MemoryTransport {
    /// Wire name of the key field, per path (`name` when not listed)
    keys: HashMap<String, String>,
    report_mkey: bool,
    objects: Mutex<BTreeMap<(String, String), Value>>,
    requests: Mutex<Vec<Request>>,
    failure: Mutex<Option<String>>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self {
            keys: Default::default(),
            report_mkey: true,
            objects: Default::default(),
            requests: Default::default(),
            failure: Default::default(),
        }
    }
}

const DEFAULT_KEY: &str = "name";
const SINGLETON: &str = "";

fn scope(endpoint: &Endpoint<'_>) -> String {
    format!("{}@{}", endpoint.path, endpoint.vdom.unwrap_or("root"))
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, path: &str, wire_key: &str) -> Self {
        self.keys.insert(path.to_owned(), wire_key.to_owned());
        self
    }

    /// Behave like a device that does not report identities in write answers
    pub fn without_mkey(mut self) -> Self {
        self.report_mkey = false;
        self
    }

    /// Store an object as if it had been configured on the device
    pub fn insert(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>, object: Value) {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (scope(endpoint), mkey.unwrap_or(SINGLETON).to_owned()),
                object,
            );
    }

    pub fn get(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>) -> Option<Value> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(scope(endpoint), mkey.unwrap_or(SINGLETON).to_owned()))
            .cloned()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make the next call fail with the given message
    pub fn fail_next(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_owned());
    }

    fn key_of(&self, path: &str) -> &str {
        self.keys.get(path).map_or(DEFAULT_KEY, String::as_str)
    }

    fn record(
        &self,
        method: Method,
        endpoint: &Endpoint<'_>,
        mkey: Option<&str>,
        body: Option<&Value>,
    ) -> Result<()> {
        trace!(?method, path = endpoint.path, ?mkey, "memory transport call");
        self.requests
            .lock()
            .map_err(|_| anyhow!("request log poisoned"))?
            .push(Request {
                method,
                path: endpoint.path.to_owned(),
                vdom: endpoint.vdom.map(str::to_owned),
                mkey: mkey.map(str::to_owned),
                body: body.cloned(),
            });
        if let Some(message) = self
            .failure
            .lock()
            .map_err(|_| anyhow!("failure slot poisoned"))?
            .take()
        {
            bail!(message);
        }
        Ok(())
    }

    fn confirm(&self, mkey: &str) -> Confirmation {
        Confirmation {
            mkey: (self.report_mkey && mkey != SINGLETON).then(|| mkey.to_owned()),
        }
    }
}

fn as_fields(object: &Value) -> Result<&Map<String, Value>> {
    object
        .as_object()
        .ok_or_else(|| anyhow!("request body is not a JSON object"))
}

fn merge(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (name, value) in patch {
        if value.is_null() {
            target.remove(name);
        } else {
            target.insert(name.clone(), value.clone());
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn create(&self, endpoint: &Endpoint<'_>, object: &Value) -> Result<Confirmation> {
        self.record(Method::Create, endpoint, None, Some(object))?;
        let fields = as_fields(object)?;
        let key = self.key_of(endpoint.path);
        let mkey = fields
            .get(key)
            .and_then(mkey_of)
            .ok_or_else(|| anyhow!("missing key field `{key}`"))?;

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("object store poisoned"))?;
        let entry = (scope(endpoint), mkey.clone());
        if objects.contains_key(&entry) {
            bail!("entry `{mkey}` already exists");
        }
        let mut stored = Map::new();
        merge(&mut stored, fields);
        objects.insert(entry, Value::Object(stored));
        Ok(self.confirm(&mkey))
    }

    async fn read(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>) -> Result<Option<Value>> {
        self.record(Method::Read, endpoint, mkey, None)?;
        Ok(self.get(endpoint, mkey))
    }

    async fn update(
        &self,
        endpoint: &Endpoint<'_>,
        mkey: Option<&str>,
        object: &Value,
    ) -> Result<Confirmation> {
        self.record(Method::Update, endpoint, mkey, Some(object))?;
        let patch = as_fields(object)?;

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("object store poisoned"))?;
        let current_key = mkey.unwrap_or(SINGLETON).to_owned();
        let entry = (scope(endpoint), current_key.clone());
        let mut stored = match (objects.remove(&entry), mkey) {
            (Some(Value::Object(stored)), _) => stored,
            // singletons always exist, with their defaults
            (_, None) => Map::new(),
            (_, Some(mkey)) => bail!("entry `{mkey}` does not exist"),
        };
        merge(&mut stored, patch);

        let new_key = match mkey {
            Some(_) => stored
                .get(self.key_of(endpoint.path))
                .and_then(mkey_of)
                .unwrap_or(current_key),
            None => current_key,
        };
        objects.insert((scope(endpoint), new_key.clone()), Value::Object(stored));
        Ok(self.confirm(&new_key))
    }

    async fn delete(&self, endpoint: &Endpoint<'_>, mkey: &str) -> Result<()> {
        self.record(Method::Delete, endpoint, Some(mkey), None)?;
        self.objects
            .lock()
            .map_err(|_| anyhow!("object store poisoned"))?
            .remove(&(scope(endpoint), mkey.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const POOLS: Endpoint<'static> = Endpoint {
        path: "firewall/ippool",
        vdom: None,
    };

    #[tokio::test]
    async fn create_then_read() {
        let transport = MemoryTransport::new();
        let confirmation = transport
            .create(&POOLS, &json!({"name": "pool1", "startip": "10.0.0.1"}))
            .await
            .unwrap();
        assert_eq!(confirmation.mkey.as_deref(), Some("pool1"));
        let object = transport.read(&POOLS, Some("pool1")).await.unwrap();
        assert_eq!(object, Some(json!({"name": "pool1", "startip": "10.0.0.1"})));
        assert_eq!(transport.read(&POOLS, Some("pool2")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let transport = MemoryTransport::new();
        transport.create(&POOLS, &json!({"name": "pool1"})).await.unwrap();
        let err = transport
            .create(&POOLS, &json!({"name": "pool1"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "entry `pool1` already exists");
    }

    #[tokio::test]
    async fn update_merges_clears_and_renames() {
        let transport = MemoryTransport::new();
        transport.insert(
            &POOLS,
            Some("pool1"),
            json!({"name": "pool1", "comments": "x", "type": "overload"}),
        );
        let confirmation = transport
            .update(
                &POOLS,
                Some("pool1"),
                &json!({"name": "pool2", "comments": null}),
            )
            .await
            .unwrap();
        assert_eq!(confirmation.mkey.as_deref(), Some("pool2"));
        assert_eq!(transport.get(&POOLS, Some("pool1")), None);
        assert_eq!(
            transport.get(&POOLS, Some("pool2")),
            Some(json!({"name": "pool2", "type": "overload"}))
        );
    }

    #[tokio::test]
    async fn singletons_always_exist() {
        let transport = MemoryTransport::new();
        let dns = Endpoint {
            path: "system/dns",
            vdom: Some("root"),
        };
        let confirmation = transport
            .update(&dns, None, &json!({"primary": "1.1.1.1"}))
            .await
            .unwrap();
        assert_eq!(confirmation.mkey, None);
        assert_eq!(
            transport.read(&dns, None).await.unwrap(),
            Some(json!({"primary": "1.1.1.1"}))
        );
    }

    #[tokio::test]
    async fn injected_failure_is_reported_once() {
        let transport = MemoryTransport::new();
        transport.fail_next("device busy");
        let err = transport.read(&POOLS, Some("pool1")).await.unwrap_err();
        assert_eq!(err.to_string(), "device busy");
        assert!(transport.read(&POOLS, Some("pool1")).await.is_ok());
        assert_eq!(transport.requests().len(), 2);
    }
}
