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

//! Create, read, update and delete of one resource against a transport

use std::fmt::Display;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, instrument, warn};

use crate::mapper::{expand, flatten, Fields, ImportOptions, Node, ResourceDescriptor};
use crate::transport::{Endpoint, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Create,
    Read,
    Update,
    Delete,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Create => "create",
            Phase::Read => "read",
            Phase::Update => "update",
            Phase::Delete => "delete",
        })
    }
}

/// State of a resource as observed on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Absent,
    Present { identity: String, state: Fields },
}

#[derive(Debug, Clone, Copy)]
pub struct Lifecycle<'a> {
    resource: &'a ResourceDescriptor,
    transport: &'a dyn Transport,
    vdom: Option<&'a str>,
    options: ImportOptions,
}

impl<'a> Lifecycle<'a> {
    pub fn new(resource: &'a ResourceDescriptor, transport: &'a dyn Transport) -> Self {
        Self {
            resource,
            transport,
            vdom: None,
            options: ImportOptions::default(),
        }
    }

    pub fn with_vdom(mut self, vdom: Option<&'a str>) -> Self {
        self.vdom = vdom;
        self
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    fn endpoint(&self) -> Endpoint<'a> {
        Endpoint {
            path: self.resource.path,
            vdom: self.vdom,
        }
    }

    /// Identity used on the wire; singletons are addressed without one
    fn remote_key<'i>(&self, identity: &'i str) -> Option<&'i str> {
        if self.resource.is_singleton() {
            None
        } else {
            Some(identity)
        }
    }

    fn failed(&self, phase: Phase) -> String {
        format!("failed to {phase} {}", self.resource.type_name)
    }

    /// Value of the key field submitted in the local tree
    fn submitted_key(&self, local: &Fields) -> Option<String> {
        self.resource
            .mkey
            .and_then(|key| local.get(key))
            .and_then(Node::render)
    }

    /// Identity to use when the device did not report one
    fn fallback_identity(&self, local: &Fields) -> Result<String> {
        let identity = match self.resource.mkey {
            None => self.resource.type_name.to_owned(),
            Some(key) => self.submitted_key(local).ok_or_else(|| {
                anyhow!("the device did not report an identity and `{key}` is not set")
            })?,
        };
        warn!(
            resource = self.resource.type_name,
            %identity,
            "device did not report an identity, using a synthesized one"
        );
        Ok(identity)
    }

    #[instrument(skip_all, fields(resource = self.resource.type_name))]
    pub async fn create(&self, local: &Fields) -> Result<Observed> {
        let wire = expand(&self.resource.object, local, None, false)
            .with_context(|| self.failed(Phase::Create))?;
        let endpoint = self.endpoint();
        let confirmation = if self.resource.is_singleton() {
            self.transport.update(&endpoint, None, &wire).await
        } else {
            self.transport.create(&endpoint, &wire).await
        }
        .with_context(|| self.failed(Phase::Create))?;

        let identity = match confirmation.mkey {
            Some(mkey) => mkey,
            None => self
                .fallback_identity(local)
                .with_context(|| self.failed(Phase::Create))?,
        };
        debug!(%identity, "created");
        self.read(&identity, Some(local)).await
    }

    /// Fetch the object; a missing object is [`Observed::Absent`], not an error
    #[instrument(skip(self, prior), fields(resource = self.resource.type_name))]
    pub async fn read(&self, identity: &str, prior: Option<&Fields>) -> Result<Observed> {
        let wire = self
            .transport
            .read(&self.endpoint(), self.remote_key(identity))
            .await
            .with_context(|| self.failed(Phase::Read))?;
        let Some(wire) = wire else {
            debug!("not found on the device");
            return Ok(Observed::Absent);
        };
        let state = flatten(&self.resource.object, &wire, prior, self.options)
            .with_context(|| self.failed(Phase::Read))?;
        Ok(Observed::Present {
            identity: identity.to_owned(),
            state,
        })
    }

    /// Push the changes from `prior` to `local`; the identity follows a renamed key field
    #[instrument(skip(self, local, prior), fields(resource = self.resource.type_name))]
    pub async fn update(
        &self,
        identity: &str,
        local: &Fields,
        prior: Option<&Fields>,
    ) -> Result<Observed> {
        let wire = expand(&self.resource.object, local, prior, false)
            .with_context(|| self.failed(Phase::Update))?;
        let confirmation = self
            .transport
            .update(&self.endpoint(), self.remote_key(identity), &wire)
            .await
            .with_context(|| self.failed(Phase::Update))?;

        let identity = confirmation
            .mkey
            .or_else(|| self.submitted_key(local))
            .unwrap_or_else(|| identity.to_owned());
        self.read(&identity, Some(local)).await
    }

    /// Remove the object; singletons are reset to their defaults instead
    #[instrument(skip(self), fields(resource = self.resource.type_name))]
    pub async fn delete(&self, identity: &str) -> Result<Observed> {
        let endpoint = self.endpoint();
        match self.remote_key(identity) {
            Some(mkey) => self.transport.delete(&endpoint, mkey).await,
            None => {
                let wire = expand(&self.resource.object, &Fields::new(), None, true)
                    .with_context(|| self.failed(Phase::Delete))?;
                self.transport
                    .update(&endpoint, None, &wire)
                    .await
                    .map(|_| ())
            }
        }
        .with_context(|| self.failed(Phase::Delete))?;
        Ok(Observed::Absent)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mapper::SortMode;
    use crate::resources;
    use crate::transport::memory::{Method, MemoryTransport};

    fn fields(value: serde_json::Value) -> Fields {
        match Node::from(value) {
            Node::Object(fields) => fields,
            other => panic!("not an object: {other:?}"),
        }
    }

    fn present(observed: Observed) -> (String, Fields) {
        match observed {
            Observed::Present { identity, state } => (identity, state),
            Observed::Absent => panic!("resource is absent"),
        }
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        let lifecycle = Lifecycle::new(ippool, &transport);

        let local = fields(json!({"name": "pool1", "startip": "10.0.0.1", "endip": "10.0.0.10"}));
        let (identity, state) = present(lifecycle.create(&local).await.unwrap());
        assert_eq!(identity, "pool1");
        assert_eq!(state, local);

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Create);
        assert_eq!(
            requests[0].body,
            Some(json!({"name": "pool1", "startip": "10.0.0.1", "endip": "10.0.0.10"}))
        );
        assert_eq!(requests[1].method, Method::Read);
        assert_eq!(requests[1].mkey.as_deref(), Some("pool1"));
    }

    #[tokio::test]
    async fn singleton_create_without_identity() {
        let transport = MemoryTransport::new().without_mkey();
        let dns = resources::find("system_dns").unwrap();
        let lifecycle = Lifecycle::new(dns, &transport).with_vdom(Some("root"));

        let local = fields(json!({"primary": "8.8.8.8"}));
        let (identity, state) = present(lifecycle.create(&local).await.unwrap());
        assert_eq!(identity, "system_dns");
        assert_eq!(state.get("primary"), Some(&Node::from("8.8.8.8")));

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Update);
        assert_eq!(requests[0].mkey, None);
    }

    #[tokio::test]
    async fn table_create_without_identity_uses_key_field() {
        let transport = MemoryTransport::new().without_mkey();
        let ippool = resources::find("firewall_ippool").unwrap();
        let local = fields(json!({"name": "pool1", "startip": "10.0.0.1", "endip": "10.0.0.1"}));
        let (identity, _) = present(
            Lifecycle::new(ippool, &transport)
                .create(&local)
                .await
                .unwrap(),
        );
        assert_eq!(identity, "pool1");
    }

    #[tokio::test]
    async fn read_missing_is_absent() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        let observed = Lifecycle::new(ippool, &transport)
            .read("nope", None)
            .await
            .unwrap();
        assert_eq!(observed, Observed::Absent);
    }

    #[tokio::test]
    async fn delete_twice_succeeds() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        let lifecycle = Lifecycle::new(ippool, &transport);
        let local = fields(json!({"name": "pool1", "startip": "10.0.0.1", "endip": "10.0.0.1"}));
        lifecycle.create(&local).await.unwrap();

        assert_eq!(lifecycle.delete("pool1").await.unwrap(), Observed::Absent);
        assert_eq!(lifecycle.delete("pool1").await.unwrap(), Observed::Absent);
        assert_eq!(lifecycle.read("pool1", None).await.unwrap(), Observed::Absent);
    }

    #[tokio::test]
    async fn singleton_delete_resets_every_field() {
        let transport = MemoryTransport::new();
        let dns = resources::find("system_dns").unwrap();
        let lifecycle = Lifecycle::new(dns, &transport);
        lifecycle
            .create(&fields(json!({"primary": "8.8.8.8", "timeout": 5})))
            .await
            .unwrap();

        lifecycle.delete("system_dns").await.unwrap();
        let requests = transport.requests();
        let reset = requests.last().unwrap();
        assert_eq!(reset.method, Method::Update);
        let body = reset.body.as_ref().unwrap();
        assert_eq!(body["primary"], json!(null));
        assert_eq!(body["domain"], json!([]));
        assert_eq!(body["timeout"], json!(null));
    }

    #[tokio::test]
    async fn update_follows_renamed_identity() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        let lifecycle = Lifecycle::new(ippool, &transport);
        let before = fields(json!({
            "name": "pool1", "startip": "10.0.0.1", "endip": "10.0.0.1", "comments": "old"
        }));
        lifecycle.create(&before).await.unwrap();

        let after = fields(json!({"name": "pool2", "startip": "10.0.0.1", "endip": "10.0.0.1"}));
        let (identity, state) =
            present(lifecycle.update("pool1", &after, Some(&before)).await.unwrap());
        assert_eq!(identity, "pool2");
        assert_eq!(state.get("comments"), None);

        let update = &transport.requests()[2];
        assert_eq!(update.mkey.as_deref(), Some("pool1"));
        assert_eq!(update.body.as_ref().unwrap()["comments"], json!(null));
    }

    #[tokio::test]
    async fn nested_tables_follow_sort_mode() {
        let transport = MemoryTransport::new().with_key("system.snmp/community", "id");
        let community = resources::find("system_snmp_community").unwrap();
        transport.insert(
            &Endpoint {
                path: "system.snmp/community",
                vdom: None,
            },
            Some("1"),
            json!({
                "id": 1, "name": "public",
                "hosts": [{"id": 10, "ip": "10.0.0.10"}, {"id": 2, "ip": "10.0.0.2"}],
            }),
        );

        let sorted = Lifecycle::new(community, &transport).with_options(ImportOptions {
            import_all: true,
            sort: SortMode::Natural,
        });
        let (_, state) = present(sorted.read("1", None).await.unwrap());
        let ids: Vec<_> = state["hosts"]
            .as_list()
            .unwrap()
            .iter()
            .map(|host| host.as_object().unwrap()["id"].as_int().unwrap())
            .collect();
        assert_eq!(ids, [2, 10]);

        // not tracked locally and not asked for
        let (_, state) = present(
            Lifecycle::new(community, &transport)
                .read("1", Some(&fields(json!({"fosid": 1, "name": "public"}))))
                .await
                .unwrap(),
        );
        assert_eq!(state.get("hosts"), None);
    }

    #[tokio::test]
    async fn errors_name_phase_and_resource() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        transport.fail_next("connection reset");
        let err = Lifecycle::new(ippool, &transport)
            .read("pool1", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to read firewall_ippool");
        assert_eq!(err.root_cause().to_string(), "connection reset");
    }

    #[tokio::test]
    async fn mismatch_aborts_before_sending() {
        let transport = MemoryTransport::new();
        let ippool = resources::find("firewall_ippool").unwrap();
        let local = fields(json!({
            "name": "pool1",
            "startip": "10.0.0.1",
            "endip": "10.0.0.1",
            "block_size": "big",
        }));
        let err = Lifecycle::new(ippool, &transport)
            .create(&local)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to create firewall_ippool");
        assert!(transport.requests().is_empty());
    }
}
