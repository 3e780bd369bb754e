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

use async_trait::async_trait;
use tracing::debug;

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource, Schema};

use crate::lifecycle::{Lifecycle, Observed};
use crate::mapper::{Fields, ResourceDescriptor};
use crate::provider::{Session, SessionHandle};

use super::normalize::mark_computed;
use super::state::{from_local, to_local, TfNode, TfObject};
use super::validate::{validate_fields, validate_meta};
use super::{copy_meta, identity, import_options, report, resource_schema, session, vdom, ID};

/// Terraform resource managing one FortiOS object type
#[derive(Debug, Clone)]
pub struct FortiosResource {
    descriptor: &'static ResourceDescriptor,
    session: SessionHandle,
}

impl FortiosResource {
    pub fn new(descriptor: &'static ResourceDescriptor, session: SessionHandle) -> Self {
        Self {
            descriptor,
            session,
        }
    }

    fn lifecycle<'a>(&self, object: &'a TfObject, session: &'a Session) -> Lifecycle<'a> {
        Lifecycle::new(self.descriptor, session.transport.as_ref())
            .with_vdom(vdom(object, session))
            .with_options(import_options(object, session))
    }

    /// Terraform state of an observed object, keeping the engine-wide attributes of `meta`
    fn state(&self, identity: String, fields: &Fields, meta: &TfObject) -> TfObject {
        let mut object = from_local(&self.descriptor.object, fields);
        copy_meta(meta, &mut object);
        object.insert(ID.to_owned(), Value::Value(TfNode::String(identity)));
        object
    }

    fn identity<'a>(&self, diags: &mut Diagnostics, object: &'a TfObject) -> Option<&'a str> {
        let identity = identity(object);
        if identity.is_none() {
            diags.error_short("Resource has no identity", AttributePath::new(ID));
        }
        identity
    }

    fn summary(&self, phase: &str) -> String {
        format!("Failed to {phase} fortios_{}", self.descriptor.type_name)
    }
}

#[async_trait]
impl Resource for FortiosResource {
    type State<'a> = Value<TfObject>;
    /// Unknown right after an import, until the first read
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(resource_schema(self.descriptor))
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            validate_fields(diags, &self.descriptor.object, config, None);
            validate_meta(diags, config);
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(object) = &state else {
            return Some((state, private_state));
        };
        let session = session(&self.session, diags).await?;
        let identity = self.identity(diags, object)?;

        // Freshly imported objects have no local tree to compare with
        let prior = if private_state.is_unknown() {
            None
        } else {
            Some(to_local(&self.descriptor.object, object))
        };

        match self
            .lifecycle(object, &session)
            .read(identity, prior.as_ref())
            .await
        {
            Ok(Observed::Absent) => {
                debug!(identity, "object vanished, removing it from the state");
                Some((Value::Null, Default::default()))
            }
            Ok(Observed::Present { identity, state }) => Some((
                Value::Value(self.state(identity, &state, object)),
                Default::default(),
            )),
            Err(err) => {
                report(diags, &self.summary("read"), err);
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        if let Value::Value(object) = &mut state {
            mark_computed(&self.descriptor.object, object);
            object.insert(ID.to_owned(), Value::Unknown);
        }
        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        let mut state = proposed_state;
        if let (Value::Value(prior), Value::Value(object)) = (&prior_state, &mut state) {
            if prior != &*object {
                mark_computed(&self.descriptor.object, object);
            }
            let renamed = self
                .descriptor
                .mkey
                .is_some_and(|key| prior.get(key) != object.get(key));
            let id = if renamed {
                Value::Unknown
            } else {
                prior.get(ID).cloned().unwrap_or(Value::Unknown)
            };
            object.insert(ID.to_owned(), id);
        }
        Some((state, prior_private_state, Vec::new()))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        Some(())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(object) = &planned_state else {
            diags.root_error(self.summary("create"), "The planned state is null");
            return None;
        };
        let session = session(&self.session, diags).await?;
        let local = to_local(&self.descriptor.object, object);

        match self.lifecycle(object, &session).create(&local).await {
            Ok(Observed::Present { identity, state }) => Some((
                Value::Value(self.state(identity, &state, object)),
                private_state,
            )),
            Ok(Observed::Absent) => {
                diags.root_error(
                    self.summary("create"),
                    "The object was accepted by the device but could not be read back",
                );
                None
            }
            Err(err) => {
                report(diags, &self.summary("create"), err);
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let (Value::Value(prior), Value::Value(object)) = (&prior_state, &planned_state) else {
            diags.root_error(self.summary("update"), "The prior or planned state is null");
            return None;
        };
        let session = session(&self.session, diags).await?;
        let identity = self.identity(diags, prior)?;
        let prior_local = to_local(&self.descriptor.object, prior);
        let local = to_local(&self.descriptor.object, object);

        match self
            .lifecycle(object, &session)
            .update(identity, &local, Some(&prior_local))
            .await
        {
            Ok(Observed::Present { identity, state }) => Some((
                Value::Value(self.state(identity, &state, object)),
                private_state,
            )),
            Ok(Observed::Absent) => {
                diags.root_error(
                    self.summary("update"),
                    "The object was not found on the device after the update",
                );
                None
            }
            Err(err) => {
                report(diags, &self.summary("update"), err);
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Value::Value(object) = &state else {
            return Some(());
        };
        let session = session(&self.session, diags).await?;
        let identity = self.identity(diags, object)?;

        match self.lifecycle(object, &session).delete(identity).await {
            Ok(_) => Some(()),
            Err(err) => {
                report(diags, &self.summary("delete"), err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let id = id.trim();
        let identity = match (id.is_empty(), self.descriptor.is_singleton()) {
            (false, _) => id.to_owned(),
            (true, true) => self.descriptor.type_name.to_owned(),
            (true, false) => {
                diags.root_error(
                    self.summary("import"),
                    "The identity of the object to import is empty",
                );
                return None;
            }
        };
        let state = self.state(identity, &Fields::new(), &TfObject::new());
        Some((Value::Value(state), Value::Unknown))
    }
}
