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

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, DataSource, Diagnostics, Schema};

use crate::lifecycle::{Lifecycle, Observed};
use crate::mapper::{ImportOptions, Node, ResourceDescriptor};
use crate::provider::SessionHandle;

use super::state::{from_local, to_local, TfNode, TfObject};
use super::validate::validate_meta;
use super::{data_source_schema, report, session, vdom, ID, VDOMPARAM};

/// Terraform data source reading one FortiOS object
#[derive(Debug, Clone)]
pub struct FortiosDataSource {
    descriptor: &'static ResourceDescriptor,
    session: SessionHandle,
}

impl FortiosDataSource {
    pub fn new(descriptor: &'static ResourceDescriptor, session: SessionHandle) -> Self {
        Self {
            descriptor,
            session,
        }
    }

    /// Identity of the requested object: the key field, or the type name for singletons
    fn identity(&self, diags: &mut Diagnostics, config: &TfObject) -> Option<String> {
        let Some(key) = self.descriptor.mkey else {
            return Some(self.descriptor.type_name.to_owned());
        };
        let identity = to_local(&self.descriptor.object, config)
            .get(key)
            .and_then(Node::render);
        if identity.is_none() {
            diags.error_short(format!("`{key}` must be known"), AttributePath::new(key));
        }
        identity
    }
}

#[async_trait]
impl DataSource for FortiosDataSource {
    type State<'a> = Value<TfObject>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(data_source_schema(self.descriptor))
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
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
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let Value::Value(config) = &config else {
            return Some(config);
        };
        let session = session(&self.session, diags).await?;
        let identity = self.identity(diags, config)?;

        let observed = Lifecycle::new(self.descriptor, session.transport.as_ref())
            .with_vdom(vdom(config, &session))
            .with_options(ImportOptions {
                import_all: true,
                ..Default::default()
            })
            .read(&identity, None)
            .await;

        match observed {
            Ok(Observed::Present { identity, state }) => {
                let mut object = from_local(&self.descriptor.object, &state);
                object.insert(
                    VDOMPARAM.to_owned(),
                    config.get(VDOMPARAM).cloned().unwrap_or(Value::Null),
                );
                object.insert(ID.to_owned(), Value::Value(TfNode::String(identity)));
                Some(Value::Value(object))
            }
            Ok(Observed::Absent) => {
                diags.root_error(
                    format!("fortios_{} not found", self.descriptor.type_name),
                    format!("No object `{identity}` exists on the device"),
                );
                None
            }
            Err(err) => {
                report(
                    diags,
                    &format!("Failed to read fortios_{}", self.descriptor.type_name),
                    err,
                );
                None
            }
        }
    }
}
