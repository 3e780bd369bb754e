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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use tf_provider::data_source::DynamicDataSource;
use tf_provider::resource::DynamicResource;
use tf_provider::{
    map, Attribute, AttributeConstraint, AttributePath, AttributeType, Block, Description,
    Diagnostics, Provider, Schema, Value, ValueEmpty,
};

use crate::config::{ProviderConfig, Settings, RETRY_DELAY};
use crate::resources::CATALOG;
use crate::tf::{FortiosDataSource, FortiosResource};
use crate::transport::rest::{FortiRestClient, RestConfig};
use crate::transport::Transport;

/// Connection to the device, available once the provider is configured
#[derive(Debug)]
pub struct Session {
    pub transport: Arc<dyn Transport>,
    /// VDOM used when a resource does not set `vdomparam`
    pub vdom: Option<String>,
    pub import_all: bool,
}

pub type SessionHandle = Arc<RwLock<Option<Arc<Session>>>>;

#[derive(Debug, Default, Clone)]
pub struct FortiosProvider {
    session: SessionHandle,
}

impl FortiosProvider {
    /// Provider already connected through `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(Arc::new(session)))),
        }
    }

    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }
}

fn optional(attr_type: AttributeType, description: &str) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint: AttributeConstraint::Optional,
        ..Default::default()
    }
}

#[async_trait]
impl Provider for FortiosProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain("FortiOS configuration through the REST API"),
                attributes: map! {
                    "hostname" => optional(
                        AttributeType::String,
                        "Address of the device, FORTIOS_ACCESS_HOSTNAME when unset",
                    ),
                    "token" => Attribute {
                        sensitive: true,
                        ..optional(
                            AttributeType::String,
                            "REST API token, FORTIOS_ACCESS_TOKEN when unset",
                        )
                    },
                    "insecure" => optional(
                        AttributeType::Bool,
                        "Do not verify the certificate of the device",
                    ),
                    "vdom" => optional(
                        AttributeType::String,
                        "Default virtual domain of the resources",
                    ),
                    "retries" => optional(
                        AttributeType::Number,
                        "Number of retries when the device cannot be reached",
                    ),
                    "import_all_tables" => optional(
                        AttributeType::Bool,
                        "Read nested tables even when they are not set in the configuration",
                    ),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Value::Value(retries) = config.retries {
            if retries < 0 {
                diags.error_short(
                    "`retries` must not be negative",
                    AttributePath::new("retries"),
                );
            }
        }
        if let Value::Value(hostname) = &config.hostname {
            if hostname.trim().is_empty() {
                diags.error_short(
                    "`hostname` must not be empty",
                    AttributePath::new("hostname"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        _terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let settings = match Settings::resolve(&config, |name| std::env::var(name).ok()) {
            Ok(settings) => settings,
            Err(err) => {
                diags.error(
                    "Invalid provider configuration",
                    err.to_string(),
                    AttributePath::new(err.attribute()),
                );
                return None;
            }
        };

        let client = match FortiRestClient::new(RestConfig {
            base_url: settings.base_url.clone(),
            token: settings.token,
            insecure: settings.insecure,
            retries: settings.retries,
            retry_delay: RETRY_DELAY,
        }) {
            Ok(client) => client,
            Err(err) => {
                diags.root_error("Could not set up the FortiOS client", format!("{err:#}"));
                return None;
            }
        };
        info!(base_url = %settings.base_url, vdom = ?settings.vdom, "provider configured");

        *self.session.write().await = Some(Arc::new(Session {
            transport: Arc::new(client),
            vdom: settings.vdom,
            import_all: settings.import_all,
        }));
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(
            CATALOG
                .iter()
                .map(|descriptor| {
                    let resource: Box<dyn DynamicResource> =
                        Box::new(FortiosResource::new(descriptor, self.session.clone()));
                    (descriptor.type_name.to_owned(), resource)
                })
                .collect(),
        )
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(
            CATALOG
                .iter()
                .map(|descriptor| {
                    let data_source: Box<dyn DynamicDataSource> =
                        Box::new(FortiosDataSource::new(descriptor, self.session.clone()));
                    (descriptor.type_name.to_owned(), data_source)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryTransport;

    #[test]
    fn registers_the_catalog() {
        let provider = FortiosProvider::default();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).unwrap();
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        assert_eq!(resources.len(), CATALOG.len());
        assert_eq!(data_sources.len(), CATALOG.len());
        assert!(resources.contains_key("firewall_ippool"));
        assert!(data_sources.contains_key("system_dns"));
    }

    #[test]
    fn token_is_sensitive() {
        let schema = FortiosProvider::default()
            .schema(&mut Diagnostics::default())
            .unwrap();
        assert!(schema.block.attributes["token"].sensitive);
        assert!(!schema.block.attributes["hostname"].sensitive);
    }

    #[tokio::test]
    async fn rejects_negative_retries() {
        let config = ProviderConfig {
            retries: Value::Value(-2),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        assert!(FortiosProvider::default()
            .validate(&mut diags, config)
            .await
            .is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_shared_with_resources() {
        let provider = FortiosProvider::with_session(Session {
            transport: Arc::new(MemoryTransport::new()),
            vdom: Some("root".into()),
            import_all: false,
        });
        let session = provider.session().read().await.clone().unwrap();
        assert_eq!(session.vdom.as_deref(), Some("root"));
    }
}
