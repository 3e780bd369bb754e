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

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueNumber, ValueString};
use thiserror::Error;

use crate::utils::parse_flag;

pub const ENV_HOSTNAME: &str = "FORTIOS_ACCESS_HOSTNAME";
pub const ENV_TOKEN: &str = "FORTIOS_ACCESS_TOKEN";
pub const ENV_INSECURE: &str = "FORTIOS_INSECURE";
pub const ENV_VDOM: &str = "FORTIOS_VDOM";
pub const ENV_RETRIES: &str = "FORTIOS_RETRIES";
pub const ENV_IMPORT_TABLE: &str = "FORTIOS_IMPORT_TABLE";

const DEFAULT_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Content of the `provider "fortios"` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub hostname: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub token: ValueString<'a>,
    pub insecure: Value<bool>,
    #[serde(borrow = "'a")]
    pub vdom: ValueString<'a>,
    pub retries: ValueNumber,
    pub import_all_tables: Value<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{attribute}` is not set and {env} is not defined")]
    Missing {
        attribute: &'static str,
        env: &'static str,
    },
    #[error("`{value}` is not a valid value for `{attribute}`")]
    Invalid {
        attribute: &'static str,
        value: String,
    },
    #[error("`{attribute}` must be known when the provider is configured")]
    Unknown { attribute: &'static str },
}

impl ConfigError {
    /// Provider attribute the error is about
    pub fn attribute(&self) -> &'static str {
        match self {
            ConfigError::Missing { attribute, .. }
            | ConfigError::Invalid { attribute, .. }
            | ConfigError::Unknown { attribute } => attribute,
        }
    }
}

/// Provider configuration with the environment fallbacks applied
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub token: String,
    pub insecure: bool,
    pub vdom: Option<String>,
    pub retries: u32,
    pub import_all: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("vdom", &self.vdom)
            .field("retries", &self.retries)
            .field("import_all", &self.import_all)
            .finish()
    }
}

fn string(
    value: &ValueString<'_>,
    attribute: &'static str,
    env_name: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, ConfigError> {
    match value {
        Value::Value(value) => Ok(Some(value.to_string())),
        Value::Null => Ok(env(env_name).filter(|value| !value.is_empty())),
        Value::Unknown => Err(ConfigError::Unknown { attribute }),
    }
}

fn flag(
    value: &Value<bool>,
    attribute: &'static str,
    env_name: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<bool, ConfigError> {
    match value {
        Value::Value(value) => Ok(*value),
        Value::Null => match env(env_name) {
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid { attribute, value }),
            None => Ok(false),
        },
        Value::Unknown => Err(ConfigError::Unknown { attribute }),
    }
}

/// Address of the device: a bare host gets the `https` scheme
fn base_url(hostname: &str) -> String {
    let hostname = hostname.trim().trim_end_matches('/');
    if hostname.contains("://") {
        hostname.to_owned()
    } else {
        format!("https://{hostname}")
    }
}

impl Settings {
    /// Resolve the configuration, looking up unset attributes with `env`
    pub fn resolve(
        config: &ProviderConfig<'_>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let hostname = string(&config.hostname, "hostname", ENV_HOSTNAME, &env)?.ok_or(
            ConfigError::Missing {
                attribute: "hostname",
                env: ENV_HOSTNAME,
            },
        )?;
        let token = string(&config.token, "token", ENV_TOKEN, &env)?.ok_or(
            ConfigError::Missing {
                attribute: "token",
                env: ENV_TOKEN,
            },
        )?;
        let vdom = string(&config.vdom, "vdom", ENV_VDOM, &env)?;

        let retries = match &config.retries {
            Value::Value(retries) => u32::try_from(*retries).map_err(|_| ConfigError::Invalid {
                attribute: "retries",
                value: retries.to_string(),
            })?,
            Value::Null => match env(ENV_RETRIES) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                    attribute: "retries",
                    value,
                })?,
                None => DEFAULT_RETRIES,
            },
            Value::Unknown => {
                return Err(ConfigError::Unknown {
                    attribute: "retries",
                })
            }
        };

        Ok(Self {
            base_url: base_url(&hostname),
            token,
            insecure: flag(&config.insecure, "insecure", ENV_INSECURE, &env)?,
            vdom,
            retries,
            import_all: flag(
                &config.import_all_tables,
                "import_all_tables",
                ENV_IMPORT_TABLE,
                &env,
            )?,
        })
    }
}
