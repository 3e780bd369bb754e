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
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use super::{mkey_of, Confirmation, Endpoint, Transport};

const API_PREFIX: [&str; 3] = ["api", "v2", "cmdb"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct RestConfig {
    /// Scheme and authority of the device (`https://192.168.1.99`)
    pub base_url: String,
    pub token: String,
    /// Accept self-signed certificates
    pub insecure: bool,
    /// Number of extra attempts after a connection failure
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// Transport speaking to the FortiOS `cmdb` REST API
#[derive(Debug)]
pub struct FortiRestClient {
    config: RestConfig,
    base: Url,
    client: Client,
}

/// Body of every FortiOS answer
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Value,
    #[serde(default)]
    mkey: Value,
    #[serde(default)]
    cli_error: Option<String>,
    #[serde(default)]
    error: Option<i64>,
}

impl FortiRestClient {
    pub fn new(config: RestConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid device address `{}`", config.base_url))?;
        if base.cannot_be_a_base() {
            bail!("invalid device address `{}`", config.base_url);
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("could not build the HTTP client")?;
        Ok(Self {
            config,
            base,
            client,
        })
    }

    fn url(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| anyhow!("invalid device address `{}`", self.config.base_url))?;
            segments.pop_if_empty();
            segments.extend(API_PREFIX);
            segments.extend(endpoint.path.split('/').filter(|s| !s.is_empty()));
            if let Some(mkey) = mkey {
                segments.push(mkey);
            }
        }
        if let Some(vdom) = endpoint.vdom {
            url.query_pairs_mut().append_pair("vdom", vdom);
        }
        Ok(url)
    }

    /// Send a request, retrying when the device cannot be reached
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Response> {
        let mut attempt = 0;
        loop {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .bearer_auth(&self.config.token)
                .header(header::ACCEPT, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(%method, path = url.path(), attempt, "sending request");
            match request.send().await {
                Ok(response) => {
                    debug!(status = %response.status(), "received response");
                    return Ok(response);
                }
                Err(err)
                    if attempt < self.config.retries && (err.is_connect() || err.is_timeout()) =>
                {
                    attempt += 1;
                    warn!(error = %err, attempt, "device unreachable, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("{method} {} failed", url.path()))
                }
            }
        }
    }
}

/// Decode the answer, turning HTTP errors into messages carrying the device diagnostic
async fn envelope(response: Response) -> Result<Envelope> {
    let status = response.status();
    let text = response
        .text()
        .await
        .context("could not read the device answer")?;
    trace!(%status, body = %text, "response body");

    if !status.is_success() {
        let envelope = serde_json::from_str::<Envelope>(&text).unwrap_or_default();
        match (envelope.cli_error, envelope.error) {
            (Some(detail), _) => bail!("device answered {status}: {}", detail.trim()),
            (None, Some(code)) => bail!("device answered {status} (error {code})"),
            (None, None) => bail!("device answered {status}"),
        }
    }
    if text.trim().is_empty() {
        return Ok(Envelope::default());
    }
    serde_json::from_str(&text).context("device answer is not a FortiOS JSON envelope")
}

fn confirmation(envelope: Envelope) -> Confirmation {
    Confirmation {
        mkey: mkey_of(&envelope.mkey),
    }
}

#[async_trait]
impl Transport for FortiRestClient {
    #[instrument(skip(self, object), fields(path = endpoint.path))]
    async fn create(&self, endpoint: &Endpoint<'_>, object: &Value) -> Result<Confirmation> {
        let url = self.url(endpoint, None)?;
        let response = self.send(Method::POST, url, Some(object)).await?;
        Ok(confirmation(envelope(response).await?))
    }

    #[instrument(skip(self), fields(path = endpoint.path))]
    async fn read(&self, endpoint: &Endpoint<'_>, mkey: Option<&str>) -> Result<Option<Value>> {
        let url = self.url(endpoint, mkey)?;
        let response = self.send(Method::GET, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("object not found");
            return Ok(None);
        }
        Ok(match envelope(response).await?.results {
            Value::Array(mut results) => {
                if results.is_empty() {
                    None
                } else {
                    Some(results.swap_remove(0))
                }
            }
            Value::Null => None,
            object => Some(object),
        })
    }

    #[instrument(skip(self, object), fields(path = endpoint.path))]
    async fn update(
        &self,
        endpoint: &Endpoint<'_>,
        mkey: Option<&str>,
        object: &Value,
    ) -> Result<Confirmation> {
        let url = self.url(endpoint, mkey)?;
        let response = self.send(Method::PUT, url, Some(object)).await?;
        Ok(confirmation(envelope(response).await?))
    }

    #[instrument(skip(self), fields(path = endpoint.path))]
    async fn delete(&self, endpoint: &Endpoint<'_>, mkey: &str) -> Result<()> {
        let url = self.url(endpoint, Some(mkey))?;
        let response = self.send(Method::DELETE, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("object already deleted");
            return Ok(());
        }
        envelope(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POOLS: Endpoint<'static> = Endpoint {
        path: "firewall/ippool",
        vdom: Some("root"),
    };

    fn client(server: &MockServer) -> FortiRestClient {
        FortiRestClient::new(RestConfig {
            base_url: server.uri(),
            token: "secret".into(),
            insecure: false,
            retries: 0,
            retry_delay: Duration::ZERO,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn read_unwraps_table_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/firewall/ippool/pool1"))
            .and(query_param("vdom", "root"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "http_status": 200,
                "results": [{"name": "pool1", "startip": "10.0.0.1"}],
            })))
            .mount(&server)
            .await;

        let object = client(&server).read(&POOLS, Some("pool1")).await.unwrap();
        assert_eq!(object, Some(json!({"name": "pool1", "startip": "10.0.0.1"})));
    }

    #[tokio::test]
    async fn read_singleton_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/cmdb/system/dns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"primary": "1.1.1.1"},
            })))
            .mount(&server)
            .await;

        let dns = Endpoint {
            path: "system/dns",
            vdom: None,
        };
        let object = client(&server).read(&dns, None).await.unwrap();
        assert_eq!(object, Some(json!({"primary": "1.1.1.1"})));
    }

    #[tokio::test]
    async fn not_found_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(path("/api/v2/cmdb/firewall/ippool/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"http_status": 404})))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_eq!(client.read(&POOLS, Some("gone")).await.unwrap(), None);
        assert!(client.delete(&POOLS, "gone").await.is_ok());
    }

    #[tokio::test]
    async fn create_reports_mkey() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/cmdb/firewall/ippool"))
            .and(body_json(json!({"name": "pool1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "http_status": 200,
                "mkey": "pool1",
                "status": "success",
            })))
            .mount(&server)
            .await;

        let confirmation = client(&server)
            .create(&POOLS, &json!({"name": "pool1"}))
            .await
            .unwrap();
        assert_eq!(confirmation.mkey.as_deref(), Some("pool1"));
    }

    #[tokio::test]
    async fn numeric_mkey_is_rendered() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v2/cmdb/system.snmp/community/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mkey": 3})))
            .mount(&server)
            .await;

        let communities = Endpoint {
            path: "system.snmp/community",
            vdom: None,
        };
        let confirmation = client(&server)
            .update(&communities, Some("3"), &json!({"name": "public"}))
            .await
            .unwrap();
        assert_eq!(confirmation.mkey.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn device_errors_carry_cli_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "http_status": 500,
                "error": -5,
                "cli_error": "entry already exists\n",
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .create(&POOLS, &json!({"name": "pool1"}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "device answered 500 Internal Server Error: entry already exists"
        );
    }

    #[tokio::test]
    async fn http_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = FortiRestClient::new(RestConfig {
            base_url: server.uri(),
            token: "secret".into(),
            insecure: false,
            retries: 2,
            retry_delay: Duration::ZERO,
        })
        .unwrap();
        let err = client.read(&POOLS, Some("pool1")).await.unwrap_err();
        assert_eq!(err.to_string(), "device answered 500 Internal Server Error");
    }

    #[tokio::test]
    async fn unreachable_device_is_retried() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = FortiRestClient::new(RestConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            token: "secret".into(),
            insecure: false,
            retries: 2,
            retry_delay: Duration::from_millis(50),
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.read(&POOLS, Some("pool1")).await.unwrap_err();
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(err.to_string(), "GET /api/v2/cmdb/firewall/ippool/pool1 failed");
    }

    #[test]
    fn mkeys_are_escaped() {
        let client = FortiRestClient::new(RestConfig {
            base_url: "https://fw.example/".into(),
            token: String::new(),
            insecure: true,
            retries: 0,
            retry_delay: Duration::ZERO,
        })
        .unwrap();
        let url = client.url(&POOLS, Some("a/b c")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fw.example/api/v2/cmdb/firewall/ippool/a%2Fb%20c?vdom=root"
        );
    }

    #[test]
    fn token_is_not_printed() {
        let config = RestConfig {
            base_url: "https://fw.example".into(),
            token: "secret".into(),
            insecure: false,
            retries: 3,
            retry_delay: Duration::from_secs(1),
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
