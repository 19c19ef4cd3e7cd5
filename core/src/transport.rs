//! Blocking transport backed by `ureq`.

use ureq::Agent;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes requests with a `ureq` agent.
///
/// The agent is configured to hand 4xx/5xx responses back as data rather
/// than `Err`, leaving status interpretation to the client.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent (timeouts, proxy, TLS). It must have
    /// `http_status_as_error(false)`.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let pairs = request.params.pairs();
        let pairs = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        let result = match request.method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = if request.method == HttpMethod::Get {
                    self.agent.get(&request.url)
                } else {
                    self.agent.delete(&request.url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.query_pairs(pairs).call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(&request.url)
                } else {
                    self.agent.put(&request.url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send_form(pairs)
            }
        };

        let mut response = result?;
        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
