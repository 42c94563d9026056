//! HTTP client holding the session state and the shared request pipeline.
//!
//! Every endpoint call goes through the same steps: attach credentials,
//! merge the caller's context with the client's identity, send one request,
//! learn the session id from the response, then gate on `status`.

use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::{Result, SongclipError};
use crate::request::{Envelope, Query};
use crate::session::SessionState;
use reqwest::{Client, RequestBuilder, header, redirect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Longest error body kept in [`SongclipError::HttpStatus`].
const MAX_ERROR_BODY: usize = 500;

const MAX_REDIRECTS: usize = 5;

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read operations.
    Get,
    /// Event operations.
    Post,
}

/// Credentials attached to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Value of the `apikey` header.
    pub apikey: Option<String>,
    /// Value of the `authorization` header.
    pub authorization: Option<String>,
}

impl AuthHeaders {
    /// Attach the headers that have a value.
    fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(apikey) = &self.apikey {
            request = request.header("apikey", apikey);
        }
        if let Some(authorization) = &self.authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        request
    }
}

/// A single outbound call, fully resolved.
#[derive(Debug, Clone)]
pub(crate) struct ApiCall {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: String,
    pub query: Query,
    pub context: CallContext,
    pub explicit_json: bool,
}

impl ApiCall {
    pub fn get(operation: &'static str, path: String, query: Query, context: CallContext) -> Self {
        Self {
            operation,
            method: HttpMethod::Get,
            path,
            query,
            context,
            explicit_json: false,
        }
    }

    pub fn post(operation: &'static str, path: String, context: CallContext) -> Self {
        Self {
            operation,
            method: HttpMethod::Post,
            path,
            query: Query::new(),
            context,
            explicit_json: false,
        }
    }

    /// Send `content-type: application/json` explicitly.
    pub fn with_explicit_json(mut self) -> Self {
        self.explicit_json = true;
        self
    }
}

#[derive(Serialize)]
struct EventBody<'a> {
    context: &'a CallContext,
}

/// Client for the Songclip API.
///
/// One instance represents one end user: it generates an anonymous id on
/// first use and remembers the first session id the server hands out.
/// Use one client per user when serving several users from one process.
#[derive(Debug)]
pub struct SongclipClient {
    http: Client,
    config: ClientConfig,
    base_url: String,
    default_limit: u32,
    state: SessionState,
}

impl SongclipClient {
    /// Create a new client.
    ///
    /// Credentials are not checked here; a missing key surfaces as an
    /// authentication failure from the API.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true);

        // A zero timeout means wait forever
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }

        if let Some(proxy) = &config.proxy {
            let mut outbound =
                reqwest::Proxy::all(proxy.url()).map_err(SongclipError::HttpClient)?;
            if let Some(auth) = &proxy.auth {
                outbound = outbound.basic_auth(&auth.username, &auth.password);
            }
            builder = builder.proxy(outbound);
        }

        let http = builder.build().map_err(SongclipError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.resolved_base_url(),
            default_limit: config.resolved_default_limit(),
            config,
            state: SessionState::new(),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Anonymous user id, generated on first call.
    pub fn unique_id(&self) -> String {
        self.state.unique_id()
    }

    /// Session id learned from the API, if any.
    pub fn session_id(&self) -> Option<String> {
        self.state.session_id()
    }

    /// Credentials from the configuration, present or not.
    pub fn build_headers(&self) -> AuthHeaders {
        AuthHeaders {
            apikey: self.config.api_key.clone(),
            authorization: self.config.authorization.clone(),
        }
    }

    /// Context to send for a call: the caller's fields, with session id,
    /// source platform and anonymous id filled in where missing.
    pub fn populate_context(&self, caller: Option<&CallContext>) -> CallContext {
        let session_id = self.state.session_id();
        CallContext::merge(caller, session_id.as_deref(), || self.state.unique_id())
    }

    pub(crate) fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Send one request. Returns `None` for an empty or `null` body.
    pub(crate) async fn send(&self, call: ApiCall) -> Result<Option<Value>> {
        let operation = call.operation;
        let url = format!("{}{}", self.base_url, call.path);

        trace!(operation, method = ?call.method, url = %url, "Sending request");

        let mut request = match call.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        request = self.build_headers().apply(request);
        if call.explicit_json {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }

        request = match call.method {
            HttpMethod::Get => {
                let context = serde_json::to_string(&call.context)
                    .map_err(|source| SongclipError::Encode { operation, source })?;
                let mut query: Query = Vec::with_capacity(call.query.len() + 1);
                query.push(("context", context));
                query.extend(call.query);
                request.query(&query)
            }
            HttpMethod::Post => request.json(&EventBody {
                context: &call.context,
            }),
        };

        let response = request
            .send()
            .await
            .map_err(|source| SongclipError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(operation, status = status.as_u16(), "Non-success HTTP status");
            return Err(SongclipError::HttpStatus {
                operation,
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SongclipError::Transport { operation, source })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|source| SongclipError::Decode { operation, source })?;
        Ok((!body.is_null()).then_some(body))
    }

    /// Learn the session id from `body`, then gate on its status.
    ///
    /// The session id is recorded even when the call failed.
    pub(crate) fn settle(&self, operation: &'static str, body: &Value) -> Result<Value> {
        let envelope = Envelope::from_body(body);

        if let Some(session_id) = envelope.session_id() {
            if self.state.learn_session(session_id) {
                debug!(operation, session_id, "Learned session id");
            }
        }

        if !envelope.is_success() {
            debug!(operation, status = ?envelope.status, "API reported failure");
            return Err(SongclipError::Application {
                operation,
                payload: envelope.data,
            });
        }

        Ok(envelope.data)
    }

    /// Send a read call and return the `data` member of a successful response.
    pub(crate) async fn fetch(&self, call: ApiCall) -> Result<Value> {
        let operation = call.operation;
        let body = self.send(call).await?.unwrap_or(Value::Null);
        self.settle(operation, &body)
    }

    /// Send an event call and return the whole body, or `None` if it was
    /// empty or falsy.
    pub(crate) async fn post_event(&self, call: ApiCall) -> Result<Option<Value>> {
        let operation = call.operation;
        match self.send(call).await? {
            Some(body) if !is_falsy(&body) => {
                self.settle(operation, &body)?;
                Ok(Some(body))
            }
            _ => Ok(None),
        }
    }
}

/// `null`, `false`, zero and `""`.
fn is_falsy(body: &Value) -> bool {
    match body {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Decode `data[field]` as a list. `None` when the field is absent or null.
pub(crate) fn project<T: DeserializeOwned>(
    operation: &'static str,
    data: &Value,
    field: &str,
) -> Result<Option<Vec<T>>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(list) => serde_json::from_value(list.clone())
            .map(Some)
            .map_err(|source| SongclipError::Decode { operation, source }),
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY {
        format!("{}...", body.chars().take(MAX_ERROR_BODY).collect::<String>())
    } else {
        body.to_string()
    }
}
