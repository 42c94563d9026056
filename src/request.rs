//! Request parameters and the response envelope.
//!
//! Each operation takes an explicit parameter struct. Every field is
//! optional and resolved against the documented defaults at call time, so
//! the structs can be built in code or deserialized from JSON.

use crate::config::DEFAULT_PAGE;
use crate::context::CallContext;
use clap::ValueEnum;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default lower bound on clip length, in seconds.
pub const DEFAULT_MIN_LENGTH: u32 = 0;

/// Default upper bound on clip length, in seconds.
pub const DEFAULT_MAX_LENGTH: u32 = 10_000;

/// Collection used when no usable term is given.
pub const DEFAULT_COLLECTION: &str = "trending";

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query string pairs, in wire order.
pub type Query = Vec<(&'static str, String)>;

/// Family of an asset id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Audio clip.
    #[default]
    Songclip,
    /// Animated GIF with audio.
    Gifnote,
}

impl AssetType {
    /// Resource collection name used in URL paths.
    pub fn resource(self) -> &'static str {
        match self {
            Self::Songclip => "songclips",
            Self::Gifnote => "gifnotes",
        }
    }
}

/// Paging and length filters shared by list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Page number (default 1).
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size (default from configuration, normally 20).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Shuffle the page (default false).
    #[serde(default)]
    pub shuffle: Option<bool>,
    /// Minimum length in seconds, inclusive (default 0).
    #[serde(default)]
    pub min_length: Option<u32>,
    /// Maximum length in seconds, inclusive (default 10000).
    #[serde(default)]
    pub max_length: Option<u32>,
}

impl Paging {
    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enable or disable shuffling.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = Some(shuffle);
        self
    }

    /// Restrict clip length to `min..=max` seconds.
    pub fn with_length_range(mut self, min: u32, max: u32) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Append resolved paging parameters to `query`.
    pub fn append_to(&self, query: &mut Query, default_limit: u32) {
        query.push(("page", self.page.unwrap_or(DEFAULT_PAGE).to_string()));
        query.push(("limit", self.limit.unwrap_or(default_limit).to_string()));
        query.push(("shuffle", self.shuffle.unwrap_or(false).to_string()));
        query.push((
            "minLength",
            self.min_length.unwrap_or(DEFAULT_MIN_LENGTH).to_string(),
        ));
        query.push((
            "maxLength",
            self.max_length.unwrap_or(DEFAULT_MAX_LENGTH).to_string(),
        ));
    }
}

/// Parameters for `search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Query string. Either this or `context.tags` should be set.
    #[serde(default)]
    pub q: Option<String>,
    /// Paging and length filters.
    #[serde(flatten)]
    pub paging: Paging,
    /// Keep clips sharing artist and title (default true).
    #[serde(default)]
    pub allow_duplicates: Option<bool>,
    /// Caller context.
    #[serde(default)]
    pub context: Option<CallContext>,
}

impl SearchParams {
    /// Search for `q`.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    /// Set paging.
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Set `allowDuplicates`.
    pub fn with_allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = Some(allow);
        self
    }

    /// Set the caller context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Operation parameters other than `context`, in wire order.
    pub(crate) fn query(&self, default_limit: u32) -> Query {
        let mut query = Query::new();
        if let Some(q) = &self.q {
            query.push(("q", q.clone()));
        }
        self.paging.append_to(&mut query, default_limit);
        query.push((
            "allowDuplicates",
            self.allow_duplicates.unwrap_or(true).to_string(),
        ));
        query
    }
}

/// Parameters for `get_collection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParams {
    /// Collection term (default `trending`). Non-string JSON values are ignored.
    #[serde(default, deserialize_with = "lenient::term")]
    pub term: Option<String>,
    /// Paging and length filters.
    #[serde(flatten)]
    pub paging: Paging,
    /// Caller context.
    #[serde(default)]
    pub context: Option<CallContext>,
}

impl CollectionParams {
    /// Clips of collection `term`.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Default::default()
        }
    }

    /// Set paging.
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Set the caller context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Percent-encoded path segment for the collection.
    pub fn encoded_term(&self) -> String {
        match self.term.as_deref() {
            Some(term) if !term.is_empty() => utf8_percent_encode(term, PATH_SEGMENT).to_string(),
            _ => DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Parameters for `get_related`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedParams {
    /// Clip id to find related assets for.
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    /// Kind of related assets to return (default songclip).
    #[serde(default)]
    pub asset_type: AssetType,
    /// Paging and length filters.
    #[serde(flatten)]
    pub paging: Paging,
    /// Caller context.
    #[serde(default)]
    pub context: Option<CallContext>,
}

impl RelatedParams {
    /// Assets related to clip `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the asset type.
    pub fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    /// Set paging.
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    /// Set the caller context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Parameters for the play, share and add events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParams {
    /// Clip or gifnote id.
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    /// Family of `id` (default songclip).
    #[serde(default)]
    pub asset_type: AssetType,
    /// Caller context.
    #[serde(default)]
    pub context: Option<CallContext>,
}

impl EventParams {
    /// Event for songclip `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the asset type.
    pub fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    /// Set the caller context.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Decoded `{status, data}` response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Reported status; `"success"` on success.
    pub status: Option<String>,
    /// Payload; an empty object when absent or null.
    pub data: Value,
}

impl Envelope {
    /// Status value that marks a successful call.
    pub const SUCCESS: &'static str = "success";

    /// Split a response body into status and data.
    pub fn from_body(body: &Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        let data = match body.get("data") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(data) => data.clone(),
        };

        Self { status, data }
    }

    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(Self::SUCCESS)
    }

    /// `data.context.sessionId`, if present and non-empty.
    pub fn session_id(&self) -> Option<&str> {
        self.data
            .pointer("/context/sessionId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Deserializers that accept loosely typed JSON.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Keep string terms, drop anything else.
    pub fn term<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Accept ids given as strings or numbers.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or numeric id, got {other}"
            ))),
        }
    }
}
