//! Per-call context sent alongside every request.
//!
//! The API groups calls by an anonymous user id and a session id carried in
//! a `context` object. Callers may supply any part of it; the client fills
//! in whatever is missing from its own state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform reported when the caller does not name one.
pub const DEFAULT_SOURCE_PLATFORM: &str = "web";

/// Context object attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContext {
    /// Server-assigned session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Anonymous user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,

    /// Calling platform: `web`, `iOS`, `Android`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_platform: Option<String>,

    /// Tags to match, e.g. `["love", "flirt"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Caller-defined extensions, sent as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session id.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the anonymous user id.
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Set the source platform.
    pub fn with_source_platform(mut self, platform: impl Into<String>) -> Self {
        self.source_platform = Some(platform.into());
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Add an extension field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merge `caller` with client state, filling only missing fields.
    ///
    /// Empty strings count as missing. `unique_id` is only invoked when the
    /// caller did not supply an id.
    pub fn merge(
        caller: Option<&CallContext>,
        session_id: Option<&str>,
        unique_id: impl FnOnce() -> String,
    ) -> CallContext {
        let mut context = caller.cloned().unwrap_or_default();

        if is_blank(context.session_id.as_deref()) {
            if let Some(session_id) = session_id {
                context.session_id = Some(session_id.to_string());
            }
        }
        if is_blank(context.source_platform.as_deref()) {
            context.source_platform = Some(DEFAULT_SOURCE_PLATFORM.to_string());
        }
        if is_blank(context.unique_id.as_deref()) {
            context.unique_id = Some(unique_id());
        }

        context
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}
