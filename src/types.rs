//! Assets returned by the API.
//!
//! Typed fields are filled only when the payload carries the expected JSON
//! type. Everything else, off-type values included, stays in `extra`, so a
//! payload serializes back to exactly what the API sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A songclip or gifnote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Clip {
    /// Asset id; numeric or string depending on the asset family.
    pub id: Value,
    /// Performing artist.
    pub artist: Option<String>,
    /// Song title.
    pub title: Option<String>,
    /// Only present when the API has lyrics for the clip.
    pub lyrics: Option<Value>,
    /// Cover art URL.
    pub cover_url: Option<String>,
    /// Audio file URL.
    pub audio_url: Option<String>,
    /// Length in seconds.
    pub duration: Option<Number>,
    /// Fields not listed above.
    pub extra: Map<String, Value>,
}

impl Clip {
    /// The id as used in URL paths.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Length in seconds as a float.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.as_ref().and_then(Number::as_f64)
    }
}

impl From<Map<String, Value>> for Clip {
    fn from(mut raw: Map<String, Value>) -> Self {
        Self {
            id: raw.remove("id").unwrap_or_default(),
            artist: take_string(&mut raw, "artist"),
            title: take_string(&mut raw, "title"),
            lyrics: raw.remove("lyrics"),
            cover_url: take_string(&mut raw, "coverUrl"),
            audio_url: take_string(&mut raw, "audioUrl"),
            duration: take_number(&mut raw, "duration"),
            extra: raw,
        }
    }
}

impl From<Clip> for Map<String, Value> {
    fn from(clip: Clip) -> Self {
        let mut raw = clip.extra;
        if !clip.id.is_null() {
            raw.insert("id".to_string(), clip.id);
        }
        put(&mut raw, "artist", clip.artist.map(Value::String));
        put(&mut raw, "title", clip.title.map(Value::String));
        put(&mut raw, "lyrics", clip.lyrics);
        put(&mut raw, "coverUrl", clip.cover_url.map(Value::String));
        put(&mut raw, "audioUrl", clip.audio_url.map(Value::String));
        put(&mut raw, "duration", clip.duration.map(Value::Number));
        raw
    }
}

/// A curated collection of clips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Collection {
    /// Term identifying the collection in `get_collection`.
    pub term: Option<String>,
    /// Display color.
    pub color: Option<String>,
    /// Animated background URL.
    pub background_gif_url: Option<String>,
    /// Animated background URL, WebP variant.
    pub background_webp_url: Option<String>,
    /// Fields not listed above.
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Collection {
    fn from(mut raw: Map<String, Value>) -> Self {
        Self {
            term: take_string(&mut raw, "term"),
            color: take_string(&mut raw, "color"),
            background_gif_url: take_string(&mut raw, "backgroundGifUrl"),
            background_webp_url: take_string(&mut raw, "backgroundWebpUrl"),
            extra: raw,
        }
    }
}

impl From<Collection> for Map<String, Value> {
    fn from(collection: Collection) -> Self {
        let mut raw = collection.extra;
        put(&mut raw, "term", collection.term.map(Value::String));
        put(&mut raw, "color", collection.color.map(Value::String));
        put(
            &mut raw,
            "backgroundGifUrl",
            collection.background_gif_url.map(Value::String),
        );
        put(
            &mut raw,
            "backgroundWebpUrl",
            collection.background_webp_url.map(Value::String),
        );
        raw
    }
}

/// Remove `key` if it holds a string; leave any other value in place.
fn take_string(raw: &mut Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(_)) => match raw.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

fn take_number(raw: &mut Map<String, Value>, key: &str) -> Option<Number> {
    match raw.get(key) {
        Some(Value::Number(_)) => match raw.remove(key) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        },
        _ => None,
    }
}

fn put(raw: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        raw.insert(key.to_string(), value);
    }
}
