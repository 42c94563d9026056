//! # Songclip
//!
//! Async client for the Songclip REST API.
//!
//! The client searches and retrieves short audio clips ("songclips") and
//! animated clips ("gifnotes"), reports usage events for royalty reporting,
//! and keeps a pseudo-session across calls.
//!
//! ## Sessions
//!
//! Every request carries a `context` object. A [`SongclipClient`] fills in
//! whatever the caller leaves out:
//!
//! - `uniqueId`: an anonymous id generated on first use and kept for the
//!   life of the client
//! - `sessionId`: the first session id the API returns, kept from then on
//! - `sourcePlatform`: `"web"`
//!
//! Use one client per end user.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use songclip::{ClientConfig, EventParams, Paging, SearchParams, SongclipClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SongclipClient::new(ClientConfig::new("your-api-key", "bearer your-token"))?;
//!
//!     let clips = client
//!         .search(&SearchParams::new("hey").with_paging(Paging::default().with_limit(10)))
//!         .await?;
//!
//!     if let Some(id) = clips.first().and_then(|clip| clip.id_string()) {
//!         client.post_play_event(&EventParams::new(id)).await?;
//!     }
//!
//!     println!("session: {:?}", client.session_id());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! - `SNGCLP_MODE=production` selects the production API; anything else the
//!   sandbox
//! - `SNGCLP_DEFAULT_LIMIT` sets the default page size (20)
//!
//! Both are read once per process. See [`ClientConfig`] for per-client options.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use client::{AuthHeaders, SongclipClient};
pub use config::{Args, ClientConfig, Command, Environment, Mode, ProxyAuth, ProxyConfig};
pub use context::CallContext;
pub use error::{ErrorKind, Result, SongclipError};
pub use request::{AssetType, CollectionParams, EventParams, Paging, RelatedParams, SearchParams};
pub use types::{Clip, Collection};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
