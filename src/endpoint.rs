//! Songclip API endpoints.
//!
//! Reads return the list they ask for, or an empty list when a successful
//! response lacks it. Events return the whole response body, or `None` when
//! the API answered with an empty or falsy body.

use crate::client::{ApiCall, SongclipClient, project};
use crate::context::CallContext;
use crate::error::Result;
use crate::request::{AssetType, CollectionParams, EventParams, Query, RelatedParams, SearchParams};
use crate::types::{Clip, Collection};
use serde_json::Value;

impl SongclipClient {
    /// Search clips by query string and/or `context.tags`.
    ///
    /// `GET /songclips`
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Clip>> {
        const OP: &str = "search";
        let context = self.populate_context(params.context.as_ref());
        let query = params.query(self.default_limit());

        let data = self
            .fetch(ApiCall::get(OP, "/songclips".to_string(), query, context))
            .await?;
        Ok(project(OP, &data, "songclips")?.unwrap_or_default())
    }

    /// Collections curated for the partner.
    ///
    /// `GET /songclips/collections`
    pub async fn get_collections(&self, context: Option<&CallContext>) -> Result<Vec<Collection>> {
        const OP: &str = "getCollections";
        let context = self.populate_context(context);

        let data = self
            .fetch(ApiCall::get(
                OP,
                "/songclips/collections".to_string(),
                Query::new(),
                context,
            ))
            .await?;
        Ok(project(OP, &data, "collections")?.unwrap_or_default())
    }

    /// Clips of the collection named by `params.term` (default `trending`).
    ///
    /// `GET /songclips/collections/{term}`
    pub async fn get_collection(&self, params: &CollectionParams) -> Result<Vec<Clip>> {
        const OP: &str = "getCollection";
        let context = self.populate_context(params.context.as_ref());
        let mut query = Query::new();
        params.paging.append_to(&mut query, self.default_limit());

        let path = format!("/songclips/collections/{}", params.encoded_term());
        let data = self.fetch(ApiCall::get(OP, path, query, context)).await?;
        Ok(project(OP, &data, "songclips")?.unwrap_or_default())
    }

    /// Songclips or gifnotes related to clip `params.id`.
    ///
    /// `GET /songclips/{id}/related` or `GET /songclips/{id}/related/gifnotes`
    pub async fn get_related(&self, params: &RelatedParams) -> Result<Vec<Clip>> {
        const OP: &str = "getRelated";
        let context = self.populate_context(params.context.as_ref());
        let mut query = Query::new();
        params.paging.append_to(&mut query, self.default_limit());

        let path = match params.asset_type {
            AssetType::Songclip => format!("/songclips/{}/related", params.id),
            AssetType::Gifnote => format!("/songclips/{}/related/gifnotes", params.id),
        };
        let data = self.fetch(ApiCall::get(OP, path, query, context)).await?;

        if let Some(songclips) = project(OP, &data, "songclips")? {
            return Ok(songclips);
        }
        Ok(project(OP, &data, "gifnotes")?.unwrap_or_default())
    }

    /// Report that Songclip content was surfaced in the user's session.
    ///
    /// `POST /events/open`
    pub async fn post_app_open(&self, context: Option<&CallContext>) -> Result<Option<Value>> {
        const OP: &str = "postAppOpen";
        let context = self.populate_context(context);

        self.post_event(ApiCall::post(OP, "/events/open".to_string(), context))
            .await
    }

    /// Report a play, used for royalty reporting.
    ///
    /// `POST /{songclips|gifnotes}/{id}/events/play`
    pub async fn post_play_event(&self, params: &EventParams) -> Result<Option<Value>> {
        const OP: &str = "postPlayEvent";
        let context = self.populate_context(params.context.as_ref());

        let call = ApiCall::post(OP, event_path(params, "play"), context).with_explicit_json();
        self.post_event(call).await
    }

    /// Report a share.
    ///
    /// `POST /{songclips|gifnotes}/{id}/events/share`
    pub async fn post_share_event(&self, params: &EventParams) -> Result<Option<Value>> {
        const OP: &str = "postShareEvent";
        let context = self.populate_context(params.context.as_ref());

        self.post_event(ApiCall::post(OP, event_path(params, "share"), context))
            .await
    }

    /// Report that the user merged the clip into another asset.
    ///
    /// `POST /{songclips|gifnotes}/{id}/events/add`
    pub async fn post_add_event(&self, params: &EventParams) -> Result<Option<Value>> {
        const OP: &str = "postAddEvent";
        let context = self.populate_context(params.context.as_ref());

        self.post_event(ApiCall::post(OP, event_path(params, "add"), context))
            .await
    }
}

fn event_path(params: &EventParams, event: &str) -> String {
    format!(
        "/{}/{}/events/{event}",
        params.asset_type.resource(),
        params.id
    )
}
