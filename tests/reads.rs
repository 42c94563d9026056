//! Read endpoints against a mock API.

mod common;

use common::*;
use serde_json::json;
use songclip::{
    AssetType, CallContext, Clip, CollectionParams, ErrorKind, Paging, RelatedParams,
    SearchParams, SongclipError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn search_returns_clips_and_sends_defaults() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [clip(1), clip(2), clip(3)]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let clips = client.search(&SearchParams::new("hey")).await.unwrap();

    let expected: Vec<Clip> =
        serde_json::from_value(json!([clip(1), clip(2), clip(3)])).unwrap();
    assert_eq!(clips, expected);

    let sent = &requests(&server).await[0];
    let q = query(sent);
    assert_eq!(q["q"], "hey");
    assert_eq!(q["page"], "1");
    assert_eq!(q["limit"], "20");
    assert_eq!(q["shuffle"], "false");
    assert_eq!(q["minLength"], "0");
    assert_eq!(q["maxLength"], "10000");
    assert_eq!(q["allowDuplicates"], "true");

    let context = query_context(sent);
    assert_eq!(context["sourcePlatform"], "web");
    assert_eq!(context["uniqueId"], client.unique_id());
    assert!(context.get("sessionId").is_none());

    assert_eq!(header(sent, "apikey"), Some(API_KEY));
    assert_eq!(header(sent, "authorization"), Some(AUTHORIZATION));
}

#[tokio::test]
async fn search_threads_caller_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({"songclips": []}))))
        .mount(&server)
        .await;

    let params = SearchParams::default()
        .with_paging(
            Paging::default()
                .with_page(3)
                .with_limit(10)
                .with_shuffle(true)
                .with_length_range(5, 30),
        )
        .with_allow_duplicates(false)
        .with_context(CallContext::new().with_tags(["love", "flirt"]));
    client.search(&params).await.unwrap();

    let sent = &requests(&server).await[0];
    let q = query(sent);
    assert!(!q.contains_key("q"));
    assert_eq!(q["page"], "3");
    assert_eq!(q["limit"], "10");
    assert_eq!(q["shuffle"], "true");
    assert_eq!(q["minLength"], "5");
    assert_eq!(q["maxLength"], "30");
    assert_eq!(q["allowDuplicates"], "false");
    assert_eq!(query_context(sent)["tags"], json!(["love", "flirt"]));
}

#[tokio::test]
async fn missing_list_field_yields_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/songclips/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({}))))
        .mount(&server)
        .await;

    assert!(client.search(&SearchParams::new("x")).await.unwrap().is_empty());
    assert!(client.get_collections(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_status_is_an_application_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/collections/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "data": {"message": "invalid apikey", "songclips": [clip(1)]}
        })))
        .mount(&server)
        .await;

    let err = client
        .get_collection(&CollectionParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.operation(), Some("getCollection"));
    assert_eq!(err.payload().unwrap()["message"], "invalid apikey");
    assert!(err.to_string().starts_with("[Songclip][getCollection] {"));
}

#[tokio::test]
async fn failed_status_fails_every_read() {
    let (server, client) = setup().await;
    let failed = json!({
        "status": "failed",
        "data": {
            "songclips": [clip(1)],
            "gifnotes": [clip(2)],
            "collections": [{"term": "trending"}]
        }
    });

    for route in ["/songclips", "/songclips/collections", "/songclips/x/related"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(failed.clone()))
            .mount(&server)
            .await;
    }

    let err = client.search(&SearchParams::new("hey")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.operation(), Some("search"));

    let err = client.get_collections(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.operation(), Some("getCollections"));

    let err = client.get_related(&RelatedParams::new("x")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.operation(), Some("getRelated"));
    assert_eq!(err.payload(), Some(&failed["data"]));
}

#[tokio::test]
async fn off_type_payload_fields_pass_through() {
    let (server, client) = setup().await;
    let odd_clip = json!({"id": 1, "duration": "7.5", "artist": 42});
    let odd_collection = json!({"term": null, "color": 7});

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [odd_clip.clone()]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/songclips/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "collections": [odd_collection.clone()]
        }))))
        .mount(&server)
        .await;

    let clips = client.search(&SearchParams::new("hey")).await.unwrap();
    assert_eq!(clips.len(), 1);
    assert!(clips[0].duration.is_none());
    assert_eq!(serde_json::to_value(&clips[0]).unwrap(), odd_clip);

    let collections = client.get_collections(None).await.unwrap();
    assert_eq!(collections.len(), 1);
    assert!(collections[0].term.is_none());
    assert_eq!(serde_json::to_value(&collections[0]).unwrap(), odd_collection);
}

#[tokio::test]
async fn get_collections_returns_collections() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "collections": [
                {"term": "trending", "color": "#000000"},
                {"term": "hip hop", "color": "#ffffff", "backgroundGifUrl": "https://cdn.test/bg.gif"}
            ]
        }))))
        .mount(&server)
        .await;

    let collections = client.get_collections(None).await.unwrap();

    assert_eq!(collections.len(), 2);
    assert_eq!(collections[1].term.as_deref(), Some("hip hop"));
    assert_eq!(
        collections[1].background_gif_url.as_deref(),
        Some("https://cdn.test/bg.gif")
    );
    let q = query(&requests(&server).await[0]);
    assert!(q.contains_key("context"));
    assert!(!q.contains_key("page"));
}

#[tokio::test]
async fn get_collection_encodes_term() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/collections/hip%20hop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [clip(7)]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let params = CollectionParams::new("hip hop").with_paging(Paging::default().with_limit(5));
    let clips = client.get_collection(&params).await.unwrap();

    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].id_string().as_deref(), Some("7"));
    assert_eq!(query(&requests(&server).await[0])["limit"], "5");
}

#[tokio::test]
async fn get_collection_non_string_term_uses_trending() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/collections/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [clip(1)]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let params: CollectionParams = serde_json::from_value(json!({"term": 42})).unwrap();
    let clips = client.get_collection(&params).await.unwrap();

    assert_eq!(clips.len(), 1);
}

#[tokio::test]
async fn get_related_routes_by_asset_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/x/related"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [clip(1), clip(2)]
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/songclips/x/related/gifnotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "gifnotes": [{"id": "g1", "gifUrl": "https://cdn.test/g1.gif"}]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let songclips = client.get_related(&RelatedParams::new("x")).await.unwrap();
    assert_eq!(songclips.len(), 2);

    let gifnotes = client
        .get_related(&RelatedParams::new("x").with_asset_type(AssetType::Gifnote))
        .await
        .unwrap();
    assert_eq!(gifnotes.len(), 1);
    assert_eq!(gifnotes[0].id_string().as_deref(), Some("g1"));
    assert_eq!(gifnotes[0].extra["gifUrl"], "https://cdn.test/g1.gif");
}

#[tokio::test]
async fn get_related_prefers_songclips_then_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/a/related"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({
            "songclips": [],
            "gifnotes": [clip(9)]
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/songclips/b/related"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({}))))
        .mount(&server)
        .await;

    assert!(client.get_related(&RelatedParams::new("a")).await.unwrap().is_empty());
    assert!(client.get_related(&RelatedParams::new("b")).await.unwrap().is_empty());
}

#[tokio::test]
async fn http_error_status_is_a_transport_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "failed",
            "data": {"context": {"sessionId": "never-learned"}}
        })))
        .mount(&server)
        .await;

    let err = client.search(&SearchParams::new("hey")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, SongclipError::HttpStatus { status: 401, .. }));
    assert!(client.session_id().is_none());
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_collections(None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, SongclipError::Decode { operation: "getCollections", .. }));
}

#[tokio::test]
async fn empty_read_body_is_an_application_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/songclips"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.search(&SearchParams::new("hey")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.payload(), Some(&json!({})));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = wiremock::MockServer::start().await;
    let client = client_for(&server, songclip::ClientConfig::default());
    drop(server);

    let err = client.get_collections(None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, SongclipError::Transport { .. }));
}
