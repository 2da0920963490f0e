use crate::support::*;
use songbridge::{
    ClassifyError, EntityType, ExtractError, MemberOutcome, ResolveError, Resolution, Resolver,
    SearchError, SongbridgeError, Track,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_single_track_end_to_end() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_SINGLE_TRACK";
    set_api_key(key_env);

    mount_track_page(&mock_server, "/us/song/song-a/1", "Song A", "Artist B").await;
    mount_search(&mock_server, "\"Song A\" by \"Artist B\"", "vidA").await;

    let resolver = Resolver::new(mock_config(&mock_server, key_env)).expect("Failed to build resolver");
    let resolution = resolver
        .run(&format!("{}/us/song/song-a/1", mock_server.uri()))
        .await
        .expect("Resolution failed");

    match resolution {
        Resolution::Track { track, video } => {
            assert_eq!(track, Track::new("Song A", "Artist B"));
            assert_eq!(video.url, "https://youtube.com/watch?v=vidA");
            assert!(!video.cached);
        }
        other => panic!("Expected a track, got {:?}", other),
    }
}

#[tokio::test]
async fn test_item_in_collection_resolves_as_track() {
    let mock_server = MockServer::start().await;
    let resolver = Resolver::new(mock_config(&mock_server, "SONGBRIDGE_IT_ITEM")).unwrap();

    mount_track_page(&mock_server, "/us/album/vaporize/35", "Vaporize", "Broken Bells").await;

    let url = format!("{}/us/album/vaporize/35?i=36", mock_server.uri());
    assert_eq!(resolver.classify(&url).unwrap().entity_type, EntityType::Track);

    let track = resolver.resolve(&url).await.expect("Resolution failed");
    assert_eq!(track, Track::new("Vaporize", "Broken Bells"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("i=36&l=en-GB"));
}

#[tokio::test]
async fn test_collection_fan_out_is_capped() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_FAN_OUT_CAP";
    set_api_key(key_env);

    let members: Vec<String> = (1..=4).map(|n| member_url(&mock_server, n)).collect();
    mount_collection_page(&mock_server, "/us/album/four/100", &members).await;

    mount_track_page(&mock_server, &member_path(1), "One", "Band").await;
    mount_track_page(&mock_server, &member_path(2), "Two", "Band").await;
    // Markup changed on this page; extraction must fail without a crash
    Mock::given(method("GET"))
        .and(path(member_path(3)))
        .respond_with(html_response(html_page("Apple Music - Web Player", "")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(member_path(4)))
        .respond_with(html_response(html_page(&apple_title("Four", "Band"), "")))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_search(&mock_server, "\"One\" by \"Band\"", "vid1").await;
    mount_search(&mock_server, "\"Two\" by \"Band\"", "vid2").await;

    let resolver = Resolver::new(mock_config(&mock_server, key_env)).unwrap();
    let report = resolver
        .resolve_collection(&format!("{}/us/album/four/100", mock_server.uri()), 3)
        .await
        .expect("Collection resolution failed");

    assert_eq!(report.len(), 3);
    assert_eq!(report.found(), 2);
    assert_eq!(
        report.outcomes[0].video().map(|v| v.url.as_str()),
        Some("https://youtube.com/watch?v=vid1")
    );
    assert_eq!(
        report.outcomes[1].video().map(|v| v.url.as_str()),
        Some("https://youtube.com/watch?v=vid2")
    );
    match &report.outcomes[2] {
        MemberOutcome::Unresolved { url, error } => {
            assert_eq!(url, &members[2]);
            assert!(matches!(
                error,
                ResolveError::Extract {
                    source: ExtractError::TitlePatternMismatch(_),
                    ..
                }
            ));
        }
        other => panic!("Expected an unresolved member, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_members_with_slow_search() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_SLOW_SEARCH";
    set_api_key(key_env);

    let members: Vec<String> = (1..=3).map(|n| member_url(&mock_server, n)).collect();
    mount_collection_page(&mock_server, "/us/playlist/slow/200", &members).await;
    for (n, name) in [(1, "Alpha"), (2, "Beta"), (3, "Gamma")] {
        mount_track_page(&mock_server, &member_path(n), name, "Band").await;
    }

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(search_hit("slow").set_delay(Duration::from_millis(300)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(mock_config(&mock_server, key_env)).unwrap();
    let resolution = resolver
        .run(&format!("{}/us/playlist/slow/200", mock_server.uri()))
        .await
        .expect("Resolution failed");

    let report = match resolution {
        Resolution::Collection(report) => report,
        other => panic!("Expected a collection, got {:?}", other),
    };

    let by_label = report.by_label();
    assert_eq!(by_label.len(), 3);
    for label in [
        "\"Alpha\" by \"Band\"",
        "\"Beta\" by \"Band\"",
        "\"Gamma\" by \"Band\"",
    ] {
        assert!(by_label[label].is_found(), "{} was not found", label);
    }
}

#[tokio::test]
async fn test_sequential_mode_serializes_members() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_SEQUENTIAL";
    set_api_key(key_env);

    let members: Vec<String> = (1..=3).map(|n| member_url(&mock_server, n)).collect();
    mount_collection_page(&mock_server, "/us/album/ordered/300", &members).await;
    for (n, name) in [(1, "First"), (2, "Second"), (3, "Third")] {
        mount_track_page(&mock_server, &member_path(n), name, "Band").await;
    }
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(search_hit("seq").set_delay(Duration::from_millis(50)))
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server, key_env);
    config.resolver.sequential = true;
    let resolver = Resolver::new(config).unwrap();

    let report = resolver
        .resolve_collection(&format!("{}/us/album/ordered/300", mock_server.uri()), 3)
        .await
        .expect("Collection resolution failed");
    assert_eq!(report.found(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/us/album/ordered/300".to_string(),
            member_path(1),
            SEARCH_PATH.to_string(),
            member_path(2),
            SEARCH_PATH.to_string(),
            member_path(3),
            SEARCH_PATH.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_same_track_on_two_urls_searched_once() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_SHARED_CACHE";
    set_api_key(key_env);

    let members: Vec<String> = (1..=2).map(|n| member_url(&mock_server, n)).collect();
    mount_collection_page(&mock_server, "/us/playlist/dupes/400", &members).await;
    mount_track_page(&mock_server, &member_path(1), "Same", "Band").await;
    mount_track_page(&mock_server, &member_path(2), "Same", "Band").await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(search_hit("same"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server, key_env);
    config.resolver.sequential = true;
    let resolver = Resolver::new(config).unwrap();

    let report = resolver
        .resolve_collection(&format!("{}/us/playlist/dupes/400", mock_server.uri()), 3)
        .await
        .unwrap();

    let cached: Vec<bool> = report
        .outcomes
        .iter()
        .map(|o| o.video().map(|v| v.cached).unwrap_or_default())
        .collect();
    assert_eq!(cached, vec![false, true]);
    assert_eq!(resolver.cache().len(), 1);
}

#[tokio::test]
async fn test_search_miss_keeps_track_identity() {
    let mock_server = MockServer::start().await;
    let key_env = "SONGBRIDGE_IT_SEARCH_MISS";
    set_api_key(key_env);

    let members = vec![member_url(&mock_server, 1)];
    mount_collection_page(&mock_server, "/us/album/obscure/500", &members).await;
    mount_track_page(&mock_server, &member_path(1), "Obscure", "Nobody").await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(mock_config(&mock_server, key_env)).unwrap();
    let report = resolver
        .resolve_collection(&format!("{}/us/album/obscure/500", mock_server.uri()), 3)
        .await
        .unwrap();

    match &report.outcomes[0] {
        MemberOutcome::NotFound { track, error } => {
            assert_eq!(track, &Track::new("Obscure", "Nobody"));
            assert!(matches!(error, SearchError::NoMatch(_)));
        }
        other => panic!("Expected a search miss, got {:?}", other),
    }
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn test_single_track_search_failure_is_terminal() {
    let mock_server = MockServer::start().await;
    // Credential variable deliberately left unset
    let resolver = Resolver::new(mock_config(&mock_server, "SONGBRIDGE_IT_NO_KEY")).unwrap();
    mount_track_page(&mock_server, "/us/song/song-a/1", "Song A", "Artist B").await;

    let result = resolver
        .run(&format!("{}/us/song/song-a/1", mock_server.uri()))
        .await;

    assert!(matches!(
        result.unwrap_err(),
        SongbridgeError::Search(SearchError::MissingCredential(name)) if name == "SONGBRIDGE_IT_NO_KEY"
    ));
}

#[tokio::test]
async fn test_missing_page_is_fetch_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(mock_config(&mock_server, "SONGBRIDGE_IT_404")).unwrap();
    let result = resolver
        .resolve(&format!("{}/us/song/gone/1", mock_server.uri()))
        .await;

    match result.unwrap_err() {
        ResolveError::Fetch { message, .. } => assert_eq!(message, "HTTP 404"),
        other => panic!("Expected a fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_html_page_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "not": "html" })),
        )
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(mock_config(&mock_server, "SONGBRIDGE_IT_JSON")).unwrap();
    let result = resolver
        .resolve(&format!("{}/us/song/json/1", mock_server.uri()))
        .await;

    assert!(matches!(result.unwrap_err(), ResolveError::Parse { .. }));
}

#[tokio::test]
async fn test_slow_page_times_out_as_fetch_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            html_response(html_page(&apple_title("Late", "Band"), ""))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server, "SONGBRIDGE_IT_TIMEOUT");
    config.http.timeout_secs = 1;
    let resolver = Resolver::new(config).unwrap();

    let result = resolver
        .resolve(&format!("{}/us/song/late/1", mock_server.uri()))
        .await;

    match result.unwrap_err() {
        ResolveError::Fetch { message, .. } => assert_eq!(message, "Request timeout"),
        other => panic!("Expected a fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unsupported_urls_never_hit_the_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resolver = Resolver::new(mock_config(&mock_server, "SONGBRIDGE_IT_UNSUPPORTED")).unwrap();

    let result = resolver
        .run(&format!("{}/us/artist/someone/1", mock_server.uri()))
        .await;
    assert!(matches!(
        result.unwrap_err(),
        SongbridgeError::Resolve(ResolveError::Classify(
            ClassifyError::UnsupportedEntityType { .. }
        ))
    ));

    let result = resolver.run("https://tidal.com/browse/track/1").await;
    assert!(matches!(
        result.unwrap_err(),
        SongbridgeError::Resolve(ResolveError::Classify(ClassifyError::UnsupportedService(_)))
    ));
}
