mod common;

use std::time::Duration;

use postsync_core::PostSummary;
use postsync_engine::{
    ContentSource, ConvertError, DocumentConverter, FailureKind, FetchSettings, Fetcher,
    HttpDocumentConverter, MediumContentSource, ReqwestFetcher, SourceError, SourceSettings,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{index_body, init_logging, post_page, profile_url, AUTHOR_PATH};

fn post_at(server: &MockServer, unique_slug: &str) -> PostSummary {
    PostSummary {
        id: unique_slug.to_string(),
        title: unique_slug.to_string(),
        canonical_slug: unique_slug.to_string(),
        resolved_url: format!("{}/{unique_slug}", profile_url(server)),
    }
}

async fn mount_json(server: &MockServer, route: String, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

/// `/hop/0` redirects to `/hop/1` and so on; `/hop/{hops}` serves a page.
async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{hop}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/hop/{}", hop + 1)),
            )
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/hop/{hops}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(post_page("Landed", "May 1, 2019"), "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn index_accepts_json_that_a_post_fetch_rejects() {
    init_logging();
    let server = MockServer::start().await;
    let body = index_body(&[("p1", "One", "one-p1")]);
    mount_json(&server, format!("{AUTHOR_PATH}/latest"), body.clone()).await;
    mount_json(&server, format!("{AUTHOR_PATH}/one-p1"), body).await;

    let source = MediumContentSource::new(
        SourceSettings {
            profile_url: profile_url(&server),
            index_limit: 200,
        },
        FetchSettings::default(),
    );
    let posts = source.fetch_all_posts().await.unwrap();
    assert_eq!(posts.len(), 1);

    let converter = HttpDocumentConverter::new(FetchSettings::default());
    match converter.convert(&posts[0]).await.unwrap_err() {
        ConvertError::Fetch(err) => assert_eq!(
            err.kind,
            FailureKind::UnsupportedContentType {
                content_type: "application/json".to_string()
            }
        ),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn redirects_within_limit_report_final_url() {
    init_logging();
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 2).await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    });
    let output = fetcher
        .fetch(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap();

    assert_eq!(output.metadata.final_url, format!("{}/hop/2", server.uri()));
    assert_eq!(output.metadata.byte_len, output.bytes.len() as u64);
}

#[tokio::test]
async fn redirect_chain_past_limit_fails() {
    init_logging();
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 3).await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    });
    let err = fetcher
        .fetch(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn oversized_index_is_a_network_error() {
    init_logging();
    let server = MockServer::start().await;
    let body = index_body(&[
        ("p1", "A reasonably long post title", "a-reasonably-long-post-title-p1"),
        ("p2", "Another reasonably long title", "another-reasonably-long-title-p2"),
    ]);
    let body_len = body.len() as u64;
    mount_json(&server, format!("{AUTHOR_PATH}/latest"), body).await;

    let source = MediumContentSource::new(
        SourceSettings {
            profile_url: profile_url(&server),
            index_limit: 200,
        },
        FetchSettings {
            max_bytes: 64,
            ..FetchSettings::default()
        },
    );

    match source.fetch_all_posts().await.unwrap_err() {
        SourceError::Network(err) => assert_eq!(
            err.kind,
            FailureKind::TooLarge {
                max_bytes: 64,
                actual: Some(body_len)
            }
        ),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn slow_post_page_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{AUTHOR_PATH}/slow-p1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(post_page("Slow", "May 1, 2019"), "text/html"),
        )
        .mount(&server)
        .await;

    let converter = HttpDocumentConverter::new(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    });

    match converter.convert(&post_at(&server, "slow-p1")).await.unwrap_err() {
        ConvertError::Fetch(err) => assert_eq!(err.kind, FailureKind::Timeout),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn malformed_post_url_is_reported() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = fetcher.fetch("medium.com/@author/no-scheme").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
