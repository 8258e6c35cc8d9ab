#![allow(dead_code)]

use postsync_engine::SECURITY_PREFIX;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AUTHOR_PATH: &str = "/@author";

pub fn init_logging() {
    sync_logging::initialize_for_tests();
}

/// `(id, title, uniqueSlug)` triples rendered as a prefixed index body.
pub fn index_body(posts: &[(&str, &str, &str)]) -> String {
    let mut map = serde_json::Map::new();
    for (id, title, unique_slug) in posts {
        map.insert(
            id.to_string(),
            json!({ "id": id, "title": title, "uniqueSlug": unique_slug, "virtuals": {} }),
        );
    }
    let body = json!({ "success": true, "payload": { "references": { "Post": map } } });
    format!("{SECURITY_PREFIX}{body}")
}

pub fn post_page(title: &str, date: &str) -> String {
    format!(
        r#"<!doctype html><html><head><title>{title}</title><script>track()</script></head>
        <body><nav>Sign in</nav><article>
        <h1>{title}</h1>
        <p><a href="/@author">The Author</a> <time datetime="2018-05-16T16:41:19.329Z">{date}</time></p>
        <p>Body of {title}.</p>
        </article></body></html>"#
    )
}

pub async fn mount_index(server: &MockServer, posts: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path(format!("{AUTHOR_PATH}/latest")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(index_body(posts), "application/json; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub async fn mount_post(server: &MockServer, unique_slug: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(format!("{AUTHOR_PATH}/{unique_slug}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

pub fn profile_url(server: &MockServer) -> String {
    format!("{}{AUTHOR_PATH}", server.uri())
}
