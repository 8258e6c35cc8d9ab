use postsync_engine::MarkdownRenderer;
use pretty_assertions::assert_eq;

fn render(html: &str) -> String {
    MarkdownRenderer.render(html, Some("https://medium.com/@author/some-post-123"))
}

#[test]
fn headings_and_paragraphs_become_markdown_blocks() {
    let html = "<h1>Main title</h1><h2>A subtitle</h2><p>First   paragraph.</p><p>Second.</p>";
    assert_eq!(
        render(html),
        "# Main title\n\n## A subtitle\n\nFirst paragraph.\n\nSecond.\n"
    );
}

#[test]
fn time_element_is_kept_verbatim() {
    let html = r#"<p>By me <time datetime="2018-05-16T16:41:19.329Z">May
        16, 2018</time></p>"#;
    let md = render(html);
    assert!(
        md.contains(r#"<time datetime="2018-05-16T16:41:19.329Z">May 16, 2018</time>"#),
        "unexpected markdown: {md:?}"
    );
}

#[test]
fn links_and_images_resolve_against_page_url() {
    let html = r#"<p>See <a href="/tag/js">tag</a> and <img src="https://cdn.example/i.png" alt="pic"></p>"#;
    assert_eq!(
        render(html),
        "See [tag](https://medium.com/tag/js) and ![pic](https://cdn.example/i.png)\n"
    );
}

#[test]
fn pre_blocks_keep_whitespace() {
    let html = "<p>Code:</p><pre>double = (x) =&gt; x * 2\nadd1 = (x) =&gt; x + 1</pre>";
    assert_eq!(
        render(html),
        "Code:\n\n```\ndouble = (x) => x * 2\nadd1 = (x) => x + 1\n```\n"
    );
}

#[test]
fn inline_formatting_lists_and_quotes() {
    let html = "<p>A <strong>bold</strong>, <em>soft</em> and <code>pipe()</code> line.</p>\
        <ul><li>one</li><li>two</li></ul>\
        <blockquote>Go left-to-right.</blockquote><hr>";
    assert_eq!(
        render(html),
        "A **bold**, _soft_ and `pipe()` line.\n\n- one\n- two\n\n> Go left-to-right.\n\n* * *\n"
    );
}

#[test]
fn scripts_and_buttons_are_dropped() {
    let html = "<script>var x = 1;</script><p>Body</p><button>Follow</button><style>p{}</style>";
    assert_eq!(render(html), "Body\n");
}

#[test]
fn rendering_is_deterministic() {
    let html = "<h1>T</h1><p><a href=\"https://det.example/page\">Det</a></p>";
    assert_eq!(render(html), render(html));
}
