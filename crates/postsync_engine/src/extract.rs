use scraper::{Html, Selector};

pub trait Extractor: Send + Sync {
    /// Inner HTML of the part of the page that holds the post.
    fn extract(&self, html: &str) -> String;
}

/// Narrows a post page to its content:
/// - `<article>` inner html if present
/// - otherwise `<body>` inner html
/// - fallback to the full document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleExtractor;

impl Extractor for ArticleExtractor {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        ["article", "body"]
            .iter()
            .filter_map(|tag| Selector::parse(tag).ok())
            .find_map(|sel| doc.select(&sel).next().map(|node| node.inner_html()))
            .unwrap_or_else(|| doc.root_element().html())
    }
}

#[cfg(test)]
mod tests {
    use super::{ArticleExtractor, Extractor};

    #[test]
    fn prefers_article_over_body() {
        let html = "<html><body><nav>menu</nav><article><h1>T</h1></article></body></html>";
        let inner = ArticleExtractor.extract(html);
        assert!(inner.contains("<h1>T</h1>"));
        assert!(!inner.contains("menu"));
    }

    #[test]
    fn falls_back_to_body() {
        let html = "<html><body><p>only body</p></body></html>";
        assert_eq!(ArticleExtractor.extract(html), "<p>only body</p>");
    }
}
