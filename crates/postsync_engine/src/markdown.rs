use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use url::Url;

/// Renders a post's HTML into markdown-flavoured text.
///
/// Headings become `#` lines, blocks are separated by blank lines, and
/// `<time>` elements are kept as HTML so the publish date stays extractable.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn render(&self, html: &str, base_url: Option<&str>) -> String {
        let fragment = Html::parse_fragment(html);
        let base_url = base_url.and_then(|b| Url::parse(b).ok());
        let mut ctx = RenderContext::new(base_url);
        self.visit_children(fragment.root_element(), &mut ctx);
        ctx.into_output()
    }

    fn visit_node(&self, node: NodeRef<'_, Node>, ctx: &mut RenderContext) {
        match node.value() {
            Node::Text(text) => ctx.append_text(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element, ctx);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit_node(child, ctx);
                }
            }
        }
    }

    fn visit_element(&self, element: ElementRef, ctx: &mut RenderContext) {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "a" => self.handle_anchor(element, ctx),
            "img" => self.handle_image(element, ctx),
            "time" => handle_time(element, ctx),
            "br" => ctx.ensure_newline(),
            "hr" => {
                ctx.ensure_blank_line();
                ctx.push_str("* * *");
                ctx.ensure_blank_line();
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(tag.as_bytes()[1] - b'0');
                ctx.ensure_blank_line();
                ctx.push_str(&"#".repeat(level));
                ctx.push_char(' ');
                self.visit_children(element, ctx);
                ctx.ensure_blank_line();
            }
            "li" => {
                ctx.ensure_newline();
                ctx.push_str("- ");
                self.visit_children(element, ctx);
                ctx.ensure_newline();
            }
            "p" | "div" | "section" | "header" | "footer" | "figure" | "figcaption" | "table"
            | "tr" | "address" | "ul" | "ol" => {
                ctx.ensure_blank_line();
                self.visit_children(element, ctx);
                ctx.ensure_blank_line();
            }
            "blockquote" => {
                let mut inner = RenderContext::new(ctx.base_url.clone());
                self.visit_children(element, &mut inner);
                let quoted = inner
                    .into_output()
                    .lines()
                    .map(|line| format!("> {line}").trim_end().to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                ctx.ensure_blank_line();
                ctx.push_str(&quoted);
                ctx.ensure_blank_line();
            }
            "pre" => {
                let code: String = element.text().collect();
                ctx.ensure_blank_line();
                ctx.push_str("```\n");
                ctx.push_str(code.trim_end_matches('\n'));
                ctx.push_str("\n```");
                ctx.ensure_blank_line();
            }
            "code" => {
                let code: String = element.text().collect();
                ctx.push_char('`');
                ctx.push_str(code.trim());
                ctx.push_char('`');
            }
            "strong" | "b" => self.wrap_inline(element, ctx, "**"),
            "em" | "i" => self.wrap_inline(element, ctx, "_"),
            // scripting, widgets and presentation-only sections
            "script" | "style" | "noscript" | "iframe" | "template" | "svg" | "button" => {}
            _ => self.visit_children(element, ctx),
        }
    }

    fn visit_children(&self, element: ElementRef, ctx: &mut RenderContext) {
        for child in element.children() {
            self.visit_node(child, ctx);
        }
    }

    fn wrap_inline(&self, element: ElementRef, ctx: &mut RenderContext, marker: &str) {
        ctx.push_str(marker);
        self.visit_children(element, ctx);
        ctx.push_str(marker);
    }

    fn handle_anchor(&self, element: ElementRef, ctx: &mut RenderContext) {
        let target = element
            .value()
            .attr("href")
            .and_then(|href| resolve_url(href, ctx.base_url.as_ref()));
        match target {
            Some(url) => {
                ctx.push_char('[');
                self.visit_children(element, ctx);
                ctx.push_str("](");
                ctx.push_str(url.as_str());
                ctx.push_char(')');
            }
            None => self.visit_children(element, ctx),
        }
    }

    fn handle_image(&self, element: ElementRef, ctx: &mut RenderContext) {
        let Some(url) = element
            .value()
            .attr("src")
            .and_then(|src| resolve_url(src, ctx.base_url.as_ref()))
        else {
            return;
        };
        let alt = element.value().attr("alt").unwrap_or("").trim();
        ctx.push_str(&format!("![{alt}]({url})"));
    }
}

fn handle_time(element: ElementRef, ctx: &mut RenderContext) {
    let text = element.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let rendered = match element.value().attr("datetime") {
        Some(datetime) => format!("<time datetime=\"{datetime}\">{text}</time>"),
        None => format!("<time>{text}</time>"),
    };
    ctx.push_str(&rendered);
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}

struct RenderContext {
    builder: String,
    base_url: Option<Url>,
    last_char: Option<char>,
}

impl RenderContext {
    fn new(base_url: Option<Url>) -> Self {
        Self {
            builder: String::new(),
            base_url,
            last_char: None,
        }
    }

    fn into_output(self) -> String {
        let trimmed = self.builder.trim();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}\n")
        }
    }

    fn append_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if matches!(self.last_char, None | Some(' ') | Some('\n')) {
                    continue;
                }
                self.push_char(' ');
            } else {
                self.push_char(ch);
            }
        }
    }

    fn ensure_newline(&mut self) {
        if self.last_char == Some('\n') || self.builder.is_empty() {
            return;
        }
        self.trim_trailing_spaces();
        self.push_char('\n');
    }

    fn ensure_blank_line(&mut self) {
        if self.builder.is_empty() || self.builder.ends_with("\n\n") {
            return;
        }
        self.ensure_newline();
        self.push_char('\n');
    }

    fn trim_trailing_spaces(&mut self) {
        let kept = self.builder.trim_end_matches(' ').len();
        self.builder.truncate(kept);
        self.last_char = self.builder.chars().last();
    }

    fn push_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.push_char(ch);
        }
    }

    fn push_char(&mut self, ch: char) {
        self.builder.push(ch);
        self.last_char = Some(ch);
    }
}
