use std::fmt;

/// Extension of every file the sync manages in the output directory.
pub const MARKDOWN_EXTENSION: &str = "md";

const MAX_SLUG_CHARS: usize = 80;
const FALLBACK_SLUG: &str = "untitled";

/// Filesystem- and URL-safe identifier derived from a post title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{slug}.md`
    pub fn file_name(&self) -> String {
        format!("{}.{MARKDOWN_EXTENSION}", self.0)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deterministic, idempotent slug for a title.
///
/// A title with exactly one `/` ("Before/After") reads as "before-and-after".
/// Any other slash, whitespace or punctuation becomes a single hyphen;
/// apostrophes and combining diacritics are dropped; letters and digits of
/// any script are kept.
pub fn slugify(title: &str) -> Slug {
    let lowered = title.to_lowercase();
    let expanded = if lowered.matches('/').count() == 1 {
        lowered.replacen('/', " and ", 1)
    } else {
        lowered
    };

    let mut slug = String::with_capacity(expanded.len());
    let mut pending_separator = false;
    for c in expanded.chars() {
        if is_apostrophe(c) || is_combining_mark(c) {
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    let mut slug = truncate_chars(&slug, MAX_SLUG_CHARS);
    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }
    if is_reserved_windows_name(&slug) {
        slug.push('_');
    }
    Slug(slug)
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// Generic combining blocks. Lowercasing `İ` yields `i` plus U+0307.
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].trim_end_matches('-').to_string(),
        None => input.to_string(),
    }
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
        "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
    ];
    RESERVED.contains(&name)
}
