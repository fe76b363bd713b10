//! Safe bookmark filenames derived from post titles.

use url::Url;

/// Longest allowed filename stem, in characters.
const MAX_STEM_CHARS: usize = 80;

/// Builds the `.webloc` filename for a post from its title, falling back
/// to the bookmarked URL's host when the title sanitizes to nothing.
#[must_use]
pub fn bookmark_filename(description: &str, href: &str) -> String {
    let stem = sanitize_title(description);
    let stem = if stem.is_empty() {
        host_fallback(href)
    } else {
        stem
    };
    format!("{stem}.webloc")
}

/// Maps filesystem-hostile characters to `-`, collapses whitespace runs,
/// and truncates to [`MAX_STEM_CHARS`]. Titles keep their spaces so the
/// resulting files read like ordinary bookmark exports.
fn sanitize_title(value: &str) -> String {
    let mapped: String = value
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let collapsed = mapped.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_STEM_CHARS).collect();
    truncated.trim_matches(|c: char| c.is_whitespace() || c == '.').to_string()
}

fn host_fallback(href: &str) -> String {
    Url::parse(href)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.replace('.', "-")))
        .unwrap_or_else(|| "bookmark".to_string())
}
