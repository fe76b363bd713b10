//! Bookmark file writer.
//!
//! Mirrors each post as a `.webloc` file: an XML property list wrapping
//! the bookmarked URL, the format macOS uses for dragged-out browser
//! bookmarks.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::debug;

/// Writes a bookmark file for `url` at `path`.
///
/// Returns `Ok(true)` when a new file was written and `Ok(false)` when a
/// file already exists at `path` (idempotent by design; the existing file
/// is left untouched).
///
/// # Errors
///
/// Returns any I/O error other than the file already existing.
pub fn write_bookmark(path: &Path, url: &str) -> io::Result<bool> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Bookmark already exists, skipping");
            return Ok(false);
        }
        Err(err) => return Err(err),
    };

    let mut writer = BufWriter::new(file);
    writer.write_all(webloc_xml(url).as_bytes())?;
    writer.flush()?;

    debug!(path = %path.display(), "Bookmark written");
    Ok(true)
}

fn webloc_xml(url: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
         \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\">\n\
         <dict>\n\
         \t<key>URL</key>\n\
         \t<string>{}</string>\n\
         </dict>\n\
         </plist>\n",
        escape_xml(url)
    )
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_webloc_xml_wraps_url_in_plist() {
        let xml = webloc_xml("https://example.com/article");
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<key>URL</key>"));
        assert!(xml.contains("<string>https://example.com/article</string>"));
    }

    #[test]
    fn test_webloc_xml_escapes_query_separators() {
        let xml = webloc_xml("https://example.com/?a=1&b=<2>");
        assert!(xml.contains("<string>https://example.com/?a=1&amp;b=&lt;2&gt;</string>"));
    }

    #[test]
    fn test_write_bookmark_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("article.webloc");

        let written = write_bookmark(&path, "https://example.com").unwrap();
        assert!(written);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<string>https://example.com</string>"));
    }

    #[test]
    fn test_write_bookmark_existing_file_skipped_and_preserved() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("article.webloc");
        std::fs::write(&path, "sentinel").unwrap();

        let written = write_bookmark(&path, "https://example.com").unwrap();
        assert!(!written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sentinel");
    }

    #[test]
    fn test_write_bookmark_missing_directory_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("article.webloc");

        let result = write_bookmark(&path, "https://example.com");
        assert!(result.is_err());
    }
}
