/// A CommonMark-compliant Markdown parser and renderer
pub mod blocks;
pub mod entities;
pub mod houdini;
pub mod inlines;
pub mod references;
pub mod renderer;
pub mod scanners;
pub mod tree;
pub mod utf8;

use renderer::HtmlRenderer;
use tree::Tree;

/// Pipeline configuration; everything defaults to off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Rewrite straight quotes, hyphen runs, and `...` to their
    /// typographic equivalents
    pub smart: bool,
    /// Omit raw HTML and empty out unsafe link destinations
    pub safe: bool,
    /// Attach `data-sourcepos` attributes to block elements
    pub sourcepos: bool,
    /// Render soft breaks as `<br />`
    pub hardbreaks: bool,
}

/// Parse markdown text into a document tree
pub fn parse_document(input: &str, options: Options) -> Tree {
    if input.contains(['\r', '\0']) {
        let cleaned = utf8::clean(input.as_bytes());
        blocks::parse_document(&cleaned, options)
    } else {
        blocks::parse_document(input, options)
    }
}

/// Parse a byte buffer that may contain invalid UTF-8; bad sequences are
/// replaced, never rejected
pub fn parse_document_bytes(input: &[u8], options: Options) -> Tree {
    let cleaned = utf8::clean(input);
    blocks::parse_document(&cleaned, options)
}

/// Parse markdown text and render to HTML
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_options(markdown, Options::default())
}

pub fn markdown_to_html_with_options(markdown: &str, options: Options) -> String {
    let tree = parse_document(markdown, options);
    let renderer = HtmlRenderer::with_options(options);
    renderer.render(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown_to_html(""), "");
    }

    #[test]
    fn test_basic_image() {
        let result = markdown_to_html("![foo](/url \"title\")\n");
        assert_eq!(
            result,
            "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n"
        );
    }

    #[test]
    fn test_image_without_title() {
        let result = markdown_to_html("![bar](/path)\n");
        assert_eq!(result, "<p><img src=\"/path\" alt=\"bar\" /></p>\n");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let tree = parse_document_bytes(b"ab\xFFcd\n", Options::default());
        let html = renderer::HtmlRenderer::new().render(&tree);
        assert_eq!(html, "<p>ab\u{FFFD}cd</p>\n");
    }
}
