/// HTML renderer for the document tree
///
/// Walks the iterator's enter/exit event stream and appends markup, so
/// rendering depth is bounded regardless of nesting. Text goes through
/// the HTML escape, URLs through the href escape.
use crate::Options;
use crate::houdini;
use crate::tree::{ListType, NodeEdge, NodeId, NodeKind, Tree};

pub struct HtmlRenderer {
    options: Options,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer {
            options: Options::default(),
        }
    }

    pub fn with_options(options: Options) -> Self {
        HtmlRenderer { options }
    }

    pub fn render(&self, tree: &Tree) -> String {
        self.render_from(tree, tree.root())
    }

    /// Render the subtree rooted at `root`
    pub fn render_from(&self, tree: &Tree, root: NodeId) -> String {
        let mut out = String::new();
        // while set, we are inside an image's alt text: only character
        // data is emitted until the image node's exit event
        let mut plain_until: Option<NodeId> = None;

        for edge in tree.iter_from(root) {
            let (id, entering) = match edge {
                NodeEdge::Enter(id) => (id, true),
                NodeEdge::Exit(id) => (id, false),
            };

            if let Some(image) = plain_until {
                if !entering && id == image {
                    self.finish_image(&mut out, tree, id);
                    plain_until = None;
                } else if entering {
                    self.render_plain(&mut out, tree, id);
                }
                continue;
            }

            match &tree[id].kind {
                NodeKind::Document => {}
                NodeKind::BlockQuote => {
                    if entering {
                        cr(&mut out);
                        out.push_str("<blockquote");
                        self.sourcepos(&mut out, tree, id);
                        out.push_str(">\n");
                    } else {
                        cr(&mut out);
                        out.push_str("</blockquote>\n");
                    }
                }
                NodeKind::List(data) => {
                    if entering {
                        cr(&mut out);
                        match data.list_type {
                            ListType::Bullet => {
                                out.push_str("<ul");
                                self.sourcepos(&mut out, tree, id);
                                out.push_str(">\n");
                            }
                            ListType::Ordered => {
                                out.push_str("<ol");
                                if data.start != 1 {
                                    out.push_str(&format!(" start=\"{}\"", data.start));
                                }
                                self.sourcepos(&mut out, tree, id);
                                out.push_str(">\n");
                            }
                        }
                    } else {
                        out.push_str(match data.list_type {
                            ListType::Bullet => "</ul>\n",
                            ListType::Ordered => "</ol>\n",
                        });
                    }
                }
                NodeKind::Item(_) => {
                    if entering {
                        cr(&mut out);
                        out.push_str("<li");
                        self.sourcepos(&mut out, tree, id);
                        out.push('>');
                    } else {
                        out.push_str("</li>\n");
                    }
                }
                NodeKind::Heading(h) => {
                    if entering {
                        cr(&mut out);
                        out.push_str(&format!("<h{}", h.level));
                        self.sourcepos(&mut out, tree, id);
                        out.push('>');
                    } else {
                        out.push_str(&format!("</h{}>\n", h.level));
                    }
                }
                NodeKind::CodeBlock(data) => {
                    cr(&mut out);
                    out.push_str("<pre");
                    self.sourcepos(&mut out, tree, id);
                    out.push_str("><code");
                    if let Some(lang) = data.info.split_whitespace().next() {
                        out.push_str(" class=\"language-");
                        out.push_str(&houdini::escape_html(lang));
                        out.push('"');
                    }
                    out.push('>');
                    out.push_str(&houdini::escape_html(&data.literal));
                    out.push_str("</code></pre>\n");
                }
                NodeKind::HtmlBlock { literal, .. } => {
                    cr(&mut out);
                    if self.options.safe {
                        out.push_str("<!-- raw HTML omitted -->");
                    } else {
                        out.push_str(literal);
                    }
                    cr(&mut out);
                }
                NodeKind::ThematicBreak => {
                    cr(&mut out);
                    out.push_str("<hr");
                    self.sourcepos(&mut out, tree, id);
                    out.push_str(" />\n");
                }
                NodeKind::Paragraph => {
                    let tight = in_tight_list(tree, id);
                    if !tight {
                        if entering {
                            cr(&mut out);
                            out.push_str("<p");
                            self.sourcepos(&mut out, tree, id);
                            out.push('>');
                        } else {
                            out.push_str("</p>\n");
                        }
                    }
                }
                NodeKind::Text(text) => out.push_str(&houdini::escape_html(text)),
                NodeKind::Linebreak => out.push_str("<br />\n"),
                NodeKind::Softbreak => {
                    if self.options.hardbreaks {
                        out.push_str("<br />\n");
                    } else {
                        out.push('\n');
                    }
                }
                NodeKind::Code(code) => {
                    out.push_str("<code>");
                    out.push_str(&houdini::escape_html(code));
                    out.push_str("</code>");
                }
                NodeKind::HtmlInline(literal) => {
                    if self.options.safe {
                        out.push_str("<!-- raw HTML omitted -->");
                    } else {
                        out.push_str(literal);
                    }
                }
                NodeKind::Emph => {
                    out.push_str(if entering { "<em>" } else { "</em>" });
                }
                NodeKind::Strong => {
                    out.push_str(if entering { "<strong>" } else { "</strong>" });
                }
                NodeKind::Link(data) => {
                    if entering {
                        out.push_str("<a href=\"");
                        out.push_str(&self.render_url(&data.url));
                        out.push('"');
                        if let Some(title) = &data.title {
                            out.push_str(" title=\"");
                            out.push_str(&houdini::escape_html(title));
                            out.push('"');
                        }
                        out.push('>');
                    } else {
                        out.push_str("</a>");
                    }
                }
                NodeKind::Image(data) => {
                    if entering {
                        out.push_str("<img src=\"");
                        out.push_str(&self.render_url(&data.url));
                        out.push_str("\" alt=\"");
                        plain_until = Some(id);
                    }
                }
            }
        }

        out
    }

    /// Alt-text mode: only the character data of the image description
    fn render_plain(&self, out: &mut String, tree: &Tree, id: NodeId) {
        match &tree[id].kind {
            NodeKind::Text(text) => out.push_str(&houdini::escape_html(text)),
            NodeKind::Code(code) => out.push_str(&houdini::escape_html(code)),
            NodeKind::Softbreak | NodeKind::Linebreak => out.push(' '),
            _ => {}
        }
    }

    fn finish_image(&self, out: &mut String, tree: &Tree, id: NodeId) {
        if let NodeKind::Image(data) = &tree[id].kind {
            out.push('"');
            if let Some(title) = &data.title {
                out.push_str(" title=\"");
                out.push_str(&houdini::escape_html(title));
                out.push('"');
            }
            out.push_str(" />");
        }
    }

    fn render_url(&self, url: &str) -> String {
        if self.options.safe && is_unsafe_url(url) {
            String::new()
        } else {
            houdini::escape_href(url)
        }
    }

    fn sourcepos(&self, out: &mut String, tree: &Tree, id: NodeId) {
        if self.options.sourcepos {
            let sp = tree[id].sourcepos;
            out.push_str(&format!(
                " data-sourcepos=\"{}:{}-{}:{}\"",
                sp.start_line, sp.start_col, sp.end_line, sp.end_col
            ));
        }
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a newline unless the output is empty or already ends with one
fn cr(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Paragraphs directly inside a tight list's items render without tags
fn in_tight_list(tree: &Tree, paragraph: NodeId) -> bool {
    let Some(parent) = tree.parent(paragraph) else {
        return false;
    };
    let Some(grandparent) = tree.parent(parent) else {
        return false;
    };
    match &tree[grandparent].kind {
        NodeKind::List(data) => data.tight,
        _ => false,
    }
}

fn starts_with_ci(url: &str, prefix: &str) -> bool {
    url.len() >= prefix.len() && url[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Schemes suppressed in safe mode. `data:` is allowed only for a small
/// set of image types.
fn is_unsafe_url(url: &str) -> bool {
    if starts_with_ci(url, "javascript:")
        || starts_with_ci(url, "vbscript:")
        || starts_with_ci(url, "file:")
    {
        return true;
    }
    if starts_with_ci(url, "data:") {
        return !(starts_with_ci(url, "data:image/png")
            || starts_with_ci(url, "data:image/gif")
            || starts_with_ci(url, "data:image/jpeg")
            || starts_with_ci(url, "data:image/webp"));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_url_classification() {
        assert!(is_unsafe_url("javascript:alert(1)"));
        assert!(is_unsafe_url("JAVASCRIPT:alert(1)"));
        assert!(is_unsafe_url("file:///etc/passwd"));
        assert!(is_unsafe_url("data:text/html,x"));
        assert!(!is_unsafe_url("data:image/png;base64,AAAA"));
        assert!(!is_unsafe_url("https://example.com"));
        assert!(!is_unsafe_url("/relative"));
    }
}
