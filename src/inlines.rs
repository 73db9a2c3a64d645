/// Inline parser: resolves spans inside the raw text of a leaf block.
///
/// A single left-to-right scan emits atomic inlines (text runs, code
/// spans, autolinks, raw HTML, entities, breaks) and records emphasis and
/// bracket candidates on delimiter stacks. Precedence is deferred:
/// brackets resolve when their `]` arrives, emphasis resolves afterwards
/// over whatever is still unclaimed, so an unmatched delimiter simply
/// stays literal text.
use log::debug;

use crate::Options;
use crate::houdini;
use crate::references::{RefMap, normalize_label};
use crate::scanners;
use crate::tree::{LinkData, NodeId, NodeKind, Sourcepos, Tree};
use crate::utf8::{is_unicode_punctuation, is_unicode_whitespace};

/// Bracket-stack ceiling; beyond it further `[` stay literal
const MAX_BRACKETS: usize = 1000;

const LEFT_SINGLE_QUOTE: &str = "\u{2018}";
const RIGHT_SINGLE_QUOTE: &str = "\u{2019}";
const LEFT_DOUBLE_QUOTE: &str = "\u{201C}";
const RIGHT_DOUBLE_QUOTE: &str = "\u{201D}";

struct Delimiter {
    node: NodeId,
    ch: char,
    length: usize,
    can_open: bool,
    can_close: bool,
    removed: bool,
}

struct Bracket {
    node: NodeId,
    image: bool,
    active: bool,
    /// Delimiter-stack height when the bracket was pushed; emphasis inside
    /// the link text is processed down to this point only
    delim_bottom: usize,
    /// Subject position just after the opener, for collapsed/shortcut
    /// label extraction
    position: usize,
    /// Another `[` was seen after this one, ruling out shortcut labels
    bracket_after: bool,
}

struct Subject<'a> {
    tree: &'a mut Tree,
    parent: NodeId,
    chars: Vec<char>,
    pos: usize,
    delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
    refmap: &'a RefMap,
    options: &'a Options,
    base_line: usize,
}

/// Resolve the inline structure of one leaf block, replacing its raw
/// content with child inline nodes.
pub fn parse_inlines(tree: &mut Tree, node: NodeId, refmap: &RefMap, options: &Options) {
    let mut content = std::mem::take(&mut tree[node].content);
    while content.ends_with(['\n', ' ', '\t']) {
        content.pop();
    }
    let base_line = tree[node].sourcepos.start_line;

    let mut subj = Subject {
        tree,
        parent: node,
        chars: content.chars().collect(),
        pos: 0,
        delimiters: Vec::new(),
        brackets: Vec::new(),
        refmap,
        options,
        base_line,
    };

    while subj.pos < subj.chars.len() {
        subj.parse_inline();
    }
    subj.process_emphasis(0);
}

impl Subject<'_> {
    fn peek(&self, pos: usize) -> char {
        self.chars.get(pos).copied().unwrap_or('\n')
    }

    fn sourcepos(&self) -> Sourcepos {
        Sourcepos::new(self.base_line, 1, self.base_line, 1)
    }

    fn make_text(&mut self, text: String) -> NodeId {
        let sp = self.sourcepos();
        let id = self.tree.create(NodeKind::Text(text), sp);
        self.tree.append_child(self.parent, id);
        id
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let sp = self.sourcepos();
        let id = self.tree.create(kind, sp);
        self.tree.append_child(self.parent, id);
        id
    }

    fn parse_inline(&mut self) {
        let c = self.chars[self.pos];
        match c {
            '\n' => self.handle_newline(),
            '\\' => self.handle_backslash(),
            '`' => self.handle_backticks(),
            '&' => self.handle_entity(),
            '<' => self.handle_pointy_brace(),
            '*' | '_' => self.handle_delim(c),
            '\'' | '"' if self.options.smart => self.handle_delim(c),
            '[' => self.handle_open_bracket(),
            '!' => {
                if self.peek(self.pos + 1) == '[' {
                    self.handle_open_bracket_image();
                } else {
                    self.pos += 1;
                    self.make_text("!".to_string());
                }
            }
            ']' => self.handle_close_bracket(),
            '-' if self.options.smart => self.handle_hyphen(),
            '.' if self.options.smart => self.handle_period(),
            _ => self.handle_text_run(),
        }
    }

    fn is_special(&self, c: char) -> bool {
        matches!(c, '\n' | '\\' | '`' | '&' | '<' | '[' | ']' | '!' | '*' | '_')
            || (self.options.smart && matches!(c, '\'' | '"' | '-' | '.'))
    }

    fn handle_text_run(&mut self) {
        let start = self.pos;
        while self.pos < self.chars.len() && !self.is_special(self.chars[self.pos]) {
            self.pos += 1;
        }
        let mut text: String = self.chars[start..self.pos].iter().collect();
        // trailing spaces before a line end never render
        if self.peek(self.pos) == '\n' {
            text.truncate(text.trim_end_matches(' ').len());
        }
        if !text.is_empty() {
            self.make_text(text);
        }
    }

    fn handle_newline(&mut self) {
        let nlpos = self.pos;
        self.pos += 1;
        while self.peek(self.pos) == ' ' && self.pos < self.chars.len() {
            self.pos += 1;
        }
        let hard = nlpos >= 2 && self.chars[nlpos - 1] == ' ' && self.chars[nlpos - 2] == ' ';
        if hard {
            self.append(NodeKind::Linebreak);
        } else {
            self.append(NodeKind::Softbreak);
        }
    }

    fn handle_backslash(&mut self) {
        let next = self.peek(self.pos + 1);
        if next == '\n' && self.pos + 1 < self.chars.len() {
            self.pos += 2;
            while self.peek(self.pos) == ' ' && self.pos < self.chars.len() {
                self.pos += 1;
            }
            self.append(NodeKind::Linebreak);
        } else if self.pos + 1 < self.chars.len() && next.is_ascii_punctuation() {
            self.pos += 2;
            self.make_text(next.to_string());
        } else {
            self.pos += 1;
            self.make_text("\\".to_string());
        }
    }

    fn handle_entity(&mut self) {
        match houdini::unescape_entity(&self.chars, self.pos) {
            Some((expansion, next)) => {
                self.pos = next;
                self.make_text(expansion);
            }
            None => {
                self.pos += 1;
                self.make_text("&".to_string());
            }
        }
    }

    /// Code span: a backtick run closed by an equal-length run. Interior
    /// line endings become spaces; one layer of surrounding space is
    /// stripped when the content is not all spaces.
    fn handle_backticks(&mut self) {
        let open_start = self.pos;
        let mut i = self.pos;
        while self.peek(i) == '`' && i < self.chars.len() {
            i += 1;
        }
        let open_len = i - open_start;
        let content_start = i;

        let mut j = i;
        while j < self.chars.len() {
            if self.chars[j] == '`' {
                let close_start = j;
                while j < self.chars.len() && self.chars[j] == '`' {
                    j += 1;
                }
                if j - close_start == open_len {
                    let mut content: String =
                        self.chars[content_start..close_start].iter().collect();
                    content = content.replace('\n', " ");
                    if content.starts_with(' ')
                        && content.ends_with(' ')
                        && content.chars().any(|c| c != ' ')
                    {
                        content = content[1..content.len() - 1].to_string();
                    }
                    self.pos = j;
                    self.append(NodeKind::Code(content));
                    return;
                }
            } else {
                j += 1;
            }
        }

        // no closer: the opening run is literal
        self.pos = content_start;
        let literal: String = self.chars[open_start..content_start].iter().collect();
        self.make_text(literal);
    }

    fn handle_pointy_brace(&mut self) {
        // autolink?
        let mut i = self.pos + 1;
        while i < self.chars.len()
            && !matches!(self.chars[i], '<' | '>')
            && !self.chars[i].is_whitespace()
        {
            i += 1;
        }
        if self.peek(i) == '>' && i > self.pos + 1 {
            let inner: String = self.chars[self.pos + 1..i].iter().collect();
            if scanners::is_absolute_uri(&inner) {
                self.pos = i + 1;
                self.make_autolink(inner.clone(), inner);
                return;
            }
            if scanners::is_email_address(&inner) {
                self.pos = i + 1;
                self.make_autolink(format!("mailto:{}", inner), inner);
                return;
            }
        }

        // raw HTML?
        if let Some(end) = scanners::scan_html_tag(&self.chars, self.pos) {
            let literal: String = self.chars[self.pos..end].iter().collect();
            self.pos = end;
            self.append(NodeKind::HtmlInline(literal));
            return;
        }

        self.pos += 1;
        self.make_text("<".to_string());
    }

    fn make_autolink(&mut self, url: String, text: String) {
        let link = self.append(NodeKind::Link(LinkData { url, title: None }));
        let sp = self.sourcepos();
        let child = self.tree.create(NodeKind::Text(text), sp);
        self.tree.append_child(link, child);
    }

    /// Delimiter run for `*`/`_` (or smart quotes): classify its flanking
    /// and push a candidate on the stack.
    fn handle_delim(&mut self, c: char) {
        let before_char = if self.pos == 0 {
            '\n'
        } else {
            self.chars[self.pos - 1]
        };

        let run_start = self.pos;
        if c == '\'' || c == '"' {
            self.pos += 1;
        } else {
            while self.peek(self.pos) == c && self.pos < self.chars.len() {
                self.pos += 1;
            }
        }
        let numdelims = self.pos - run_start;
        let after_char = self.peek(self.pos);

        let left_flanking = numdelims > 0
            && !is_unicode_whitespace(after_char)
            && (!is_unicode_punctuation(after_char)
                || is_unicode_whitespace(before_char)
                || is_unicode_punctuation(before_char));
        let right_flanking = numdelims > 0
            && !is_unicode_whitespace(before_char)
            && (!is_unicode_punctuation(before_char)
                || is_unicode_whitespace(after_char)
                || is_unicode_punctuation(after_char));

        let (can_open, can_close) = match c {
            '_' => (
                left_flanking && (!right_flanking || is_unicode_punctuation(before_char)),
                right_flanking && (!left_flanking || is_unicode_punctuation(after_char)),
            ),
            '\'' | '"' => (
                left_flanking
                    && (!right_flanking || before_char == '(' || before_char == '[')
                    && before_char != ']'
                    && before_char != ')',
                right_flanking,
            ),
            _ => (left_flanking, right_flanking),
        };

        let contents = if c == '\'' && self.options.smart {
            RIGHT_SINGLE_QUOTE.to_string()
        } else if c == '"' && self.options.smart {
            if can_close {
                RIGHT_DOUBLE_QUOTE.to_string()
            } else {
                LEFT_DOUBLE_QUOTE.to_string()
            }
        } else {
            self.chars[run_start..self.pos].iter().collect()
        };

        let node = self.make_text(contents);
        if can_open || can_close {
            self.delimiters.push(Delimiter {
                node,
                ch: c,
                length: numdelims,
                can_open,
                can_close,
                removed: false,
            });
        }
    }

    fn handle_open_bracket(&mut self) {
        self.pos += 1;
        let node = self.make_text("[".to_string());
        self.push_bracket(node, false);
    }

    fn handle_open_bracket_image(&mut self) {
        self.pos += 2;
        let node = self.make_text("![".to_string());
        self.push_bracket(node, true);
    }

    fn push_bracket(&mut self, node: NodeId, image: bool) {
        if self.brackets.len() >= MAX_BRACKETS {
            return;
        }
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            image,
            active: true,
            delim_bottom: self.delimiters.len(),
            position: self.pos,
            bracket_after: false,
        });
    }

    /// `]`: try to materialize a link or image from the innermost bracket.
    fn handle_close_bracket(&mut self) {
        self.pos += 1;
        let initial_pos = self.pos;

        let Some(opener) = self.brackets.last() else {
            self.make_text("]".to_string());
            return;
        };
        if !opener.active {
            self.brackets.pop();
            self.make_text("]".to_string());
            return;
        }

        let is_image = opener.image;
        let opener_node = opener.node;
        let opener_position = opener.position;
        let opener_bracket_after = opener.bracket_after;
        let delim_bottom = opener.delim_bottom;

        // inline form: (destination "title")
        let mut found: Option<(String, Option<String>)> = None;
        if self.peek(self.pos) == '('
            && let Some((url, title, after)) = self.scan_inline_link_tail(self.pos)
        {
            found = Some((url, title));
            self.pos = after;
        }

        // reference forms: full, collapsed, shortcut
        if found.is_none() {
            let mut label: Option<String> = None;
            if let Some((lab, after)) = scanners::scan_link_label(&self.chars, self.pos) {
                if !lab.is_empty() {
                    label = Some(lab);
                    self.pos = after;
                } else if !opener_bracket_after {
                    // collapsed: [] refers back to the link text
                    label = Some(
                        self.chars[opener_position..initial_pos - 1]
                            .iter()
                            .collect(),
                    );
                    self.pos = after;
                }
            } else if !opener_bracket_after {
                // shortcut: the link text is the label
                label = Some(
                    self.chars[opener_position..initial_pos - 1]
                        .iter()
                        .collect(),
                );
            }

            if let Some(lab) = label
                && !normalize_label(&lab).is_empty()
                && let Some(reference) = self.refmap.lookup(&lab)
            {
                found = Some((reference.url.clone(), reference.title.clone()));
            }
        }

        let Some((url, title)) = found else {
            self.pos = initial_pos;
            self.brackets.pop();
            self.make_text("]".to_string());
            return;
        };

        debug!("resolved {} at position {}", if is_image { "image" } else { "link" }, initial_pos);

        // The opener text node becomes the link/image node itself, and the
        // nodes scanned since then become its children.
        let data = LinkData { url, title };
        self.tree[opener_node].kind = if is_image {
            NodeKind::Image(data)
        } else {
            NodeKind::Link(data)
        };
        let mut child = self.tree.next(opener_node);
        while let Some(c) = child {
            let next = self.tree.next(c);
            self.tree.append_child(opener_node, c);
            child = next;
        }

        self.process_emphasis(delim_bottom);
        self.brackets.pop();

        // link text may not contain further links: deactivate earlier
        // openers (images are exempt)
        if !is_image {
            for bracket in self.brackets.iter_mut() {
                if !bracket.image {
                    bracket.active = false;
                }
            }
        }
    }

    /// Scan `(dest "title")` starting at `pos` (the `(`). Only commits on
    /// a full match; returns the index past `)`.
    fn scan_inline_link_tail(&self, pos: usize) -> Option<(String, Option<String>, usize)> {
        let mut i = self.spnl(pos + 1);
        let (raw_dest, after_dest) = scanners::scan_link_destination(&self.chars, i)?;
        i = after_dest;

        let before_title = i;
        i = self.spnl(i);
        let mut title = None;
        if i > before_title
            && let Some((raw_title, after_title)) = scanners::scan_link_title(&self.chars, i)
        {
            title = Some(houdini::unescape(&raw_title));
            i = after_title;
            i = self.spnl(i);
        } else {
            i = before_title;
            i = self.spnl(i);
        }

        if self.peek(i) != ')' {
            return None;
        }
        Some((houdini::unescape(&raw_dest), title, i + 1))
    }

    /// Skip spaces and tabs with at most one line ending
    fn spnl(&self, mut pos: usize) -> usize {
        let mut seen_newline = false;
        while pos < self.chars.len() {
            match self.chars[pos] {
                ' ' | '\t' => pos += 1,
                '\n' if !seen_newline => {
                    seen_newline = true;
                    pos += 1;
                }
                _ => break,
            }
        }
        pos
    }

    fn handle_hyphen(&mut self) {
        self.pos += 1;
        if self.peek(self.pos) != '-' {
            self.make_text("-".to_string());
            return;
        }
        let mut numhyphens = 1;
        while self.peek(self.pos) == '-' && self.pos < self.chars.len() {
            self.pos += 1;
            numhyphens += 1;
        }

        let (en_count, em_count) = if numhyphens % 3 == 0 {
            (0, numhyphens / 3)
        } else if numhyphens % 2 == 0 {
            (numhyphens / 2, 0)
        } else if numhyphens % 5 == 2 {
            (1, (numhyphens - 2) / 3)
        } else {
            (2, (numhyphens - 4) / 3)
        };
        let text = "\u{2014}".repeat(em_count) + &"\u{2013}".repeat(en_count);
        self.make_text(text);
    }

    fn handle_period(&mut self) {
        if self.peek(self.pos + 1) == '.' && self.peek(self.pos + 2) == '.' {
            self.pos += 3;
            self.make_text("\u{2026}".to_string());
        } else {
            self.pos += 1;
            self.make_text(".".to_string());
        }
    }

    fn text_len(&self, id: NodeId) -> usize {
        match &self.tree[id].kind {
            NodeKind::Text(s) => s.len(),
            _ => 0,
        }
    }

    fn truncate_text(&mut self, id: NodeId, len: usize) {
        if let NodeKind::Text(s) = &mut self.tree[id].kind {
            s.truncate(len);
        }
    }

    fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(s) = &mut self.tree[id].kind {
            s.clear();
            s.push_str(text);
        }
    }

    /// Resolve emphasis over the delimiters above `stack_bottom`: for each
    /// closer, the nearest compatible opener wins, subject to the
    /// multiple-of-3 restriction on runs that can both open and close.
    fn process_emphasis(&mut self, stack_bottom: usize) {
        let mut closer_idx = stack_bottom;

        while closer_idx < self.delimiters.len() {
            let closer = &self.delimiters[closer_idx];
            if closer.removed || !closer.can_close {
                closer_idx += 1;
                continue;
            }
            let ch = closer.ch;
            let closer_can_open = closer.can_open;
            let closer_length = closer.length;

            // nearest opener first
            let mut opener_found = None;
            let mut j = closer_idx;
            while j > stack_bottom {
                j -= 1;
                let opener = &self.delimiters[j];
                if opener.removed || !opener.can_open || opener.ch != ch {
                    continue;
                }
                let odd_match = (closer_can_open || opener.can_close)
                    && (opener.length + closer_length) % 3 == 0
                    && !(opener.length % 3 == 0 && closer_length % 3 == 0);
                if !odd_match {
                    opener_found = Some(j);
                    break;
                }
            }

            match ch {
                '*' | '_' => {
                    if let Some(opener_idx) = opener_found {
                        closer_idx = self.insert_emph(opener_idx, closer_idx);
                    } else {
                        if !closer_can_open {
                            self.delimiters[closer_idx].removed = true;
                        }
                        closer_idx += 1;
                    }
                }
                '\'' | '"' => {
                    let (left, right) = if ch == '\'' {
                        (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE)
                    } else {
                        (LEFT_DOUBLE_QUOTE, RIGHT_DOUBLE_QUOTE)
                    };
                    let closer_node = self.delimiters[closer_idx].node;
                    self.set_text(closer_node, right);
                    if let Some(opener_idx) = opener_found {
                        let opener_node = self.delimiters[opener_idx].node;
                        self.set_text(opener_node, left);
                        self.delimiters[opener_idx].removed = true;
                        self.delimiters[closer_idx].removed = true;
                    }
                    closer_idx += 1;
                }
                _ => closer_idx += 1,
            }
        }

        self.delimiters.truncate(stack_bottom);
    }

    /// Pair one opener and closer: consume one unit each for emphasis or
    /// two for strong, splice the new node around the enclosed inlines,
    /// and drop exhausted delimiter text. Returns the index to resume at.
    fn insert_emph(&mut self, opener_idx: usize, closer_idx: usize) -> usize {
        let opener_node = self.delimiters[opener_idx].node;
        let closer_node = self.delimiters[closer_idx].node;
        let opener_chars = self.text_len(opener_node);
        let closer_chars = self.text_len(closer_node);
        let use_delims = if opener_chars >= 2 && closer_chars >= 2 {
            2
        } else {
            1
        };

        self.truncate_text(opener_node, opener_chars - use_delims);
        self.truncate_text(closer_node, closer_chars - use_delims);
        self.delimiters[opener_idx].length = opener_chars - use_delims;
        self.delimiters[closer_idx].length = closer_chars - use_delims;

        for k in opener_idx + 1..closer_idx {
            self.delimiters[k].removed = true;
        }

        let sp = self.sourcepos();
        let emph = self.tree.create(
            if use_delims == 2 {
                NodeKind::Strong
            } else {
                NodeKind::Emph
            },
            sp,
        );

        let mut child = self.tree.next(opener_node);
        while let Some(c) = child {
            if c == closer_node {
                break;
            }
            let next = self.tree.next(c);
            self.tree.append_child(emph, c);
            child = next;
        }
        self.tree.insert_after(opener_node, emph);

        if opener_chars - use_delims == 0 {
            self.tree.detach(opener_node);
            self.delimiters[opener_idx].removed = true;
        }
        if closer_chars - use_delims == 0 {
            self.tree.detach(closer_node);
            self.delimiters[closer_idx].removed = true;
        }

        closer_idx
    }
}

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Parse one link-reference definition at the head of `chars`. On success
/// the reference is recorded and the number of chars consumed (through the
/// line end) is returned.
pub fn parse_reference(chars: &[char], refmap: &mut RefMap) -> Option<usize> {
    let (label, mut pos) = scanners::scan_link_label(chars, 0)?;
    if normalize_label(&label).is_empty() {
        return None;
    }

    if chars.get(pos) != Some(&':') {
        return None;
    }
    pos += 1;
    pos = spnl_at(chars, pos);

    let (raw_dest, after_dest) = scanners::scan_link_destination(chars, pos)?;
    if after_dest == pos {
        return None;
    }
    pos = after_dest;

    // optional title, whitespace-separated; it may fail without sinking
    // the definition as long as the destination line ends cleanly
    let before_title = pos;
    let title_pos = spnl_at(chars, pos);
    let mut title = None;
    let mut end = pos;
    if title_pos > before_title
        && let Some((raw_title, after_title)) = scanners::scan_link_title(chars, title_pos)
    {
        title = Some(raw_title);
        end = after_title;
    }

    // require only spaces up to the line end
    match finish_line(chars, end) {
        Some(consumed) => {
            let title = title.filter(|t| !t.is_empty()).map(|t| houdini::unescape(&t));
            refmap.add(&label, houdini::unescape(&raw_dest), title);
            Some(consumed)
        }
        None if title.is_some() => {
            // rewind: treat the would-be title as unrelated content
            let consumed = finish_line(chars, before_title)?;
            refmap.add(&label, houdini::unescape(&raw_dest), None);
            Some(consumed)
        }
        None => None,
    }
}

fn spnl_at(chars: &[char], mut pos: usize) -> usize {
    let mut seen_newline = false;
    while pos < chars.len() {
        match chars[pos] {
            ' ' | '\t' => pos += 1,
            '\n' if !seen_newline => {
                seen_newline = true;
                pos += 1;
            }
            _ => break,
        }
    }
    pos
}

/// Skip trailing spaces and the line end; None if anything else remains
fn finish_line(chars: &[char], mut pos: usize) -> Option<usize> {
    while pos < chars.len() && is_space_or_tab(chars[pos]) {
        pos += 1;
    }
    if pos == chars.len() {
        return Some(pos);
    }
    if chars[pos] == '\n' {
        return Some(pos + 1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::references::RefMap;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_parse_reference_basic() {
        let mut map = RefMap::new();
        let consumed = parse_reference(&chars("[foo]: /url \"title\"\nrest"), &mut map);
        assert_eq!(consumed, Some(20));
        let r = map.lookup("foo").unwrap();
        assert_eq!(r.url, "/url");
        assert_eq!(r.title.as_deref(), Some("title"));
    }

    #[test]
    fn test_parse_reference_multiline() {
        let mut map = RefMap::new();
        let input = chars("[foo]:\n   /bar\n");
        assert_eq!(parse_reference(&input, &mut map), Some(input.len()));
        assert_eq!(map.lookup("FOO").unwrap().url, "/bar");
    }

    #[test]
    fn test_parse_reference_bad_title_falls_back() {
        // Title fails to close on its line, but the destination line is
        // complete, so the definition holds without a title
        let mut map = RefMap::new();
        let input = chars("[foo]: /url\n\"rest of paragraph\n");
        let consumed = parse_reference(&input, &mut map).unwrap();
        assert_eq!(consumed, 12);
        assert_eq!(map.lookup("foo").unwrap().title, None);
    }

    #[test]
    fn test_parse_reference_rejects_trailing_junk() {
        let mut map = RefMap::new();
        assert_eq!(
            parse_reference(&chars("[foo]: /url junk\n"), &mut map),
            None
        );
        assert!(map.is_empty());
    }

    #[test]
    fn test_parse_reference_requires_nonblank_label() {
        let mut map = RefMap::new();
        assert_eq!(parse_reference(&chars("[  ]: /url\n"), &mut map), None);
    }
}
