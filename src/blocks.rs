/// Block-structure parser: a line-at-a-time state machine over the open
/// block chain.
///
/// Each input line is matched against the still-open containers from the
/// document root down (continuation), the first failure closes everything
/// below it, new containers are opened greedily in the canonical
/// precedence order, and whatever text remains joins the deepest open
/// leaf (or starts a paragraph). All tab arithmetic is column-based with
/// a four-column tab stop, tracking partially consumed tabs across
/// container prefixes.
use log::{debug, warn};

use crate::Options;
use crate::houdini;
use crate::inlines;
use crate::references::RefMap;
use crate::scanners;
use crate::tree::{
    CodeBlockData, HeadingData, ListData, ListDelim, ListType, NodeId, NodeKind, Sourcepos, Tree,
};

const TAB_STOP: usize = 4;
const CODE_INDENT: usize = 4;

/// Ceiling on open-container depth. Once the open chain is this deep no
/// further containers open and the line content degrades to text, which
/// bounds stack growth on pathological inputs without an error path.
const MAX_NESTING: usize = 512;

/// Run the block phase (and the inline phase it triggers on finish) over a
/// complete, already-cleaned input buffer.
pub fn parse_document(input: &str, options: Options) -> Tree {
    let mut parser = BlockParser::new(options);
    parser.feed(input);
    parser.finish()
}

enum Continuation {
    Match,
    NoMatch,
    /// The line was fully consumed by the check itself (closing fence)
    LineDone,
}

pub struct BlockParser {
    tree: Tree,
    refmap: RefMap,
    options: Options,
    /// Deepest block that received text on the previous line
    current: NodeId,
    line_number: usize,
    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,
    last_line_length: usize,
    cur_line_length: usize,
    at_end: bool,
}

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_line_end(c: char) -> bool {
    c == '\n'
}

fn peek(line: &[char], pos: usize) -> char {
    line.get(pos).copied().unwrap_or('\n')
}

impl BlockParser {
    pub fn new(options: Options) -> Self {
        let tree = Tree::new();
        let root = tree.root();
        BlockParser {
            tree,
            refmap: RefMap::new(),
            options,
            current: root,
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
            last_line_length: 0,
            cur_line_length: 0,
            at_end: false,
        }
    }

    /// Feed the whole input buffer, one normalized line at a time
    pub fn feed(&mut self, input: &str) {
        let bytes = input.as_bytes();
        let mut start = 0;
        for nl in memchr::memchr_iter(b'\n', bytes) {
            let line: Vec<char> = input[start..=nl].chars().collect();
            self.incorporate_line(&line);
            start = nl + 1;
        }
        if start < bytes.len() {
            let mut line: Vec<char> = input[start..].chars().collect();
            line.push('\n');
            self.incorporate_line(&line);
        }
    }

    /// Close everything, compute list tightness, run the inline phase, and
    /// hand over the finished tree.
    pub fn finish(mut self) -> Tree {
        self.at_end = true;
        while self.current != self.tree.root() {
            self.current = self
                .finalize(self.current)
                .unwrap_or_else(|| self.tree.root());
        }
        let root = self.tree.root();
        self.finalize(root);

        self.process_inlines();
        self.tree
    }

    fn incorporate_line(&mut self, line: &[char]) {
        self.offset = 0;
        self.column = 0;
        self.blank = false;
        self.partially_consumed_tab = false;
        self.line_number += 1;
        self.cur_line_length = line.len() - 1;

        if let Some((last_matched, all_matched)) = self.check_open_blocks(line) {
            let container = self.open_new_blocks(last_matched, line, all_matched);
            self.add_text_to_container(container, last_matched, line);
        }

        self.last_line_length = self.cur_line_length;
    }

    fn last_open_child(&self, id: NodeId) -> Option<NodeId> {
        let last = self.tree.last_child(id)?;
        if self.tree[last].open { Some(last) } else { None }
    }

    /// Phase one: walk the open chain from the root, matching each
    /// container's continuation rule. Returns the deepest matched
    /// container, or None when the line was consumed outright.
    fn check_open_blocks(&mut self, line: &[char]) -> Option<(NodeId, bool)> {
        let mut all_matched = true;
        let mut container = self.tree.root();

        while let Some(child) = self.last_open_child(container) {
            container = child;
            self.find_first_nonspace(line);
            match self.check_continuation(container, line) {
                Continuation::Match => {}
                Continuation::NoMatch => {
                    all_matched = false;
                    container = self.tree.parent(container).unwrap_or(self.tree.root());
                    break;
                }
                Continuation::LineDone => return None,
            }
        }
        Some((container, all_matched))
    }

    fn check_continuation(&mut self, container: NodeId, line: &[char]) -> Continuation {
        enum Info {
            Quote,
            Item { threshold: usize, has_children: bool },
            Fenced { ch: char, len: usize, offset: usize },
            Indented,
            Html(u8),
            Paragraph,
            List,
            Closed,
        }

        let info = match &self.tree[container].kind {
            NodeKind::BlockQuote => Info::Quote,
            NodeKind::Item(d) => Info::Item {
                threshold: d.marker_offset + d.padding,
                has_children: self.tree.first_child(container).is_some(),
            },
            NodeKind::CodeBlock(c) if c.fenced => Info::Fenced {
                ch: c.fence_char as char,
                len: c.fence_length,
                offset: c.fence_offset,
            },
            NodeKind::CodeBlock(_) => Info::Indented,
            NodeKind::HtmlBlock { block_type, .. } => Info::Html(*block_type),
            NodeKind::Paragraph => Info::Paragraph,
            NodeKind::List(_) => Info::List,
            _ => Info::Closed,
        };

        match info {
            Info::Quote => {
                if self.indent <= 3 && peek(line, self.first_nonspace) == '>' {
                    self.advance_offset(line, self.first_nonspace + 1 - self.offset, false);
                    if is_space_or_tab(peek(line, self.offset)) {
                        self.advance_offset(line, 1, true);
                    }
                    Continuation::Match
                } else {
                    Continuation::NoMatch
                }
            }
            Info::Item {
                threshold,
                has_children,
            } => {
                if self.indent >= threshold {
                    self.advance_offset(line, threshold, true);
                    Continuation::Match
                } else if self.blank && has_children {
                    self.advance_offset(line, self.first_nonspace - self.offset, false);
                    Continuation::Match
                } else {
                    Continuation::NoMatch
                }
            }
            Info::Fenced { ch, len, offset } => {
                let closed = self.indent <= 3
                    && peek(line, self.first_nonspace) == ch
                    && scanners::scan_close_code_fence(line, self.first_nonspace, ch)
                        .is_some_and(|n| n >= len);
                if closed {
                    self.advance_offset(line, line.len() - 1 - self.offset, false);
                    if let Some(parent) = self.finalize(container) {
                        self.current = parent;
                    }
                    Continuation::LineDone
                } else {
                    let mut remaining = offset;
                    while remaining > 0 && is_space_or_tab(peek(line, self.offset)) {
                        self.advance_offset(line, 1, true);
                        remaining -= 1;
                    }
                    Continuation::Match
                }
            }
            Info::Indented => {
                if self.indent >= CODE_INDENT {
                    self.advance_offset(line, CODE_INDENT, true);
                    Continuation::Match
                } else if self.blank {
                    self.advance_offset(line, self.first_nonspace - self.offset, false);
                    Continuation::Match
                } else {
                    Continuation::NoMatch
                }
            }
            Info::Html(block_type) => {
                if self.blank && (block_type == 6 || block_type == 7) {
                    Continuation::NoMatch
                } else {
                    Continuation::Match
                }
            }
            Info::Paragraph => {
                if self.blank {
                    Continuation::NoMatch
                } else {
                    Continuation::Match
                }
            }
            Info::List => Continuation::Match,
            Info::Closed => Continuation::NoMatch,
        }
    }

    fn open_depth(&self, mut id: NodeId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.tree.parent(id) {
            depth += 1;
            id = parent;
        }
        depth
    }

    /// Phase two: open new containers at the deepest matched point,
    /// following the canonical block-start precedence order.
    fn open_new_blocks(&mut self, mut container: NodeId, line: &[char], all_matched: bool) -> NodeId {
        let mut maybe_lazy = matches!(self.tree[self.current].kind, NodeKind::Paragraph);

        loop {
            if matches!(
                self.tree[container].kind,
                NodeKind::CodeBlock(_) | NodeKind::HtmlBlock { .. }
            ) {
                break;
            }

            self.find_first_nonspace(line);
            let indented = self.indent >= CODE_INDENT;

            if self.open_depth(container) >= MAX_NESTING {
                warn!(
                    "line {}: container nesting exceeds {}, treating content as text",
                    self.line_number, MAX_NESTING
                );
                break;
            }

            if !indented && peek(line, self.first_nonspace) == '>' {
                let start_column = self.first_nonspace + 1;
                self.advance_offset(line, self.first_nonspace + 1 - self.offset, false);
                if is_space_or_tab(peek(line, self.offset)) {
                    self.advance_offset(line, 1, true);
                }
                container = self.add_child(container, NodeKind::BlockQuote, start_column);
            } else if !indented
                && let Some((level, consumed)) =
                    scanners::scan_atx_heading_start(line, self.first_nonspace)
            {
                let start_column = self.first_nonspace + 1;
                self.advance_offset(line, self.first_nonspace + consumed - self.offset, false);
                container = self.add_child(
                    container,
                    NodeKind::Heading(HeadingData {
                        level,
                        setext: false,
                    }),
                    start_column,
                );
            } else if !indented
                && let Some((fence_char, fence_length)) =
                    scanners::scan_open_code_fence(line, self.first_nonspace)
            {
                let data = CodeBlockData {
                    fenced: true,
                    fence_char: fence_char as u8,
                    fence_length,
                    fence_offset: self.indent,
                    info: String::new(),
                    literal: String::new(),
                };
                container =
                    self.add_child(container, NodeKind::CodeBlock(data), self.first_nonspace + 1);
                self.advance_offset(
                    line,
                    self.first_nonspace + fence_length - self.offset,
                    false,
                );
            } else if !indented
                && let Some(block_type) = scanners::scan_html_block_start(
                    line,
                    self.first_nonspace,
                    matches!(self.tree[container].kind, NodeKind::Paragraph),
                )
            {
                container = self.add_child(
                    container,
                    NodeKind::HtmlBlock {
                        literal: String::new(),
                        block_type,
                    },
                    self.first_nonspace + 1,
                );
                // the whole line, marker included, belongs to the block
            } else if !indented
                && matches!(self.tree[container].kind, NodeKind::Paragraph)
                && let Some(level) = scanners::scan_setext_underline(line, self.first_nonspace)
            {
                let has_content = self.resolve_reference_link_definitions(container);
                if has_content {
                    self.tree[container].kind = NodeKind::Heading(HeadingData {
                        level,
                        setext: true,
                    });
                    self.advance_offset(line, line.len() - 1 - self.offset, false);
                }
                // A reference-only paragraph keeps collecting text; the
                // underline is ordinary content then.
            } else if !indented
                && !(matches!(self.tree[container].kind, NodeKind::Paragraph) && !all_matched)
                && scanners::scan_thematic_break(line, self.first_nonspace)
            {
                container =
                    self.add_child(container, NodeKind::ThematicBreak, self.first_nonspace + 1);
                self.advance_offset(line, line.len() - 1 - self.offset, false);
            } else if (!indented || matches!(self.tree[container].kind, NodeKind::List(_)))
                && self.indent < CODE_INDENT
                && let Some((matched, mut data)) = self.parse_list_marker(
                    line,
                    matches!(self.tree[container].kind, NodeKind::Paragraph),
                )
            {
                data.marker_offset = self.indent;
                self.advance_offset(line, self.first_nonspace + matched - self.offset, false);

                // Spaces after the marker set the item's content column;
                // more than four (or none, for an empty item) means one.
                let save_offset = self.offset;
                let save_column = self.column;
                let save_tab = self.partially_consumed_tab;
                while self.column - save_column <= 5 && is_space_or_tab(peek(line, self.offset)) {
                    self.advance_offset(line, 1, true);
                }
                let spaces = self.column - save_column;
                if spaces >= 5 || spaces < 1 || is_line_end(peek(line, self.offset)) {
                    data.padding = matched + 1;
                    self.offset = save_offset;
                    self.column = save_column;
                    self.partially_consumed_tab = save_tab;
                    if spaces > 0 {
                        self.advance_offset(line, 1, true);
                    }
                } else {
                    data.padding = matched + spaces;
                }

                let lists_match = match &self.tree[container].kind {
                    NodeKind::List(existing) => {
                        existing.list_type == data.list_type
                            && existing.delimiter == data.delimiter
                            && existing.bullet_char == data.bullet_char
                    }
                    _ => false,
                };
                if !lists_match {
                    container = self.add_child(
                        container,
                        NodeKind::List(data.clone()),
                        self.first_nonspace + 1,
                    );
                }
                container =
                    self.add_child(container, NodeKind::Item(data), self.first_nonspace + 1);
            } else if indented && !maybe_lazy && !self.blank {
                self.advance_offset(line, CODE_INDENT, true);
                container = self.add_child(
                    container,
                    NodeKind::CodeBlock(CodeBlockData::default()),
                    self.offset + 1,
                );
            } else {
                break;
            }

            if accepts_lines(&self.tree[container].kind) {
                break;
            }
            maybe_lazy = false;
        }

        container
    }

    /// Phase three: attach the rest of the line, honoring lazy paragraph
    /// continuation, and close whatever did not match.
    fn add_text_to_container(&mut self, mut container: NodeId, last_matched: NodeId, line: &[char]) {
        self.find_first_nonspace(line);

        if self.blank
            && let Some(last_child) = self.tree.last_child(container)
        {
            self.tree[last_child].last_line_blank = true;
        }

        // A blank line ending a block marks it for the tightness check,
        // except where the grammar says the blank is not "inside" it.
        let last_line_blank = self.blank
            && match &self.tree[container].kind {
                NodeKind::BlockQuote | NodeKind::Heading(_) | NodeKind::ThematicBreak => false,
                NodeKind::CodeBlock(c) if c.fenced => false,
                NodeKind::Item(_) => {
                    self.tree.first_child(container).is_some()
                        || self.tree[container].sourcepos.start_line != self.line_number
                }
                _ => true,
            };
        self.tree[container].last_line_blank = last_line_blank;

        let mut ancestor = container;
        while let Some(parent) = self.tree.parent(ancestor) {
            self.tree[parent].last_line_blank = false;
            ancestor = parent;
        }

        if self.current != last_matched
            && container == last_matched
            && !self.blank
            && matches!(self.tree[self.current].kind, NodeKind::Paragraph)
        {
            // Lazy continuation: the paragraph soaks up the line even
            // though its ancestors stopped matching
            debug!("line {}: lazy paragraph continuation", self.line_number);
            self.add_line(self.current, line);
            return;
        }

        while self.current != last_matched {
            match self.finalize(self.current) {
                Some(parent) => self.current = parent,
                None => break,
            }
        }

        enum Sink {
            Code,
            Html(u8),
            Heading(bool),
            Paragraphish,
            Skip,
        }
        let sink = match &self.tree[container].kind {
            NodeKind::CodeBlock(_) => Sink::Code,
            NodeKind::HtmlBlock { block_type, .. } => Sink::Html(*block_type),
            _ if self.blank => Sink::Skip,
            NodeKind::Heading(h) => Sink::Heading(h.setext),
            NodeKind::Paragraph => Sink::Paragraphish,
            _ => {
                // open a new paragraph for the leftover text
                container =
                    self.add_child(container, NodeKind::Paragraph, self.first_nonspace + 1);
                Sink::Paragraphish
            }
        };

        match sink {
            Sink::Code => self.add_line(container, line),
            Sink::Html(block_type) => {
                self.add_line(container, line);
                if scanners::scan_html_block_end(line, block_type)
                    && let Some(parent) = self.finalize(container)
                {
                    container = parent;
                }
            }
            Sink::Heading(setext) => {
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                if setext {
                    self.add_line(container, line);
                } else {
                    // single-line heading: strip any closing hash run
                    let mut rest: Vec<char> = line[self.offset..].to_vec();
                    chop_trailing_hashtags(&mut rest);
                    let text: String = rest.iter().collect();
                    self.tree[container].content.push_str(&text);
                }
            }
            Sink::Paragraphish => {
                self.advance_offset(line, self.first_nonspace - self.offset, false);
                self.add_line(container, line);
            }
            Sink::Skip => {}
        }

        self.current = container;
    }

    fn add_line(&mut self, node: NodeId, line: &[char]) {
        if self.partially_consumed_tab {
            self.offset += 1;
            let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
            for _ in 0..chars_to_tab {
                self.tree[node].content.push(' ');
            }
            self.partially_consumed_tab = false;
        }
        let text: String = line[self.offset..].iter().collect();
        self.tree[node].content.push_str(&text);
    }

    fn add_child(&mut self, mut parent: NodeId, kind: NodeKind, start_column: usize) -> NodeId {
        while !self.tree[parent].kind.can_contain(&kind) {
            parent = self
                .finalize(parent)
                .unwrap_or_else(|| self.tree.root());
        }

        debug!("line {}: open {}", self.line_number, block_name(&kind));
        let sourcepos = Sourcepos::new(self.line_number, start_column, 0, 0);
        let child = self.tree.create(kind, sourcepos);
        self.tree.append_child(parent, child);
        child
    }

    /// Close a block: mark it finished, fix its end position, and run the
    /// kind-specific finalization. Returns the parent.
    fn finalize(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent(node);
        self.tree[node].open = false;

        let end = if self.at_end {
            Sourcepos {
                end_line: self.line_number,
                end_col: self.last_line_length,
                ..self.tree[node].sourcepos
            }
        } else {
            match &self.tree[node].kind {
                NodeKind::Document => Sourcepos {
                    end_line: self.line_number,
                    end_col: self.cur_line_length,
                    ..self.tree[node].sourcepos
                },
                NodeKind::CodeBlock(c) if c.fenced => Sourcepos {
                    end_line: self.line_number,
                    end_col: self.cur_line_length,
                    ..self.tree[node].sourcepos
                },
                NodeKind::Heading(h) if h.setext => Sourcepos {
                    end_line: self.line_number,
                    end_col: self.cur_line_length,
                    ..self.tree[node].sourcepos
                },
                _ => Sourcepos {
                    end_line: self.line_number.saturating_sub(1),
                    end_col: self.last_line_length,
                    ..self.tree[node].sourcepos
                },
            }
        };
        self.tree[node].sourcepos = end;

        match &self.tree[node].kind {
            NodeKind::Paragraph => {
                let has_content = self.resolve_reference_link_definitions(node);
                if !has_content {
                    self.tree.detach(node);
                }
            }
            NodeKind::CodeBlock(_) => self.finalize_code_block(node),
            NodeKind::HtmlBlock { .. } => {
                let content = std::mem::take(&mut self.tree[node].content);
                if let NodeKind::HtmlBlock { literal, .. } = &mut self.tree[node].kind {
                    *literal = content;
                }
            }
            NodeKind::List(_) => self.finalize_list(node),
            _ => {}
        }

        parent
    }

    fn finalize_code_block(&mut self, node: NodeId) {
        let mut content = std::mem::take(&mut self.tree[node].content);
        let NodeKind::CodeBlock(data) = &self.tree[node].kind else {
            return;
        };

        if data.fenced {
            // First line is the info string
            let newline = content.find('\n').unwrap_or(content.len());
            let info = houdini::unescape(content[..newline].trim());
            let literal = if newline < content.len() {
                content[newline + 1..].to_string()
            } else {
                String::new()
            };
            if let NodeKind::CodeBlock(data) = &mut self.tree[node].kind {
                data.info = info;
                data.literal = literal;
            }
        } else {
            remove_trailing_blank_lines(&mut content);
            content.push('\n');
            if let NodeKind::CodeBlock(data) = &mut self.tree[node].kind {
                data.literal = content;
            }
        }
    }

    fn finalize_list(&mut self, node: NodeId) {
        let mut tight = true;
        let mut item = self.tree.first_child(node);
        'items: while let Some(it) = item {
            if self.ends_with_blank_line(it) && self.tree.next(it).is_some() {
                tight = false;
                break;
            }
            let mut sub = self.tree.first_child(it);
            while let Some(s) = sub {
                if self.ends_with_blank_line(s)
                    && (self.tree.next(it).is_some() || self.tree.next(s).is_some())
                {
                    tight = false;
                    break 'items;
                }
                sub = self.tree.next(s);
            }
            item = self.tree.next(it);
        }

        debug!("list closed, tight = {}", tight);
        if let NodeKind::List(data) = &mut self.tree[node].kind {
            data.tight = tight;
        }
        // items inherit the list's tightness for rendering
        let mut item = self.tree.first_child(node);
        while let Some(it) = item {
            if let NodeKind::Item(data) = &mut self.tree[it].kind {
                data.tight = tight;
            }
            item = self.tree.next(it);
        }
    }

    fn ends_with_blank_line(&self, mut id: NodeId) -> bool {
        loop {
            if self.tree[id].last_line_blank {
                return true;
            }
            match &self.tree[id].kind {
                NodeKind::List(_) | NodeKind::Item(_) => match self.tree.last_child(id) {
                    Some(child) => id = child,
                    None => return false,
                },
                _ => return false,
            }
        }
    }

    /// Strip a leading run of link-reference definitions from a paragraph,
    /// recording them. Returns whether real content remains.
    fn resolve_reference_link_definitions(&mut self, node: NodeId) -> bool {
        let content = std::mem::take(&mut self.tree[node].content);
        let chars: Vec<char> = content.chars().collect();
        let mut pos = 0;

        while pos < chars.len() && chars[pos] == '[' {
            match inlines::parse_reference(&chars[pos..], &mut self.refmap) {
                Some(consumed) => pos += consumed,
                None => break,
            }
        }

        let remaining: String = chars[pos..].iter().collect();
        let has_content = !remaining
            .trim_start_matches([' ', '\t'])
            .starts_with('\n')
            && !remaining.is_empty();
        self.tree[node].content = remaining;
        has_content
    }

    fn parse_list_marker(
        &self,
        line: &[char],
        interrupts_paragraph: bool,
    ) -> Option<(usize, ListData)> {
        let start_pos = self.first_nonspace;
        let mut pos = start_pos;
        let c = peek(line, pos);

        let data = if c == '*' || c == '-' || c == '+' {
            pos += 1;
            let follow = peek(line, pos);
            if !is_space_or_tab(follow) && !is_line_end(follow) {
                return None;
            }
            if interrupts_paragraph && rest_is_blank(line, pos) {
                return None;
            }
            ListData {
                list_type: ListType::Bullet,
                bullet_char: c as u8,
                ..ListData::default()
            }
        } else if c.is_ascii_digit() {
            let mut start: u32 = 0;
            let mut digits = 0;
            while peek(line, pos).is_ascii_digit() {
                start = start * 10 + (peek(line, pos) as u32 - '0' as u32);
                pos += 1;
                digits += 1;
                if digits > 9 {
                    return None;
                }
            }
            let delimiter = match peek(line, pos) {
                '.' => ListDelim::Period,
                ')' => ListDelim::Paren,
                _ => return None,
            };
            pos += 1;
            let follow = peek(line, pos);
            if !is_space_or_tab(follow) && !is_line_end(follow) {
                return None;
            }
            if interrupts_paragraph && (start != 1 || rest_is_blank(line, pos)) {
                return None;
            }
            ListData {
                list_type: ListType::Ordered,
                start,
                delimiter,
                ..ListData::default()
            }
        } else {
            return None;
        };

        Some((pos - start_pos, data))
    }

    fn find_first_nonspace(&mut self, line: &[char]) {
        let mut chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
        self.first_nonspace = self.offset;
        self.first_nonspace_column = self.column;

        loop {
            match peek(line, self.first_nonspace) {
                ' ' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += 1;
                    chars_to_tab -= 1;
                    if chars_to_tab == 0 {
                        chars_to_tab = TAB_STOP;
                    }
                }
                '\t' => {
                    self.first_nonspace += 1;
                    self.first_nonspace_column += chars_to_tab;
                    chars_to_tab = TAB_STOP;
                }
                _ => break,
            }
        }

        self.indent = self.first_nonspace_column - self.column;
        self.blank = is_line_end(peek(line, self.first_nonspace));
    }

    /// Move the cursor forward by `count` chars (or columns), expanding
    /// tabs against the four-column tab stop. A tab only partially used
    /// up is remembered so the remainder can be emitted as spaces.
    fn advance_offset(&mut self, line: &[char], mut count: usize, columns: bool) {
        while count > 0 {
            match line.get(self.offset) {
                Some('\t') => {
                    let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let advance = chars_to_tab.min(count);
                        self.column += advance;
                        if !self.partially_consumed_tab {
                            self.offset += 1;
                        }
                        count -= advance;
                    } else {
                        self.partially_consumed_tab = false;
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                Some(_) => {
                    self.partially_consumed_tab = false;
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
                None => break,
            }
        }
    }

    /// Resolve the inline structure of every leaf that holds raw text
    fn process_inlines(&mut self) {
        let mut leaves = Vec::new();
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            if matches!(
                self.tree[id].kind,
                NodeKind::Paragraph | NodeKind::Heading(_)
            ) {
                leaves.push(id);
            }
            let mut child = self.tree.first_child(id);
            while let Some(c) = child {
                stack.push(c);
                child = self.tree.next(c);
            }
        }

        for leaf in leaves {
            inlines::parse_inlines(&mut self.tree, leaf, &self.refmap, &self.options);
        }
    }
}

fn block_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Document => "document",
        NodeKind::BlockQuote => "block_quote",
        NodeKind::List(_) => "list",
        NodeKind::Item(_) => "item",
        NodeKind::CodeBlock(_) => "code_block",
        NodeKind::HtmlBlock { .. } => "html_block",
        NodeKind::Paragraph => "paragraph",
        NodeKind::Heading(_) => "heading",
        NodeKind::ThematicBreak => "thematic_break",
        _ => "inline",
    }
}

fn accepts_lines(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph | NodeKind::Heading(_) | NodeKind::CodeBlock(_)
    )
}

fn rest_is_blank(line: &[char], mut pos: usize) -> bool {
    while is_space_or_tab(peek(line, pos)) {
        pos += 1;
    }
    is_line_end(peek(line, pos))
}

/// Drop an optional closing `#` run (and the whitespace before it) from an
/// ATX heading line.
fn chop_trailing_hashtags(line: &mut Vec<char>) {
    while line.last().is_some_and(|&c| c == '\n' || is_space_or_tab(c)) {
        line.pop();
    }
    let mut n = line.len();
    while n > 0 && line[n - 1] == '#' {
        n -= 1;
    }
    if n < line.len() && (n == 0 || is_space_or_tab(line[n - 1])) {
        line.truncate(n);
        while line.last().is_some_and(|&c| is_space_or_tab(c)) {
            line.pop();
        }
    }
}

/// Trim trailing lines that hold only spaces and tabs
fn remove_trailing_blank_lines(content: &mut String) {
    let trimmed_len = content
        .trim_end_matches([' ', '\t', '\n'])
        .len();
    if trimmed_len == 0 {
        content.clear();
        return;
    }
    if let Some(newline) = content[trimmed_len..].find('\n') {
        content.truncate(trimmed_len + newline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chop_trailing_hashtags() {
        let mut l: Vec<char> = "foo ###\n".chars().collect();
        chop_trailing_hashtags(&mut l);
        assert_eq!(l.iter().collect::<String>(), "foo");

        let mut l: Vec<char> = "foo#\n".chars().collect();
        chop_trailing_hashtags(&mut l);
        assert_eq!(l.iter().collect::<String>(), "foo#");

        let mut l: Vec<char> = "###\n".chars().collect();
        chop_trailing_hashtags(&mut l);
        assert_eq!(l.iter().collect::<String>(), "");
    }

    #[test]
    fn test_remove_trailing_blank_lines() {
        let mut s = "code\n  \n\t\n".to_string();
        remove_trailing_blank_lines(&mut s);
        assert_eq!(s, "code");

        let mut s = "   \n \n".to_string();
        remove_trailing_blank_lines(&mut s);
        assert_eq!(s, "");
    }
}
