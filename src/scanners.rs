/// Lexical scanners for line-level and span-level constructs.
///
/// These are all position-based recognizers over char slices: given a line
/// and a start index they answer "does this construct begin here, and how
/// far does it reach". They never mutate parser state.

/// Tag names that open an HTML block of type 1
const VERBATIM_TAGS: [&str; 4] = ["pre", "script", "style", "textarea"];

/// Tag names that open an HTML block of type 6
const BLOCK_TAGS: [&str; 62] = [
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "section", "source",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_line_end(c: char) -> bool {
    c == '\n'
}

fn peek(line: &[char], pos: usize) -> char {
    line.get(pos).copied().unwrap_or('\n')
}

/// Thematic break: three or more of the same `-`, `_` or `*`, interspersed
/// with spaces and tabs only.
pub fn scan_thematic_break(line: &[char], pos: usize) -> bool {
    let marker = peek(line, pos);
    if marker != '-' && marker != '_' && marker != '*' {
        return false;
    }

    let mut count = 0;
    let mut i = pos;
    while i < line.len() && !is_line_end(line[i]) {
        if line[i] == marker {
            count += 1;
        } else if !is_space_or_tab(line[i]) {
            return false;
        }
        i += 1;
    }
    count >= 3
}

/// ATX heading opener: 1–6 `#` followed by space, tab, or end of line.
/// Returns the level and the number of chars consumed (marker plus the
/// whitespace run after it, so the offset lands on the content).
pub fn scan_atx_heading_start(line: &[char], pos: usize) -> Option<(u8, usize)> {
    let mut i = pos;
    while peek(line, i) == '#' {
        i += 1;
    }
    let level = i - pos;
    if level == 0 || level > 6 {
        return None;
    }

    if is_line_end(peek(line, i)) {
        return Some((level as u8, i - pos + 1));
    }
    if !is_space_or_tab(peek(line, i)) {
        return None;
    }
    while is_space_or_tab(peek(line, i)) {
        i += 1;
    }
    Some((level as u8, i - pos))
}

/// Setext underline: a run of `=` (level 1) or `-` (level 2) with nothing
/// but trailing whitespace after it.
pub fn scan_setext_underline(line: &[char], pos: usize) -> Option<u8> {
    let marker = peek(line, pos);
    let level = match marker {
        '=' => 1,
        '-' => 2,
        _ => return None,
    };

    let mut i = pos;
    while peek(line, i) == marker {
        i += 1;
    }
    if i == pos {
        return None;
    }
    while is_space_or_tab(peek(line, i)) {
        i += 1;
    }
    if is_line_end(peek(line, i)) {
        Some(level)
    } else {
        None
    }
}

/// Opening code fence: three or more backticks or tildes. The info string
/// of a backtick fence may not contain a backtick.
pub fn scan_open_code_fence(line: &[char], pos: usize) -> Option<(char, usize)> {
    let fence_char = peek(line, pos);
    if fence_char != '`' && fence_char != '~' {
        return None;
    }

    let mut i = pos;
    while peek(line, i) == fence_char {
        i += 1;
    }
    let fence_length = i - pos;
    if fence_length < 3 {
        return None;
    }

    if fence_char == '`' {
        while i < line.len() && !is_line_end(line[i]) {
            if line[i] == '`' {
                return None;
            }
            i += 1;
        }
    }
    Some((fence_char, fence_length))
}

/// Closing fence: a run of the opening fence char with only trailing
/// whitespace. Returns the run length (caller compares against the
/// opening length).
pub fn scan_close_code_fence(line: &[char], pos: usize, fence_char: char) -> Option<usize> {
    let mut i = pos;
    while peek(line, i) == fence_char {
        i += 1;
    }
    let count = i - pos;
    if count < 3 {
        return None;
    }
    while is_space_or_tab(peek(line, i)) {
        i += 1;
    }
    if is_line_end(peek(line, i)) {
        Some(count)
    } else {
        None
    }
}

fn tag_name_at(line: &[char], pos: usize) -> Option<(String, usize)> {
    let mut i = pos;
    if !peek(line, i).is_ascii_alphabetic() {
        return None;
    }
    i += 1;
    while peek(line, i).is_ascii_alphanumeric() || peek(line, i) == '-' {
        i += 1;
    }
    Some((line[pos..i].iter().collect::<String>().to_lowercase(), i))
}

/// HTML block opener. Returns which of the seven block kinds begins at
/// `pos`, following the canonical start conditions. A type 7 block (a
/// complete tag alone on its line) may not interrupt a paragraph.
pub fn scan_html_block_start(line: &[char], pos: usize, in_paragraph: bool) -> Option<u8> {
    if peek(line, pos) != '<' {
        return None;
    }
    let after = pos + 1;

    // Type 2-5: comment, processing instruction, declaration, CDATA
    if peek(line, after) == '!' {
        if peek(line, after + 1) == '-' && peek(line, after + 2) == '-' {
            return Some(2);
        }
        if line.len() > after + 7 && line[after + 1..after + 8] == ['[', 'C', 'D', 'A', 'T', 'A', '['] {
            return Some(5);
        }
        if peek(line, after + 1).is_ascii_alphabetic() {
            return Some(4);
        }
        return None;
    }
    if peek(line, after) == '?' {
        return Some(3);
    }

    let (closing, name_pos) = if peek(line, after) == '/' {
        (true, after + 1)
    } else {
        (false, after)
    };
    let (name, end) = tag_name_at(line, name_pos)?;
    let follow = peek(line, end);

    // Type 1: verbatim content tags (opening form only)
    if !closing
        && VERBATIM_TAGS.contains(&name.as_str())
        && (is_space_or_tab(follow) || is_line_end(follow) || follow == '>')
    {
        return Some(1);
    }

    // Type 6: known block-level tag names
    if BLOCK_TAGS.contains(&name.as_str()) {
        let ok = is_space_or_tab(follow)
            || is_line_end(follow)
            || follow == '>'
            || (follow == '/' && peek(line, end + 1) == '>');
        if ok {
            return Some(6);
        }
    }

    // Type 7: any complete tag alone on the line
    if !in_paragraph
        && !VERBATIM_TAGS.contains(&name.as_str())
        && let Some(tag_end) = scan_html_tag(line, pos)
    {
        let mut i = tag_end;
        while is_space_or_tab(peek(line, i)) {
            i += 1;
        }
        if is_line_end(peek(line, i)) {
            return Some(7);
        }
    }

    None
}

fn contains_ci(line: &[char], needle: &str) -> bool {
    let hay: String = line.iter().collect::<String>().to_lowercase();
    hay.contains(needle)
}

/// End condition for an open HTML block. For types 1–5 the line matching
/// the condition is still part of the block; types 6 and 7 end at a blank
/// line, which the block parser handles as a failed continuation.
pub fn scan_html_block_end(line: &[char], block_type: u8) -> bool {
    match block_type {
        1 => {
            contains_ci(line, "</script>")
                || contains_ci(line, "</pre>")
                || contains_ci(line, "</style>")
                || contains_ci(line, "</textarea>")
        }
        2 => line.windows(3).any(|w| *w == ['-', '-', '>']),
        3 => line.windows(2).any(|w| *w == ['?', '>']),
        4 => line.contains(&'>'),
        5 => line.windows(3).any(|w| *w == [']', ']', '>']),
        _ => false,
    }
}

/// A complete inline HTML construct starting at `pos` (which must point at
/// `<`): open tag, closing tag, comment, processing instruction,
/// declaration, or CDATA section. Returns the index just past the final
/// `>`. Newlines are permitted wherever whitespace is.
pub fn scan_html_tag(line: &[char], pos: usize) -> Option<usize> {
    if peek(line, pos) != '<' {
        return None;
    }
    let after = pos + 1;

    match peek(line, after) {
        '!' => {
            if peek(line, after + 1) == '-' && peek(line, after + 2) == '-' {
                return scan_html_comment(line, after + 3);
            }
            if line.len() > after + 7 && line[after + 1..after + 8] == ['[', 'C', 'D', 'A', 'T', 'A', '['] {
                // CDATA: ends at the first ]]>
                let mut i = after + 8;
                while i + 2 < line.len() {
                    if line[i] == ']' && line[i + 1] == ']' && line[i + 2] == '>' {
                        return Some(i + 3);
                    }
                    i += 1;
                }
                return None;
            }
            // Declaration: <! letters ... >
            if peek(line, after + 1).is_ascii_alphabetic() {
                let mut i = after + 1;
                while i < line.len() && line[i] != '>' {
                    i += 1;
                }
                if i < line.len() {
                    return Some(i + 1);
                }
            }
            None
        }
        '?' => {
            let mut i = after + 1;
            while i + 1 < line.len() {
                if line[i] == '?' && line[i + 1] == '>' {
                    return Some(i + 2);
                }
                i += 1;
            }
            None
        }
        '/' => {
            let (_, mut i) = tag_name_at(line, after + 1)?;
            while peek(line, i).is_whitespace() && i < line.len() {
                i += 1;
            }
            if peek(line, i) == '>' { Some(i + 1) } else { None }
        }
        _ => {
            let (_, mut i) = tag_name_at(line, after)?;
            // Attributes
            loop {
                let ws_start = i;
                while i < line.len() && line[i].is_whitespace() {
                    i += 1;
                }
                if peek(line, i) == '/' && peek(line, i + 1) == '>' {
                    return Some(i + 2);
                }
                if peek(line, i) == '>' {
                    return Some(i + 1);
                }
                // An attribute requires preceding whitespace
                if i == ws_start {
                    return None;
                }
                i = scan_attribute(line, i)?;
            }
        }
    }
}

/// Comment body scan, starting just after `<!--`. Follows the error-
/// tolerant rule: `<!-->` and `<!--->` close immediately; otherwise the
/// text may not start with `>` or `->`, contain `--`, or end with `-`.
fn scan_html_comment(line: &[char], body: usize) -> Option<usize> {
    if peek(line, body) == '>' {
        return Some(body + 1);
    }
    if peek(line, body) == '-' && peek(line, body + 1) == '>' {
        return Some(body + 2);
    }

    let mut i = body;
    while i + 2 < line.len() {
        if line[i] == '-' && line[i + 1] == '-' {
            return if line[i + 2] == '>' && i > body {
                Some(i + 3)
            } else {
                None
            };
        }
        i += 1;
    }
    None
}

fn scan_attribute(line: &[char], pos: usize) -> Option<usize> {
    let mut i = pos;
    let c = peek(line, i);
    if !c.is_ascii_alphabetic() && c != '_' && c != ':' {
        return None;
    }
    i += 1;
    loop {
        let c = peek(line, i);
        if c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-') {
            i += 1;
        } else {
            break;
        }
    }

    // Optional value
    let mut j = i;
    while j < line.len() && line[j].is_whitespace() {
        j += 1;
    }
    if peek(line, j) != '=' {
        return Some(i);
    }
    j += 1;
    while j < line.len() && line[j].is_whitespace() {
        j += 1;
    }

    match peek(line, j) {
        q @ ('"' | '\'') => {
            j += 1;
            while j < line.len() && line[j] != q {
                j += 1;
            }
            if j < line.len() { Some(j + 1) } else { None }
        }
        _ => {
            let start = j;
            while j < line.len()
                && !line[j].is_whitespace()
                && !matches!(line[j], '"' | '\'' | '=' | '<' | '>' | '`')
            {
                j += 1;
            }
            if j > start { Some(j) } else { None }
        }
    }
}

/// Absolute URI for autolinks: a 2–32 char scheme, a colon, then no
/// whitespace or angle brackets.
pub fn is_absolute_uri(text: &str) -> bool {
    let Some(colon) = text.find(':') else {
        return false;
    };
    let scheme = &text[..colon];
    if scheme.len() < 2 || scheme.len() > 32 {
        return false;
    }
    let mut chars = scheme.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
        return false;
    }
    text[colon + 1..]
        .chars()
        .all(|c| !c.is_whitespace() && c != '<' && c != '>')
}

/// Email autolink address, per the HTML5 input-type-email grammar
pub fn is_email_address(text: &str) -> bool {
    let Some(at) = text.find('@') else {
        return false;
    };
    let (local, domain) = (&text[..at], &text[at + 1..]);

    if local.is_empty()
        || !local.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '.' | '!'
                        | '#'
                        | '$'
                        | '%'
                        | '&'
                        | '\''
                        | '*'
                        | '+'
                        | '/'
                        | '='
                        | '?'
                        | '^'
                        | '_'
                        | '`'
                        | '{'
                        | '|'
                        | '}'
                        | '~'
                        | '-'
                )
        })
    {
        return false;
    }

    if domain.is_empty() {
        return false;
    }
    for part in domain.split('.') {
        if part.is_empty() || part.len() > 63 {
            return false;
        }
        if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }
    }
    true
}

/// Link label at `pos` (which must point at `[`): up to 999 chars between
/// brackets, backslash escapes honored, no unescaped nested `[`. Returns
/// the label text (without brackets) and the index past the closing `]`.
pub fn scan_link_label(line: &[char], pos: usize) -> Option<(String, usize)> {
    if peek(line, pos) != '[' {
        return None;
    }
    let mut i = pos + 1;
    let content_start = i;

    while i < line.len() {
        match line[i] {
            '\\' if i + 1 < line.len() => i += 2,
            '[' => return None,
            ']' => {
                if i - content_start > 999 {
                    return None;
                }
                let label: String = line[content_start..i].iter().collect();
                return Some((label, i + 1));
            }
            _ => i += 1,
        }
    }
    None
}

/// Link destination at `pos`: either `<...>` (no newlines, no unescaped
/// `<`) or a bare run with balanced parentheses and no whitespace or
/// control characters. Returns the raw destination (escapes unresolved,
/// angle brackets stripped) and the index past it.
pub fn scan_link_destination(line: &[char], pos: usize) -> Option<(String, usize)> {
    if peek(line, pos) == '<' {
        let mut i = pos + 1;
        while i < line.len() {
            match line[i] {
                '\\' if i + 1 < line.len() => i += 2,
                '>' => {
                    let dest: String = line[pos + 1..i].iter().collect();
                    return Some((dest, i + 1));
                }
                '<' | '\n' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut i = pos;
    let mut depth: i32 = 0;
    while i < line.len() {
        match line[i] {
            '\\' if i + 1 < line.len() => i += 2,
            '(' => {
                depth += 1;
                if depth > 32 {
                    return None;
                }
                i += 1;
            }
            ')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            c if c.is_whitespace() || c.is_ascii_control() => break,
            _ => i += 1,
        }
    }
    if depth != 0 {
        return None;
    }
    let dest: String = line[pos..i].iter().collect();
    Some((dest, i))
}

/// Link title at `pos`: `"..."`, `'...'`, or `(...)` with backslash
/// escapes. Returns the raw title body and the index past the closer.
pub fn scan_link_title(line: &[char], pos: usize) -> Option<(String, usize)> {
    let opener = peek(line, pos);
    let closer = match opener {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };

    let mut i = pos + 1;
    while i < line.len() {
        match line[i] {
            '\\' if i + 1 < line.len() => i += 2,
            c if c == closer => {
                let title: String = line[pos + 1..i].iter().collect();
                return Some((title, i + 1));
            }
            '(' if opener == '(' => return None,
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_thematic_break() {
        assert!(scan_thematic_break(&chars("***\n"), 0));
        assert!(scan_thematic_break(&chars("- - -\n"), 0));
        assert!(scan_thematic_break(&chars("_____\n"), 0));
        assert!(!scan_thematic_break(&chars("**\n"), 0));
        assert!(!scan_thematic_break(&chars("*-*\n"), 0));
        assert!(!scan_thematic_break(&chars("--- a\n"), 0));
    }

    #[test]
    fn test_atx_heading_start() {
        assert_eq!(scan_atx_heading_start(&chars("# foo\n"), 0), Some((1, 2)));
        assert_eq!(scan_atx_heading_start(&chars("###   x\n"), 0), Some((3, 6)));
        assert_eq!(scan_atx_heading_start(&chars("#\n"), 0), Some((1, 2)));
        assert_eq!(scan_atx_heading_start(&chars("#######\n"), 0), None);
        assert_eq!(scan_atx_heading_start(&chars("#foo\n"), 0), None);
    }

    #[test]
    fn test_setext_underline() {
        assert_eq!(scan_setext_underline(&chars("===\n"), 0), Some(1));
        assert_eq!(scan_setext_underline(&chars("-\n"), 0), Some(2));
        assert_eq!(scan_setext_underline(&chars("--  \n"), 0), Some(2));
        assert_eq!(scan_setext_underline(&chars("== =\n"), 0), None);
    }

    #[test]
    fn test_code_fences() {
        assert_eq!(scan_open_code_fence(&chars("```rust\n"), 0), Some(('`', 3)));
        assert_eq!(scan_open_code_fence(&chars("~~~~\n"), 0), Some(('~', 4)));
        // Backtick in a backtick fence's info string
        assert_eq!(scan_open_code_fence(&chars("``` a`b\n"), 0), None);
        assert_eq!(scan_open_code_fence(&chars("``\n"), 0), None);

        assert_eq!(scan_close_code_fence(&chars("```\n"), 0, '`'), Some(3));
        assert_eq!(scan_close_code_fence(&chars("````   \n"), 0, '`'), Some(4));
        assert_eq!(scan_close_code_fence(&chars("``` x\n"), 0, '`'), None);
    }

    #[test]
    fn test_html_block_start() {
        assert_eq!(scan_html_block_start(&chars("<pre>\n"), 0, false), Some(1));
        assert_eq!(scan_html_block_start(&chars("<!-- x\n"), 0, false), Some(2));
        assert_eq!(scan_html_block_start(&chars("<?php\n"), 0, false), Some(3));
        assert_eq!(scan_html_block_start(&chars("<!DOCTYPE html>\n"), 0, false), Some(4));
        assert_eq!(scan_html_block_start(&chars("<![CDATA[\n"), 0, false), Some(5));
        assert_eq!(scan_html_block_start(&chars("<div class=x>\n"), 0, false), Some(6));
        assert_eq!(scan_html_block_start(&chars("</table>\n"), 0, false), Some(6));
        assert_eq!(scan_html_block_start(&chars("<a href=\"x\">\n"), 0, false), Some(7));
        // Type 7 may not interrupt a paragraph
        assert_eq!(scan_html_block_start(&chars("<a href=\"x\">\n"), 0, true), None);
        assert_eq!(scan_html_block_start(&chars("<a href=\"x\"> y\n"), 0, false), None);
    }

    #[test]
    fn test_html_block_end() {
        assert!(scan_html_block_end(&chars("x </SCRIPT> y\n"), 1));
        assert!(scan_html_block_end(&chars("done -->\n"), 2));
        assert!(!scan_html_block_end(&chars("not yet\n"), 2));
    }

    #[test]
    fn test_html_tag() {
        assert_eq!(scan_html_tag(&chars("<a>"), 0), Some(3));
        assert_eq!(scan_html_tag(&chars("<a href='x' >rest"), 0), Some(13));
        assert_eq!(scan_html_tag(&chars("<br/>"), 0), Some(5));
        assert_eq!(scan_html_tag(&chars("</p >"), 0), Some(5));
        assert_eq!(scan_html_tag(&chars("<!-- c -->"), 0), Some(10));
        assert_eq!(scan_html_tag(&chars("<2bad>"), 0), None);
        assert_eq!(scan_html_tag(&chars("<a h*ref>"), 0), None);
    }

    #[test]
    fn test_autolink_classifiers() {
        assert!(is_absolute_uri("http://example.com"));
        assert!(is_absolute_uri("made-up-scheme://x,y"));
        assert!(!is_absolute_uri("http://with space"));
        assert!(!is_absolute_uri("m:no"));
        assert!(is_email_address("foo@bar.example.com"));
        assert!(!is_email_address("foo@bar@baz"));
        assert!(!is_email_address("foo@-bad.com"));
    }

    #[test]
    fn test_link_label() {
        assert_eq!(
            scan_link_label(&chars("[foo]"), 0),
            Some(("foo".to_string(), 5))
        );
        assert_eq!(
            scan_link_label(&chars("[a\\]b]"), 0),
            Some(("a\\]b".to_string(), 6))
        );
        assert_eq!(scan_link_label(&chars("[a[b]"), 0), None);
        assert_eq!(scan_link_label(&chars("[open"), 0), None);
    }

    #[test]
    fn test_link_destination() {
        assert_eq!(
            scan_link_destination(&chars("/url rest"), 0),
            Some(("/url".to_string(), 4))
        );
        assert_eq!(
            scan_link_destination(&chars("<my url>"), 0),
            Some(("my url".to_string(), 8))
        );
        assert_eq!(
            scan_link_destination(&chars("a(b)c d"), 0),
            Some(("a(b)c".to_string(), 5))
        );
        assert_eq!(scan_link_destination(&chars("a(b"), 0), None);
    }

    #[test]
    fn test_link_title() {
        assert_eq!(
            scan_link_title(&chars("\"a b\""), 0),
            Some(("a b".to_string(), 5))
        );
        assert_eq!(
            scan_link_title(&chars("(t)"), 0),
            Some(("t".to_string(), 3))
        );
        assert_eq!(scan_link_title(&chars("\"open"), 0), None);
    }
}
