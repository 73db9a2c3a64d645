//! End-to-end checks of the pipeline's guaranteed properties.

use pretty_assertions::assert_eq;
use tidemark::tree::NodeEdge;
use tidemark::{
    Options, markdown_to_html, markdown_to_html_with_options, parse_document, parse_document_bytes,
    renderer::HtmlRenderer,
};

/// Parsing never fails, whatever the bytes
#[test]
fn totality_on_hostile_inputs() {
    let inputs: Vec<Vec<u8>> = vec![
        b"".to_vec(),
        b"\n\n\n".to_vec(),
        b"\xFF\xFE\x80garbage\x00".to_vec(),
        b"\xED\xA0\x80 surrogate".to_vec(),
        "> ".repeat(600).into_bytes(),
        "[".repeat(3000).into_bytes(),
        "*".repeat(3000).into_bytes(),
        "`".repeat(999).into_bytes(),
        b"[a](b".to_vec(),
        b"```\nnever closed".to_vec(),
        b"- \n- \n- \n".to_vec(),
        b"[]: x\n".to_vec(),
    ];

    for input in inputs {
        let tree = parse_document_bytes(&input, Options::default());
        // rendering the resulting tree must also hold up
        let _ = HtmlRenderer::new().render(&tree);
    }
}

/// HTML block passthrough is stable under re-parsing
#[test]
fn rerender_idempotence_on_html_passthrough() {
    for input in [
        "<div>\nkeep\n</div>\n",
        "<!-- note -->\n",
        "<table>\n<tr><td>x</td></tr>\n</table>\n",
    ] {
        let once = markdown_to_html(input);
        let twice = markdown_to_html(&once);
        assert_eq!(once, twice);
    }
}

/// Resolved spans are properly nested: the event stream is balanced, with
/// every exit matching the most recent enter
#[test]
fn emphasis_spans_never_cross() {
    let inputs = [
        "*a **b* c**\n",
        "**a *b** c*\n",
        "*a _b* c_\n",
        "***x** y*\n",
        "*x [y*](z)\n",
    ];
    for input in inputs {
        let tree = parse_document(input, Options::default());
        let mut stack = Vec::new();
        for edge in tree.iter() {
            match edge {
                NodeEdge::Enter(id) => {
                    if !tree.kind(id).is_atom() {
                        stack.push(id);
                    }
                }
                NodeEdge::Exit(id) => assert_eq!(stack.pop(), Some(id)),
            }
        }
        assert!(stack.is_empty());
    }

    assert_eq!(
        markdown_to_html("*foo **bar** baz*\n"),
        "<p><em>foo <strong>bar</strong> baz</em></p>\n"
    );
}

/// The first definition of a label wins
#[test]
fn reference_definition_precedence() {
    assert_eq!(
        markdown_to_html("[x]: /a\n[x]: /b\n\n[x]\n"),
        "<p><a href=\"/a\">x</a></p>\n"
    );
}

#[test]
fn tight_and_loose_lists() {
    assert_eq!(
        markdown_to_html("- a\n- b\n"),
        "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
    );
    assert_eq!(
        markdown_to_html("- a\n\n- b\n"),
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
    );
}

#[test]
fn multiple_of_three_rule() {
    assert_eq!(
        markdown_to_html("foo***bar***baz\n"),
        "<p>foo<em><strong>bar</strong></em>baz</p>\n"
    );
    assert_eq!(markdown_to_html("a***b\n"), "<p>a***b</p>\n");
    // runs of 1 and 2 summing to 3 cannot pair
    assert_eq!(
        markdown_to_html("*foo**bar**baz*\n"),
        "<p><em>foo<strong>bar</strong>baz</em></p>\n"
    );
}

#[test]
fn safe_mode_url_filtering() {
    let safe = Options {
        safe: true,
        ..Options::default()
    };
    assert_eq!(
        markdown_to_html_with_options("[x](javascript:alert(1))\n", safe),
        "<p><a href=\"\">x</a></p>\n"
    );
    assert_eq!(
        markdown_to_html("[x](javascript:alert(1))\n"),
        "<p><a href=\"javascript:alert(1)\">x</a></p>\n"
    );
    assert_eq!(
        markdown_to_html_with_options("<span>raw</span>\n", safe),
        "<p><!-- raw HTML omitted -->raw<!-- raw HTML omitted --></p>\n"
    );
}

#[test]
fn smart_punctuation_rewrites() {
    let smart = Options {
        smart: true,
        ..Options::default()
    };
    assert_eq!(
        markdown_to_html_with_options("\"Hello\" -- world...\n", smart),
        "<p>\u{201C}Hello\u{201D} \u{2013} world\u{2026}</p>\n"
    );
    assert_eq!(
        markdown_to_html_with_options("don't\n", smart),
        "<p>don\u{2019}t</p>\n"
    );
}

#[test]
fn hardbreaks_option() {
    let hard = Options {
        hardbreaks: true,
        ..Options::default()
    };
    assert_eq!(
        markdown_to_html_with_options("a\nb\n", hard),
        "<p>a<br />\nb</p>\n"
    );
}

#[test]
fn sourcepos_option() {
    let sp = Options {
        sourcepos: true,
        ..Options::default()
    };
    assert_eq!(
        markdown_to_html_with_options("# hi\n", sp),
        "<h1 data-sourcepos=\"1:1-1:4\">hi</h1>\n"
    );
}
