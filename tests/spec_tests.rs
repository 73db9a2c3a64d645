use serde::Deserialize;
use std::fs;
use tidemark::markdown_to_html;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SpecTest {
    markdown: String,
    html: String,
    example: u32,
    start_line: u32,
    end_line: u32,
    section: String,
}

#[test]
fn commonmark_spec_tests() {
    let test_data = fs::read_to_string("tests/data/tests.json").expect("Failed to read tests.json");

    let tests: Vec<SpecTest> =
        serde_json::from_str(&test_data).expect("Failed to parse tests.json");

    let mut passed = 0;
    let mut failed = 0;
    let mut failures = Vec::new();

    for test in tests.iter() {
        let result = markdown_to_html(&test.markdown);

        if result == test.html {
            passed += 1;
        } else {
            failed += 1;
            failures.push(test.example);

            eprintln!("\nTest {} failed ({})", test.example, test.section);
            eprintln!("  Input: {:?}", test.markdown);
            eprintln!("  Expected: {:?}", test.html);
            eprintln!("  Got: {:?}", result);
        }
    }

    eprintln!("\nSpec test results: {} passed, {} failed", passed, failed);
    assert_eq!(failed, 0, "failing examples: {:?}", failures);
}
