//! Edge case tests for fritos-html
//!
//! Malformed and minimal markup still yields a usable document.

use fritos_html::{parse_html, HtmlParser};

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty_string() {
    let doc = parse_html("").unwrap();
    assert!(doc.document_element().is_some());
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_only_whitespace() {
    let doc = parse_html("   \t\n\r\n   ").unwrap();
    let body = doc.body().unwrap();
    assert!(doc.tree().child_ids(body).is_empty());
}

#[test]
fn test_parse_only_doctype() {
    let doc = parse_html("<!DOCTYPE html>").unwrap();
    let first = doc.tree().child_ids(doc.tree().root())[0];
    assert!(!doc.tree().is_element(first));
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_null_bytes() {
    let doc = parse_html("Hello\0World").unwrap();
    assert!(doc.tree().text_content(doc.body().unwrap()).contains("Hello"));
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse_html("<div><p><span>text").unwrap();
    assert_eq!(doc.select_all("div p span").unwrap().len(), 1);
}

#[test]
fn test_parse_extra_closing_tags() {
    let doc = parse_html("<div></div></div></div>").unwrap();
    assert_eq!(doc.select_all("div").unwrap().len(), 1);
}

#[test]
fn test_uppercase_markup_is_normalized() {
    let doc = parse_html(r#"<DIV ID="Box" CLASS="A"><SPAN>x</SPAN></DIV>"#).unwrap();
    let found = doc.select_all("div#Box.A > span").unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn test_duplicate_ids_first_wins() {
    let doc = parse_html(r#"<p id="dup">one</p><p id="dup">two</p>"#).unwrap();
    let first = doc.get_element_by_id("dup").unwrap();
    assert_eq!(doc.tree().text_content(first), "one");
}

#[test]
fn test_deep_nesting() {
    let depth = 200;
    let html = format!("{}leaf{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let doc = HtmlParser::new().parse(&html).unwrap();
    assert_eq!(doc.select_all("div").unwrap().len(), depth);
}

#[test]
fn test_form_controls_keep_their_values() {
    let html = r#"
        <form>
            <input name="user" value="ann">
            <textarea name="bio">Hello there</textarea>
            <select name="pick"><option>a</option><option selected value="B">b</option></select>
        </form>"#;
    let doc = parse_html(html).unwrap();

    let input = doc.select_all("input").unwrap()[0];
    let area = doc.select_all("textarea").unwrap()[0];
    let select = doc.select_all("select").unwrap()[0];
    assert_eq!(doc.value(input).as_deref(), Some("ann"));
    assert_eq!(doc.value(area).as_deref(), Some("Hello there"));
    assert_eq!(doc.value(select).as_deref(), Some("B"));
}
