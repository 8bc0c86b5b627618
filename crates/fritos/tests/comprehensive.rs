//! Comprehensive tests for fritos
//!
//! Selection behaviour end to end on parsed documents.

use std::cell::Cell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use fritos::*;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>fritos</title></head>
<body>
  <main id="app" class="shell">
    <section class="card" id="first">
      <div class="wrap">
        <p class="note">one</p>
        <p class="note">two</p>
      </div>
    </section>
    <section class="card" id="second">
      <div class="wrap">
        <p class="note">three</p>
      </div>
    </section>
  </main>
  <form id="signup">
    <input name="email" value="">
    <input name="password" value="secret">
    <input name="confirm" value="secrets">
  </form>
</body>
</html>"#;

fn page() -> Document {
    parse_html(PAGE).unwrap()
}

fn ids(doc: &Document, selection: &Selection) -> Vec<String> {
    selection
        .iter()
        .map(|id| {
            let el = doc.element(id).unwrap();
            el.id().map(str::to_string).unwrap_or_else(|| el.tag_name().to_string())
        })
        .collect()
}

// ============================================================================
// TRAVERSAL
// ============================================================================

#[test]
fn test_parent_is_deduplicated_in_first_seen_order() {
    let doc = page();
    let notes = select(&doc, ".note");
    assert_eq!(notes.len(), 3);

    let wraps = notes.parent(&doc, None);
    assert_eq!(wraps.len(), 2);
    assert_eq!(wraps, select(&doc, ".wrap"));
}

#[test]
fn test_parent_with_shorthand_filter() {
    let doc = page();
    let wraps = select(&doc, ".wrap");

    assert_eq!(ids(&doc, &wraps.parent(&doc, Some("#second"))), vec!["second"]);
    assert_eq!(wraps.parent(&doc, Some(".card")).len(), 2);
    assert_eq!(wraps.parent(&doc, Some("SECTION")).len(), 2);
    assert!(wraps.parent(&doc, Some("main")).is_empty());
}

#[test]
fn test_ancestor_never_includes_root_element() {
    let doc = page();
    let note = select(&doc, ".note");

    let all = note.ancestor(&doc, None);
    assert_eq!(ids(&doc, &all), vec!["div", "first", "app", "body", "div", "second"]);
    assert!(note.ancestor(&doc, Some("html")).is_empty());
    assert_eq!(ids(&doc, &note.ancestor(&doc, Some(".card"))), vec!["first", "second"]);
}

#[test]
fn test_ancestor_uses_shorthand_only() {
    let doc = page();
    let note = select(&doc, ".note");
    // A full CSS selector is treated as a tag name and matches nothing
    assert!(note.ancestor(&doc, Some("section.card")).is_empty());
}

#[test]
fn test_find_concatenates_without_dedup() {
    let doc = page();
    let scopes = select(&doc, vec![
        doc.get_element_by_id("app").unwrap(),
        doc.get_element_by_id("first").unwrap(),
    ]);

    let found = scopes.find(&doc, "p");
    assert_eq!(found.len(), 5); // three under #app, then two again under #first
    assert_eq!(found.get(0), found.get(3));
}

#[test]
fn test_find_with_complex_selector() {
    let doc = page();
    let found = select(&doc, "#app").find(&doc, "section:last-child .note");
    assert_eq!(found.len(), 1);
    assert_eq!(doc.tree().text_content(found.first().unwrap()), "three");
}

// ============================================================================
// MUTATION
// ============================================================================

#[test]
fn test_raise_moves_up_n_levels() {
    let mut doc = page();
    let first_note = select(&doc, ".note").first().unwrap();
    let wrap = doc.tree().parent(first_note).unwrap();
    let section = doc.get_element_by_id("first").unwrap();
    let main = doc.get_element_by_id("app").unwrap();

    select(&doc, first_note).raise(&mut doc, 1);
    assert_eq!(doc.tree().parent(first_note), Some(section));
    assert_eq!(doc.tree().next_sibling(first_note), Some(wrap));

    select(&doc, first_note).raise(&mut doc, 1);
    assert_eq!(doc.tree().parent(first_note), Some(main));
    assert_eq!(doc.tree().next_sibling(first_note), Some(section));
}

#[test]
fn test_raise_several_levels_at_once() {
    let mut doc = page();
    let note = select(&doc, "#second .note").first().unwrap();
    let main = doc.get_element_by_id("app").unwrap();
    let second = doc.get_element_by_id("second").unwrap();

    select(&doc, note).raise(&mut doc, 2);
    assert_eq!(doc.tree().parent(note), Some(main));
    assert_eq!(doc.tree().next_sibling(note), Some(second));
}

#[test]
fn test_raise_zero_changes_nothing() {
    let mut doc = page();
    let before: Vec<_> = doc.tree().descendants(doc.tree().root());
    select(&doc, ".note").raise(&mut doc, 0);
    assert_eq!(doc.tree().descendants(doc.tree().root()), before);
}

#[test]
fn test_prune_unwraps_parent_keeping_order() {
    let mut doc = page();
    let section = doc.get_element_by_id("first").unwrap();
    let notes = select(&doc, "#first .note");
    let wrap = doc.tree().parent(notes.first().unwrap()).unwrap();

    notes.prune(&mut doc);

    assert!(!doc.is_connected(wrap));
    assert_eq!(doc.tree().element_children(section), notes.elements().to_vec());
    // The shared parent is unwrapped once; the section survives
    assert!(doc.is_connected(section));
}

#[test]
fn test_prune_keeps_siblings_in_place() {
    let mut doc = parse_html("<div id='outer'><b>x</b><span><i>1</i><i>2</i><i>3</i></span><u>y</u></div>").unwrap();
    let middle = select(&doc, "i:nth-child(2)");
    middle.prune(&mut doc);

    let outer = doc.get_element_by_id("outer").unwrap();
    let tags: Vec<_> = doc
        .tree()
        .element_children(outer)
        .into_iter()
        .map(|c| doc.tree().tag_name(c).unwrap().to_string())
        .collect();
    assert_eq!(tags, vec!["b", "i", "i", "i", "u"]);
}

#[test]
fn test_attrs_read_back() {
    let mut doc = page();
    let cards = select(&doc, ".card");
    cards.attrs(&mut doc, "data-state", "open");

    for id in cards.iter() {
        assert_eq!(doc.get_attribute(id, "data-state"), Some("open"));
    }
    assert_eq!(select(&doc, "[data-state=open]"), cards);
}

#[test]
fn test_hide_sets_display_none() {
    let mut doc = page();
    select(&doc, "p").hide(&mut doc);
    for id in select(&doc, "p").iter() {
        assert_eq!(doc.style_property(id, "display"), Some("none"));
    }
}

#[test]
fn test_val_get_and_set() {
    let mut doc = page();
    let password = select(&doc, "input[name=password]");
    assert_eq!(password.val(&doc).as_deref(), Some("secret"));

    let inputs = select(&doc, "input");
    inputs.set_val(&mut doc, "same");
    for id in inputs.iter() {
        assert_eq!(doc.value(id).as_deref(), Some("same"));
    }
    assert_eq!(select(&doc, "#nothing").val(&doc), None);
}

#[test]
fn test_chaining() {
    let mut doc = page();
    let notes = select(&doc, ".note");
    notes
        .attrs(&mut doc, "role", "note")
        .hide(&mut doc)
        .set_val(&mut doc, "x");

    let id = notes.first().unwrap();
    assert_eq!(doc.get_attribute(id, "role"), Some("note"));
    assert_eq!(doc.style_property(id, "display"), Some("none"));
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_on_event_shared_handler() {
    let mut doc = page();
    let clicks = Rc::new(Cell::new(0));
    let c = clicks.clone();
    let notes = select(&doc, ".note");
    notes.on_event(&mut doc, "click", move |doc, e| {
        c.set(c.get() + 1);
        doc.set_attribute(e.target, "data-clicked", "1").unwrap();
    });

    for id in notes.iter() {
        doc.dispatch_event(id, Event::bubbling("click"));
    }
    assert_eq!(clicks.get(), 3);
    assert_eq!(select(&doc, "[data-clicked]").len(), 3);

    // Persistent: fires again
    doc.dispatch_event(notes.first().unwrap(), Event::bubbling("click"));
    assert_eq!(clicks.get(), 4);
}

// ============================================================================
// ANIMATION
// ============================================================================

fn style_count(doc: &Document) -> usize {
    doc.select_all("style").unwrap().len()
}

#[test]
fn test_animate_injects_sheet_and_shorthand() {
    let mut doc = page();
    let note = select(&doc, "#first .note").first().unwrap();
    select(&doc, note).animate(
        &mut doc,
        &[("backgroundColor", "red"), ("opacity", "0.5")],
        &AnimationOptions::default().duration(200.0),
    );

    let shorthand = doc.style_property(note, "animation").unwrap().to_string();
    let name = shorthand.split_whitespace().next().unwrap().to_string();
    assert!(name.starts_with("fritos-animation-"));
    assert!(shorthand.ends_with("200ms linear 0s 1 none"));

    let sheet = doc.select_all("head > style").unwrap()[0];
    let css = doc.tree().text_content(sheet);
    assert!(css.contains(&format!("@keyframes {}", name)));
    assert!(css.contains("background-color: red;"));
}

#[test]
fn test_animation_cleanup_on_completion() {
    let mut doc = page();
    let notes = select(&doc, "#first .note");
    notes.animate(&mut doc, &[("opacity", "0")], &AnimationOptions::default());
    assert_eq!(style_count(&doc), 2);

    let names: Vec<String> = notes
        .iter()
        .map(|id| doc.running_animation(id).unwrap().name.clone())
        .collect();
    assert_ne!(names[0], names[1]);

    // Completing one element leaves the other untouched
    let (a, b) = (notes.get(0).unwrap(), notes.get(1).unwrap());
    doc.dispatch_event(a, Event::animation_end(&names[0], 1.0));
    assert_eq!(style_count(&doc), 1);
    assert_eq!(doc.style_property(a, "animation"), None);
    assert!(doc.style_property(b, "animation").is_some());

    doc.advance_animations(Duration::from_millis(1000));
    assert_eq!(style_count(&doc), 0);
    assert_eq!(doc.style_property(b, "animation"), None);
    assert_eq!(doc.running_animations(), 0);
}

#[test]
fn test_animate_then_runs_callback_once_per_element() {
    let mut doc = page();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let notes = select(&doc, ".note");
    notes.animate_then(&mut doc, &[("opacity", "0")], &AnimationOptions::default().duration(50.0), move |doc, id| {
        c.set(c.get() + 1);
        doc.set_attribute(id, "data-done", "yes").unwrap();
    });

    doc.advance_animations(Duration::from_millis(60));
    doc.advance_animations(Duration::from_millis(60));
    for id in notes.iter() {
        doc.dispatch_event(id, Event::animation_end("whatever", 0.0));
    }

    assert_eq!(calls.get(), 3);
    assert_eq!(select(&doc, "[data-done=yes]").len(), 3);
}

#[test]
fn test_reanimating_cancels_previous() {
    let mut doc = page();
    let note = select(&doc, ".note").first().unwrap();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();

    select(&doc, note).animate_then(&mut doc, &[("opacity", "0")], &AnimationOptions::default(), move |_, _| {
        c.set(c.get() + 1);
    });
    select(&doc, note).animate(&mut doc, &[("opacity", "1")], &AnimationOptions::default());

    assert_eq!(style_count(&doc), 1);
    assert!(doc.finish_animation(note));
    assert_eq!(calls.get(), 0);
    assert_eq!(style_count(&doc), 0);
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_required_validation() {
    let mut doc = page();
    let email = select(&doc, "input[name=email]");
    let rules = FieldRules::new().required();

    assert_eq!(email.validation(&doc, &rules), ValidationResult {
        valid: false,
        errors: vec!["This field is required".to_string()],
    });

    email.set_val(&mut doc, "ok");
    assert_eq!(email.validation(&doc, &rules), ValidationResult { valid: true, errors: vec![] });
}

#[test]
fn test_validation_target_checks() {
    let doc = page();
    let rules = FieldRules::new().required();
    assert_eq!(select(&doc, "#missing").validation(&doc, &rules).errors, vec!["No element found"]);
    assert_eq!(select(&doc, "main").validation(&doc, &rules).errors, vec!["Element is not a valid input field"]);
}

#[test]
fn test_validate_form_first_failure_per_field() {
    let doc = page();
    let rules = FormRules::new()
        .rule("email", FormRule::required("Email is required"))
        .rule("email", FormRule::pattern("@", "Email needs an @"))
        .rule("password", FormRule::min_length(4, "Too short"))
        .rule("confirm", FormRule::matches_field("password", "Passwords differ"));

    let errors = select(&doc, "#signup").validate_form(&doc, &rules);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));
    assert_eq!(errors.get("confirm").map(String::as_str), Some("Passwords differ"));
    assert!(!errors.contains_key("password"));
}

#[test]
fn test_validate_form_on_empty_selection() {
    let doc = page();
    let rules = FormRules::new().rule("email", FormRule::required("x"));
    assert!(select(&doc, "#nope").validate_form(&doc, &rules).is_empty());
}

// ============================================================================
// REMOTE
// ============================================================================

#[test]
fn test_remote_call_times_out_once() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/never", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel::<Result<RemoteData, RemoteError>>();
    let ok_tx = tx.clone();

    Selection::remote_call(
        &url,
        RemoteCallOptions::new()
            .timeout(Duration::from_millis(200))
            .on_success(move |data| {
                let _ = ok_tx.send(Ok(data));
            })
            .on_error(move |e| {
                let _ = tx.send(Err(e));
            }),
    );

    let first = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(matches!(first, Err(RemoteError::Timeout(_))));
    assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    drop(listener);
}
