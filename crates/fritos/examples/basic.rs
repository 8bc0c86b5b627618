//! Walk through the selection API on a small page.
//!
//! Run with `RUST_LOG=debug` to see the library's own logging. Pass a URL
//! as the first argument to also try a remote call.

use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use fritos::{
    parse_html, select, AnimationOptions, Event, FieldRules, RemoteCallOptions, RemoteData, Selection,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<html>
<body>
  <ul id="todo">
    <li class="item">write docs</li>
    <li class="item done">ship it</li>
  </ul>
  <form id="login">
    <input name="user" value="">
  </form>
</body>
</html>"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut doc = parse_html(PAGE)?;

    // Traversal
    let items = select(&doc, ".item");
    let lists = items.parent(&doc, Some("ul"));
    info!("{} items under {} list(s)", items.len(), lists.len());

    // Mutation
    select(&doc, ".done").hide(&mut doc).attrs(&mut doc, "aria-hidden", "true");

    // Events
    items.on_event(&mut doc, "click", |doc, e| {
        let text = doc.tree().text_content(e.target);
        info!("clicked {:?}", text);
    });
    if let Some(first) = items.first() {
        doc.dispatch_event(first, Event::bubbling("click"));
    }

    // Animation, driven by the document timeline
    items.animate_then(
        &mut doc,
        &[("opacity", "0.5"), ("backgroundColor", "yellow")],
        &AnimationOptions::default().duration(300.0).easing("ease-in"),
        |doc, id| info!("animation finished on <{}>", doc.tree().tag_name(id).unwrap_or("?")),
    );
    let finished = doc.advance_animations(Duration::from_millis(300));
    info!("{} animations finished, {} still running", finished, doc.running_animations());

    // Validation
    let user = select(&doc, "input[name=user]");
    let rules = FieldRules::new().required().min_length(3);
    info!("empty user: {:?}", user.validation(&doc, &rules));
    user.set_val(&mut doc, "ann");
    info!("filled user: {:?}", user.validation(&doc, &rules));

    // Remote call
    if let Some(url) = std::env::args().nth(1) {
        let (tx, rx) = mpsc::channel();
        let err_tx = tx.clone();
        Selection::remote_call(
            &url,
            RemoteCallOptions::new()
                .timeout_secs(10)
                .on_success(move |data| {
                    let _ = tx.send(Ok(data));
                })
                .on_error(move |e| {
                    let _ = err_tx.send(Err(e));
                }),
        );
        match rx.recv_timeout(Duration::from_secs(20))? {
            Ok(RemoteData::Json(value)) => info!("JSON response: {}", value),
            Ok(RemoteData::Text(text)) => info!("text response ({} bytes)", text.len()),
            Err(e) => info!("remote call failed: {}", e),
        }
    }

    Ok(())
}
