// Tests for caption container location and mutation filtering.
//
// Paused-clock tests: the locate retry and the debounce window elapse via
// auto-advancing timers.

use anyhow::Result;
use caption_translator::{CaptionEvent, CaptionWatcher, Document, NodeId, WatcherConfig};
use std::time::Duration;
use tokio::sync::mpsc;

struct Page {
    document: Document,
    caption_text: NodeId,
    anchor: NodeId,
}

fn page_with_container(label: &str) -> Result<Page> {
    let document = Document::new("main");
    let container = document.create_element("div");
    document.set_attr(container, "aria-label", label);
    document.append_child(document.root(), container)?;

    let anchor = document.create_element("div");
    let caption_text = document.create_text("");
    document.append_child(anchor, caption_text)?;
    document.append_child(container, anchor)?;

    Ok(Page {
        document,
        caption_text,
        anchor,
    })
}

/// Run every ready task to idle, then step the clock a hair
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn emits_debounced_caption_event_with_anchor() -> Result<()> {
    let page = page_with_container("Captions")?;
    let (tx, mut rx) = mpsc::channel::<CaptionEvent>(8);
    let _watcher = CaptionWatcher::start(page.document.clone(), WatcherConfig::default(), tx);
    settle().await;

    // Character-by-character caption typing.
    for text in ["H", "He", "Hello world"] {
        page.document.set_text(page.caption_text, text);
        settle().await;
    }

    let event = rx.recv().await.expect("one coalesced event");
    assert_eq!(event.raw_text, "Hello world");
    assert_eq!(event.source, page.anchor);
    assert!(rx.try_recv().is_err(), "burst yields a single event");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn localized_container_labels_are_tried_in_order() -> Result<()> {
    let page = page_with_container("Untertitel")?;
    let (tx, mut rx) = mpsc::channel::<CaptionEvent>(8);
    let _watcher = CaptionWatcher::start(page.document.clone(), WatcherConfig::default(), tx);
    settle().await;

    page.document.set_text(page.caption_text, "Guten Morgen zusammen");
    let event = rx.recv().await.expect("event from localized container");
    assert_eq!(event.raw_text, "Guten Morgen zusammen");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn retries_until_container_appears() -> Result<()> {
    let document = Document::new("main");
    let (tx, mut rx) = mpsc::channel::<CaptionEvent>(8);
    let _watcher = CaptionWatcher::start(document.clone(), WatcherConfig::default(), tx);

    // A few fruitless retry rounds.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rx.try_recv().is_err());

    // The container shows up; the next retry round should find it.
    let container = document.create_element("div");
    document.set_attr(container, "aria-label", "Captions");
    document.append_child(document.root(), container)?;
    let anchor = document.create_element("div");
    let caption_text = document.create_text("");
    document.append_child(anchor, caption_text)?;
    document.append_child(container, anchor)?;
    tokio::time::sleep(Duration::from_millis(1100)).await;

    document.set_text(caption_text, "Hello world");
    let event = rx.recv().await.expect("event after late container");
    assert_eq!(event.raw_text, "Hello world");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn ignores_mutations_outside_the_container() -> Result<()> {
    let page = page_with_container("Captions")?;

    // Text node elsewhere in the page.
    let aside = page.document.create_element("div");
    let stray = page.document.create_text("chrome noise");
    page.document.append_child(aside, stray)?;
    page.document.append_child(page.document.root(), aside)?;

    let (tx, mut rx) = mpsc::channel::<CaptionEvent>(8);
    let _watcher = CaptionWatcher::start(page.document.clone(), WatcherConfig::default(), tx);
    settle().await;

    page.document.set_text(stray, "still noise");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());

    page.document.set_text(page.caption_text, "Hello world");
    let event = rx.recv().await.expect("caption event");
    assert_eq!(event.raw_text, "Hello world");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_silences_events() -> Result<()> {
    let page = page_with_container("Captions")?;
    let (tx, mut rx) = mpsc::channel::<CaptionEvent>(8);
    let mut watcher = CaptionWatcher::start(page.document.clone(), WatcherConfig::default(), tx);
    settle().await;

    watcher.stop();
    watcher.stop();
    assert!(!watcher.is_running());

    page.document.set_text(page.caption_text, "Hello world");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
    Ok(())
}
