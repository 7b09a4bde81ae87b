// Tests for the heuristic transcript extractor, structural and fallback
// passes, against hand-built caption container shapes.

use anyhow::Result;
use caption_translator::{Document, ExtractorConfig, NodeId, TranscriptExtractor};

/// Container shaped like the host page's caption area
fn caption_container(document: &Document) -> Result<NodeId> {
    let container = document.create_element("div");
    document.set_attr(container, "aria-label", "Captions");
    document.append_child(document.root(), container)?;
    Ok(container)
}

/// One message: a speaker child (avatar + name span) and a content child
fn add_message(
    document: &Document,
    container: NodeId,
    speaker: &str,
    text: &str,
) -> Result<NodeId> {
    let message = document.create_element("div");

    let speaker_child = document.create_element("div");
    let avatar = document.create_element("img");
    let name = document.create_element("span");
    let name_text = document.create_text(speaker);
    document.append_child(name, name_text)?;
    document.append_child(speaker_child, avatar)?;
    document.append_child(speaker_child, name)?;

    let content_child = document.create_element("div");
    let content_text = document.create_text(text);
    document.append_child(content_child, content_text)?;

    document.append_child(message, speaker_child)?;
    document.append_child(message, content_child)?;
    document.append_child(container, message)?;
    Ok(message)
}

#[test]
fn extracts_speaker_and_utterance() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    add_message(&document, container, "Alice", "Hi there")?;

    let extractor = TranscriptExtractor::default();
    let lines = extractor.extract(&document, container);

    assert_eq!(lines, vec!["Alice: Hi there".to_string()]);
    Ok(())
}

#[test]
fn messages_come_out_in_document_order() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    add_message(&document, container, "Alice", "Hi there")?;
    add_message(&document, container, "Bob", "Hello Alice nice to see you")?;

    let lines = TranscriptExtractor::default().extract(&document, container);

    assert_eq!(
        lines,
        vec![
            "Alice: Hi there".to_string(),
            "Bob: Hello Alice nice to see you".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn skips_children_containing_buttons() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;

    // A control row shaped exactly like a message, but holding a button.
    let controls = add_message(&document, container, "System", "Turn off captions now")?;
    let button = document.create_element("button");
    document.append_child(controls, button)?;

    add_message(&document, container, "Alice", "Hi there")?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(lines, vec!["Alice: Hi there".to_string()]);
    Ok(())
}

#[test]
fn rejects_url_like_and_single_word_utterances() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    add_message(&document, container, "Alice", "Hi there")?;
    add_message(&document, container, "Bob", "see http://example.com for details")?;
    add_message(&document, container, "Carol", "ok")?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(lines, vec!["Alice: Hi there".to_string()]);
    Ok(())
}

#[test]
fn rejects_utterance_equal_to_speaker_label() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    add_message(&document, container, "Alice Jones", "Alice Jones")?;
    add_message(&document, container, "Bob", "Hi there")?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(lines, vec!["Bob: Hi there".to_string()]);
    Ok(())
}

#[test]
fn speaker_label_falls_back_to_short_leaf_text() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;

    // Speaker child without a span: avatar plus a bare name div.
    let message = document.create_element("div");
    let speaker_child = document.create_element("div");
    let avatar = document.create_element("img");
    let name = document.create_element("div");
    let name_text = document.create_text("Bob");
    document.append_child(name, name_text)?;
    document.append_child(speaker_child, avatar)?;
    document.append_child(speaker_child, name)?;

    let content_child = document.create_element("div");
    let content_text = document.create_text("Hello everyone out there");
    document.append_child(content_child, content_text)?;

    document.append_child(message, speaker_child)?;
    document.append_child(message, content_child)?;
    document.append_child(container, message)?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(lines, vec!["Bob: Hello everyone out there".to_string()]);
    Ok(())
}

#[test]
fn missing_speaker_label_uses_placeholder() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;

    // Avatar only, no name anywhere.
    let message = document.create_element("div");
    let speaker_child = document.create_element("div");
    let avatar = document.create_element("img");
    document.append_child(speaker_child, avatar)?;

    let content_child = document.create_element("div");
    let content_text = document.create_text("Hi there");
    document.append_child(content_child, content_text)?;

    document.append_child(message, speaker_child)?;
    document.append_child(message, content_child)?;
    document.append_child(container, message)?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(lines, vec!["unknown speaker: Hi there".to_string()]);
    Ok(())
}

#[test]
fn fallback_pass_handles_structureless_markup() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;

    // No message structure at all, just text-bearing divs.
    let first = document.create_element("div");
    let first_text = document.create_text("Bob: hello there");
    document.append_child(first, first_text)?;
    document.append_child(container, first)?;

    let second = document.create_element("div");
    let second_text = document.create_text("just chatting along");
    document.append_child(second, second_text)?;
    document.append_child(container, second)?;

    let lines = TranscriptExtractor::default().extract(&document, container);
    assert_eq!(
        lines,
        vec![
            "Bob: hello there".to_string(),
            "participant: just chatting along".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn oversized_content_yields_empty_transcript() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    let long_text = "word ".repeat(150);
    add_message(&document, container, "Alice", &long_text)?;

    // Too long for the structural pass and for the fallback; extraction
    // degrades to an empty transcript rather than failing.
    let lines = TranscriptExtractor::default().extract(&document, container);
    assert!(lines.is_empty());
    Ok(())
}

#[test]
fn thresholds_are_tunable() -> Result<()> {
    let document = Document::new("main");
    let container = caption_container(&document)?;
    add_message(&document, container, "Alice", "ok")?;

    let config = ExtractorConfig {
        content_min_words: 1,
        ..ExtractorConfig::default()
    };
    let lines = TranscriptExtractor::new(config).extract(&document, container);
    assert_eq!(lines, vec!["Alice: ok".to_string()]);
    Ok(())
}
