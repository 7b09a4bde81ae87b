use anyhow::Result;
use caption_translator::{
    CaptionSession, ChannelGateway, Config, Document, HistoryStore, JsonHistoryStore,
    MemorySettingsStore, SessionEvent, SessionSettings, TranslateReply,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs a scripted caption-translation session against a simulated meeting
/// page, standing in for the real host document.
#[derive(Parser, Debug)]
#[command(name = "caption-translator")]
struct Args {
    /// Config file name (TOML), searched relative to the working directory
    #[arg(long, default_value = "config/caption-translator")]
    config: String,

    /// Override the configured target language
    #[arg(long)]
    target_lang: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    info!("{} starting", cfg.service.name);

    // Simulated host page: a caption container holding one message, the
    // shape the extractor expects (avatar + name, then the caption text).
    let document = Document::new("main");
    let container = document.create_element("div");
    document.set_attr(container, "aria-label", "Captions");
    document.append_child(document.root(), container)?;

    let message = document.create_element("div");
    let speaker = document.create_element("div");
    let avatar = document.create_element("img");
    let name = document.create_element("span");
    let name_text = document.create_text("Alice");
    let content = document.create_element("div");
    let caption_text = document.create_text("");
    document.append_child(name, name_text)?;
    document.append_child(speaker, avatar)?;
    document.append_child(speaker, name)?;
    document.append_child(content, caption_text)?;
    document.append_child(message, speaker)?;
    document.append_child(message, content)?;
    document.append_child(container, message)?;

    let mut settings = SessionSettings::default();
    if let Some(lang) = args.target_lang {
        settings.target_lang = lang;
    }
    let settings_store = Arc::new(MemorySettingsStore::new(settings));
    let history = Arc::new(JsonHistoryStore::new(&cfg.history.path, cfg.history.cap));
    let (gateway, mut requests) = ChannelGateway::new(16);

    let session = CaptionSession::new(
        document.clone(),
        settings_store,
        history.clone(),
        Arc::new(gateway),
        cfg.pipeline_config(),
    );
    let events = session.events();
    let session_task = tokio::spawn(session.run());

    // Canned translator standing in for the vendor-facing host process.
    let reply_events = events.clone();
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let translated = format!("[{}] {}", request.target_lang, request.text);
            let reply = TranslateReply::ok(request.id, translated);
            if reply_events.send(SessionEvent::Reply(reply)).await.is_err() {
                break;
            }
        }
    });

    // A caption line being typed out, then a second finished line.
    for text in ["Hello", "Hello every", "Hello everyone today"] {
        document.set_text(caption_text, text);
        tokio::time::sleep(Duration::from_millis(80)).await;
    }
    tokio::time::sleep(Duration::from_millis(700)).await;

    document.set_text(caption_text, "Hello everyone, welcome to the demo meeting");
    tokio::time::sleep(Duration::from_millis(700)).await;

    events.send(SessionEvent::Teardown).await?;
    session_task.await??;

    for record in history.list().await? {
        info!(
            "saved: {} ({} transcript lines)",
            record.title,
            record.transcript.len()
        );
        for line in &record.transcript {
            info!("  {}", line);
        }
    }

    Ok(())
}
