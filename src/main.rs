//! `crosshair` - draw the cursor guides on a file and print the result

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crosshair::cli::{CliArgs, OutputMode, StartupConfig};
use crosshair::guide::LineWindow;
use crosshair::host::{Document, MemoryHost, TextSource};
use crosshair::messages::{DocumentMsg, Msg};
use crosshair::preview::{render_text, PreviewDump};
use crosshair::{ConfigStore, DocumentId, Runtime};

/// Upper bound for the engine to settle after each step
const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    let args = CliArgs::parse();
    crosshair::tracing::init();

    let startup = args.into_config().map_err(anyhow::Error::msg)?;
    run(startup)
}

fn run(startup: StartupConfig) -> Result<()> {
    let mut store = ConfigStore::load(startup.workspace_root.as_deref());
    store.set_overrides(startup.overrides.clone());

    let mut host = MemoryHost::new();
    let document = Document::from_file(startup.file.clone())
        .with_context(|| format!("Failed to open {}", startup.file.display()))?;
    let doc = host.open(document);
    host.tab_answers.push_back(Some(startup.tab_answer));

    let mut runtime = Runtime::new(host, store);
    runtime.activate();
    runtime.dispatch(Msg::Document(DocumentMsg::Opened { document_id: doc }));
    runtime.dispatch(Msg::focus(doc, startup.cursor.line, startup.cursor.column));
    if !runtime.run_until_idle(IDLE_TIMEOUT) {
        tracing::warn!("Engine did not settle within {:?}", IDLE_TIMEOUT);
    }

    print_result(&runtime, doc, &startup)?;

    if startup.save {
        let path = runtime.save_document(doc, |host| host.save(doc))?;
        runtime.run_until_idle(IDLE_TIMEOUT);
        eprintln!("Saved {}", path.display());
    }

    runtime.shutdown(IDLE_TIMEOUT);
    Ok(())
}

fn print_result(
    runtime: &Runtime<MemoryHost>,
    doc: DocumentId,
    startup: &StartupConfig,
) -> Result<()> {
    let host = runtime.host();
    let model = runtime.model();
    let line_count = host.line_count(doc).unwrap_or(0);
    let window = LineWindow::around(startup.cursor.line, line_count, model.config.size);
    let decorations = host.decorations.get(&doc).cloned().unwrap_or_default();
    let spans = model.spans.spans(doc).to_vec();

    match startup.output {
        OutputMode::Json => {
            let dump = PreviewDump {
                file: Some(startup.file.display().to_string()),
                enabled: model.is_enabled(),
                cursor: startup.cursor,
                window: window.into(),
                decorations,
                spans,
                messages: host.messages.clone(),
                status: model.status.current_message().map(str::to_string),
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        OutputMode::Text => {
            if let Some(message) = model.status.current_message() {
                eprintln!("{}", message);
            }
            print!("{}", render_text(host, doc, window, &decorations, &spans));
        }
    }
    Ok(())
}
