//! `grantha process`: queue local images, run one batch against the
//! recognition service and print the results in queue order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use serde::Serialize;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use grantha_config::ClientConfig;
use grantha_media::ImageBlob;
use grantha_queue::{
    BatchReport, BatchStart, Item, ItemSummary, Orchestrator, OrchestratorConfig, QueueEvent,
    QueueStore,
};
use grantha_understanding::RecognitionClient;

use crate::terminal_output::{
    note_info, note_success, note_warn, progress_bar, render_table, status_label,
    stream_write, supports_color, truncate, Column,
};

const RESULT_COLUMN_WIDTH: usize = 60;
const PROGRESS_WIDTH: usize = 30;

/// Images picked from the command line, plus what was left out.
#[derive(Debug, Default)]
pub struct Selection {
    pub images: Vec<ImageBlob>,
    pub skipped: Vec<PathBuf>,
}

/// Expand directories one level (sorted by name) and keep only image files.
pub fn select_images(paths: &[PathBuf]) -> Result<Selection> {
    let mut selection = Selection::default();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            entries.sort();
            for entry in entries {
                select_file(&entry, &mut selection);
            }
        } else {
            select_file(path, &mut selection);
        }
    }
    Ok(selection)
}

fn select_file(path: &Path, selection: &mut Selection) {
    let blob = ImageBlob::from_path(path);
    if blob.is_image() {
        selection.images.push(blob);
    } else {
        warn!(path = %path.display(), mime = %blob.mime_type(), "Skipping non-image file");
        selection.skipped.push(path.to_path_buf());
    }
}

#[derive(Serialize)]
struct ProcessOutput<'a> {
    batch: &'a BatchReport,
    items: Vec<ItemSummary>,
}

/// Run the command. Returns whether every item succeeded.
pub async fn run(paths: &[PathBuf], config: &ClientConfig, json: bool) -> Result<bool> {
    let selection = select_images(paths)?;
    for path in &selection.skipped {
        note_warn(&format!("Skipping {}: not an image", path.display()));
    }
    if selection.images.is_empty() {
        note_warn("No images to process.");
        return Ok(true);
    }

    let store = Arc::new(QueueStore::default());
    let recognizer = Arc::new(RecognitionClient::new(&config.server_url));
    let orchestrator = Orchestrator::new(
        Arc::clone(&store),
        recognizer,
        OrchestratorConfig {
            max_concurrency: config.max_concurrency,
            item_timeout: config.request_timeout(),
        },
    );

    let events = store.subscribe();
    store.add_items(selection.images);
    info!(server = %config.server_url, items = store.len(), "Processing images");

    let run = match orchestrator.begin() {
        BatchStart::Started(run) => run,
        // A fresh orchestrator with a non-empty queue always starts.
        BatchStart::Idle | BatchStart::Busy => return Ok(true),
    };
    info!(batch_id = %run.id(), "Batch started");
    if !json {
        note_info(&format!(
            "Processing {} image(s) via {}",
            run.item_ids().len(),
            config.server_url
        ));
    }

    let progress = (!json).then(|| tokio::spawn(show_progress(Arc::clone(&store), events)));
    let report = run.wait().await;
    if let Some(progress) = progress {
        progress.abort();
        let _ = stream_write(&mut std::io::stderr(), "\n");
    }

    let items = store.items();
    if json {
        let output = ProcessOutput {
            batch: &report,
            items: items.iter().map(Item::summary).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", results_table(&items, supports_color()));
        if report.failed == 0 {
            note_success(&format!(
                "{} image(s) transliterated in {} ms",
                report.succeeded, report.elapsed_ms
            ));
        } else {
            note_warn(&format!(
                "{} succeeded, {} failed",
                report.succeeded, report.failed
            ));
        }
    }

    store.clear_all();
    Ok(report.failed == 0)
}

/// Redraw the progress line on every status change.
async fn show_progress(
    store: Arc<QueueStore>,
    events: tokio::sync::broadcast::Receiver<QueueEvent>,
) {
    let mut events = BroadcastStream::new(events);
    draw_progress(&store);
    while let Some(event) = events.next().await {
        match event {
            Ok(QueueEvent::StatusChanged { .. }) | Err(_) => draw_progress(&store),
            Ok(_) => {}
        }
    }
}

fn draw_progress(store: &QueueStore) {
    let counts = store.counts();
    let line = format!(
        "\r{} processing",
        progress_bar(counts.processed(), counts.total(), PROGRESS_WIDTH)
    );
    let _ = stream_write(&mut std::io::stderr(), &line);
}

/// One row per item, in queue order.
pub fn results_table(items: &[Item], color: bool) -> String {
    let columns = [
        Column::right("#"),
        Column::left("File"),
        Column::left("Status"),
        Column::left("Result"),
    ];
    let rows: Vec<Vec<String>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let detail = item
                .result_text()
                .or(item.error_message())
                .unwrap_or_default();
            vec![
                (i + 1).to_string(),
                item.filename().to_string(),
                status_label(item.kind(), color),
                truncate(detail, RESULT_COLUMN_WIDTH),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grantha_core::ItemStatus;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("grantha-cli-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_select_images_filters_and_sorts() {
        let dir = scratch_dir("select");
        for name in ["b.png", "a.jpg", "notes.txt", "c.webp"] {
            std::fs::write(dir.join(name), b"data").unwrap();
        }
        let extra = dir.join("notes.txt");

        let selection = select_images(&[dir.clone(), extra.clone()]).unwrap();

        let names: Vec<&str> = selection.images.iter().map(|b| b.filename()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.webp"]);
        assert_eq!(selection.skipped, vec![extra.clone(), extra]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_image_path_is_still_selected() {
        let selection = select_images(&[PathBuf::from("/nonexistent/leaf.png")]).unwrap();
        assert_eq!(selection.images.len(), 1);
        assert!(selection.skipped.is_empty());
    }

    #[test]
    fn test_results_table_keeps_queue_order() {
        let store = QueueStore::default();
        let ids = store.add_items([
            ImageBlob::from_bytes("first.png", "image/png", b"1".to_vec()),
            ImageBlob::from_bytes("second.png", "image/png", b"2".to_vec()),
        ]);
        store.claim_pending();
        store.set_status(ids[1], ItemStatus::Error("API Error: boom".into()));
        store.set_status(ids[0], ItemStatus::Success("𑌗𑍍𑌰𑌨𑍍𑌥".into()));

        let table = results_table(&store.items(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].contains("first.png") && lines[2].contains("success"));
        assert!(lines[3].contains("second.png") && lines[3].contains("API Error: boom"));
    }
}
