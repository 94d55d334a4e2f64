use anyhow::Context;
use coursedesk_core::{Attachment, AttachmentSlot, TopicRecord};
use coursedesk_services::{Confirm, UploadObserver};
use std::path::Path;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays
/// parseable with `--format json`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Interactive terminal prompt. Anything other than an explicit yes,
/// including a prompt that cannot be shown, counts as a no.
pub struct DialoguerConfirm;

impl Confirm for DialoguerConfirm {
    fn confirm(&self, message: &str) -> bool {
        match dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Could not show confirmation prompt");
                false
            }
        }
    }
}

/// Upload observer for one-shot commands: there is no list to update, so
/// a created record is only logged.
pub struct LogCreated;

impl UploadObserver for LogCreated {
    fn topic_created(&self, record: &TopicRecord) {
        tracing::info!(topic_id = %record.id, title = %record.title, "Topic created");
    }
}

/// Read a file from disk into an attachment, guessing its content type
/// from the extension.
pub async fn load_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file path", path.display()))?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(Attachment::new(file_name, content_type, data))
}

/// Load the file for `slot` and refuse it early if the slot cannot take
/// its type.
pub async fn load_attachment_for(slot: AttachmentSlot, path: &Path) -> anyhow::Result<Attachment> {
    let attachment = load_attachment(path).await?;
    if !slot.accepts(&attachment.content_type) {
        anyhow::bail!(
            "{} looks like {}, but {} must be {}",
            path.display(),
            attachment.content_type,
            slot,
            slot.accepted_description()
        );
    }
    Ok(attachment)
}

/// Render topics as a fixed-width table.
pub fn render_topic_table(topics: &[TopicRecord]) -> String {
    if topics.is_empty() {
        return "No topics found.\n".to_string();
    }

    let mut out = format!(
        "{:<24} {:<30} {:<30} {:<5} {:<5}\n",
        "ID", "Title", "Unit / Class", "Video", "Notes"
    );
    out.push_str(&"-".repeat(98));
    out.push('\n');

    for topic in topics {
        out.push_str(&format!(
            "{:<24} {:<30} {:<30} {:<5} {:<5}\n",
            truncate_string(topic.id.as_str(), 24),
            truncate_string(&topic.title, 30),
            truncate_string(&topic.unit_and_class(), 30),
            yes_no(topic.video_url.is_some()),
            yes_no(topic.notes_url.is_some()),
        ));
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}
