//! Coursedesk CLI: browse, upload and delete catalog topics.
//!
//! Reads COURSEDESK_API_URL (or API_URL) and optional COURSEDESK_API_KEY /
//! COURSEDESK_BEARER_TOKEN. Set COURSEDESK_STORE=memory to try it against
//! the built-in sample catalog.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use coursedesk_cli::{
    init_tracing, load_attachment_for, render_topic_table, DialoguerConfirm, LogCreated,
};
use coursedesk_core::{AttachmentSlot, Config, DraftField, ErrorMetadata, TopicId};
use coursedesk_services::{
    AutoConfirm, Banner, CatalogController, Confirm, DeleteOutcome, SubmitOutcome, UploadError,
    UploadWorkflow,
};
use coursedesk_storage::{create_store, TopicStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "coursedesk", about = "Topic catalog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List topics, optionally filtered by title
    List {
        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Upload a new topic with optional video and notes
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Unit name, e.g. "Unit 1"
        #[arg(long)]
        unit: Option<String>,
        /// Class name, e.g. "AIML - II Year"
        #[arg(long)]
        class: Option<String>,
        /// Path to a video file
        #[arg(long)]
        video: Option<PathBuf>,
        /// Path to a PDF or Word document
        #[arg(long)]
        notes: Option<PathBuf>,
    },
    /// Delete a topic by ID
    Delete {
        /// Topic ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn banner_error(banner: Option<Banner>, fallback: impl std::fmt::Display) -> anyhow::Error {
    match banner {
        Some(banner) => match banner.suggested_action() {
            Some(action) => anyhow::anyhow!("{} ({})", banner.message(), action),
            None => anyhow::anyhow!(banner.message()),
        },
        None => anyhow::anyhow!("{}", fallback),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    let store = create_store(&config).context(
        "Failed to create catalog store. Set COURSEDESK_API_URL (or API_URL)",
    )?;
    tracing::debug!(backend = %store.backend_type(), "Catalog store ready");

    match cli.command {
        Commands::List { search, format } => {
            let catalog = CatalogController::new(store, Arc::new(AutoConfirm(false)));
            if let Err(e) = catalog.load().await {
                return Err(banner_error(catalog.banner(), e));
            }
            let topics = catalog.visible(search.as_deref().unwrap_or(""));
            match format {
                OutputFormat::Json => print_json(&topics)?,
                OutputFormat::Table => print!("{}", render_topic_table(&topics)),
            }
        }
        Commands::Upload {
            title,
            description,
            unit,
            class,
            video,
            notes,
        } => {
            let upload = UploadWorkflow::new(store, Arc::new(LogCreated))
                .with_limits(config.upload_limits);
            upload.set_field(DraftField::Title, title)?;
            upload.set_field(DraftField::Description, description)?;
            upload.set_field(DraftField::UnitName, unit.unwrap_or_default())?;
            upload.set_field(DraftField::ClassName, class.unwrap_or_default())?;
            for (slot, path) in [(AttachmentSlot::Video, video), (AttachmentSlot::Notes, notes)] {
                if let Some(path) = path {
                    upload.attach(slot, load_attachment_for(slot, &path).await?)?;
                }
            }

            match upload.submit().await {
                Ok(SubmitOutcome::Created(record)) => print_json(&record)?,
                Ok(SubmitOutcome::Detached) => anyhow::bail!("Upload was interrupted"),
                Err(e @ UploadError::Validation(_)) => {
                    anyhow::bail!("{}", e.client_message())
                }
                Err(UploadError::Store(e)) => match e.suggested_action() {
                    Some(action) => anyhow::bail!("Upload failed: {} ({})", e.client_message(), action),
                    None => anyhow::bail!("Upload failed: {}", e.client_message()),
                },
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Delete { id, yes } => {
            let confirm: Arc<dyn Confirm> = if yes {
                Arc::new(AutoConfirm(true))
            } else {
                Arc::new(DialoguerConfirm)
            };
            let catalog = CatalogController::new(store, confirm);
            // Best effort: the prompt names the topic when it can be found.
            if let Err(e) = catalog.load().await {
                tracing::debug!(error = %e, "Could not load catalog before delete");
                catalog.dismiss_banner();
            }

            let id = TopicId::new(id);
            match catalog.request_delete(&id).await {
                Ok(DeleteOutcome::Removed) => print_json(&serde_json::json!({
                    "success": true,
                    "message": format!("Topic {} deleted", id),
                }))?,
                Ok(DeleteOutcome::Declined) | Ok(DeleteOutcome::Detached) => {
                    print_json(&serde_json::json!({
                        "success": false,
                        "message": "Delete cancelled",
                    }))?
                }
                Err(e) => return Err(banner_error(catalog.banner(), e)),
            }
        }
    }

    Ok(())
}
