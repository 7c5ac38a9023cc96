//! Command line interface.

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdff_editor::api::{ApiClient, DocumentApi};
use pdff_editor::config::{load_settings, Settings};
use pdff_editor::editor::{events, EditorController};
use pdff_editor::history::{parse_document_ref, History};
use pdff_editor::models::{parse_date, FieldName, Metadata, NavigationCursor, DATE_FORMAT};
use pdff_editor::status::{can_save, status_for_preview, Status};
use pdff_editor::view::{style_for, EditorView};

#[derive(Parser)]
#[command(name = "pdff-editor", version, about = "Edit document metadata on a PDFF backend")]
pub struct Cli {
    /// Backend API base URL
    #[arg(long, global = true, env = "PDFF_API_URL")]
    api_url: Option<String>,

    /// Queue filter for previous/next navigation
    #[arg(long, global = true, env = "PDFF_NAVIGATION_FILTER")]
    filter: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "PDFF_REQUEST_TIMEOUT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive editor
    Edit {
        /// Document id or editor URL (…/editor?document_id=…)
        document: String,
    },
    /// Show a document's metadata and status
    Show {
        /// Document id or editor URL
        document: String,
    },
    /// Preview the filename for draft metadata
    Preview {
        /// Document id or editor URL
        document: String,
        #[command(flatten)]
        metadata: MetadataArgs,
    },
    /// Save metadata and let the backend rename the document
    Save {
        /// Document id or editor URL
        document: String,
        #[command(flatten)]
        metadata: MetadataArgs,
    },
    /// Show a document's position in the navigation queue
    Queue {
        /// Document id or editor URL
        document: String,
    },
    /// List all document ids
    List,
}

/// Metadata overrides applied on top of the stored values.
#[derive(Args, Debug, Default)]
struct MetadataArgs {
    #[arg(long)]
    correspondent: Option<String>,
    #[arg(long)]
    document_type: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    customer_id: Option<String>,
    #[arg(long)]
    document_number: Option<String>,
    /// Document date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    document_date: Option<NaiveDate>,
}

impl MetadataArgs {
    fn to_metadata(&self) -> Metadata {
        Metadata {
            correspondent: self.correspondent.clone(),
            document_type: self.document_type.clone(),
            topic: self.topic.clone(),
            customer_id: self.customer_id.clone(),
            document_number: self.document_number.clone(),
            document_date: self
                .document_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected a YYYY-MM-DD date, got '{}'", s))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut settings = load_settings().await;
        self.apply_to_settings(&mut settings);
        init_logging(&self.command, &settings)?;

        let client = ApiClient::with_user_agent(
            &settings.api_url,
            settings.request_timeout(),
            settings.user_agent.as_deref(),
        )?;

        match self.command {
            Command::Edit { document } => cmd_edit(client, &settings, &document).await,
            Command::Show { document } => cmd_show(&client, &document).await,
            Command::Preview { document, metadata } => {
                cmd_preview(&client, &document, &metadata).await
            }
            Command::Save { document, metadata } => cmd_save(&client, &document, &metadata).await,
            Command::Queue { document } => cmd_queue(&client, &settings, &document).await,
            Command::List => cmd_list(&client).await,
        }
    }

    /// Command line flags take precedence over the config file.
    fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref api_url) = self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(ref filter) = self.filter {
            settings.navigation_filter = filter.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout = timeout;
        }
    }
}

/// Log to stderr for one-shot commands and to a file for the editor, whose
/// screen would otherwise be overwritten.
fn init_logging(command: &Command, settings: &Settings) -> anyhow::Result<()> {
    let interactive = matches!(command, Command::Edit { .. });
    let default_level = if interactive { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if interactive {
        fs::create_dir_all(&settings.log_dir)
            .with_context(|| format!("creating log directory {}", settings.log_dir.display()))?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(settings.log_path())
            .with_context(|| format!("opening {}", settings.log_path().display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn resolve_document(input: &str) -> anyhow::Result<String> {
    parse_document_ref(input).ok_or_else(|| anyhow!("Not a document id or editor URL: {}", input))
}

async fn cmd_edit(client: ApiClient, settings: &Settings, document: &str) -> anyhow::Result<()> {
    let document_id = resolve_document(document)?;
    info!(
        "Opening editor for {} against {}",
        document_id,
        client.base_url()
    );

    let editor_settings = settings.editor_settings();
    let (tx, rx) = events::channel();
    let view = EditorView::new(editor_settings.field_debounce);
    let history = History::new(&document_id, tx.clone());
    let controller = EditorController::new(Arc::new(client), view, history, tx, editor_settings);

    pdff_editor::tui::run(controller, rx).await
}

async fn cmd_show(client: &ApiClient, document: &str) -> anyhow::Result<()> {
    let document_id = resolve_document(document)?;
    let doc = client.get_document(&document_id).await?;
    let preview = client
        .preview_filename(&document_id, &doc.metadata)
        .await?;
    let status = status_for_preview(&preview, Some(&doc));

    println!("{} {}", style("Document").bold(), doc.id);
    if let Some(ref original) = doc.original_filename {
        println!("  {:<16} {}", "original", original);
    }
    println!("  {:<16} {}", "current", doc.current_filename);
    println!("  {:<16} {}", "pdf", client.pdf_url(&document_id));
    print_metadata(&doc.metadata);
    print_status(status, &preview.preview_filename);
    Ok(())
}

async fn cmd_preview(
    client: &ApiClient,
    document: &str,
    overrides: &MetadataArgs,
) -> anyhow::Result<()> {
    let document_id = resolve_document(document)?;
    let doc = client.get_document(&document_id).await?;
    let mut metadata = doc.metadata.clone();
    metadata.merge(&overrides.to_metadata());

    let preview = client.preview_filename(&document_id, &metadata).await?;
    let status = status_for_preview(&preview, Some(&doc));

    print_metadata(&metadata);
    print_status(status, &preview.preview_filename);
    println!(
        "  {:<16} {}",
        "can save",
        if can_save(&preview, status) { "yes" } else { "no" }
    );
    Ok(())
}

async fn cmd_save(
    client: &ApiClient,
    document: &str,
    overrides: &MetadataArgs,
) -> anyhow::Result<()> {
    let document_id = resolve_document(document)?;
    let doc = client.get_document(&document_id).await?;
    let mut metadata = doc.metadata.clone();
    metadata.merge(&overrides.to_metadata());

    let preview = client.preview_filename(&document_id, &metadata).await?;
    let status = status_for_preview(&preview, Some(&doc));
    if !preview.is_complete {
        bail!(
            "Cannot generate a filename from this metadata (correspondent and document type are required)"
        );
    }
    if status == Status::Saved {
        println!("Already saved as {}", style(&doc.current_filename).green());
        return Ok(());
    }

    client.update_metadata(&document_id, &metadata).await?;
    let saved = client.save_document(&document_id).await?;
    info!("Document {} saved as '{}'", document_id, saved.generated_filename);
    println!("Saved as {}", style(&saved.generated_filename).green().bold());
    Ok(())
}

async fn cmd_queue(client: &ApiClient, settings: &Settings, document: &str) -> anyhow::Result<()> {
    let document_id = resolve_document(document)?;
    let cursor = client
        .get_navigation(&document_id, &settings.navigation_filter)
        .await?;
    print_cursor(&settings.navigation_filter, &cursor);
    Ok(())
}

async fn cmd_list(client: &ApiClient) -> anyhow::Result<()> {
    let list = client.list_documents().await?;
    println!("{} {} documents", style("Backend").bold(), list.count);
    for id in &list.document_ids {
        println!("  {}", id);
    }
    Ok(())
}

fn print_metadata(metadata: &Metadata) {
    println!("{}", style("Metadata").bold());
    for field in FieldName::ALL {
        let value = metadata.get(field).unwrap_or("-");
        println!("  {:<16} {}", field.label(), value);
    }
}

fn print_status(status: Status, preview_filename: &str) {
    let label = style_for(status).label;
    let styled = match status {
        Status::Saved => style(label).green(),
        Status::Unsaved => style(label).yellow(),
        Status::Changed => style(label).blue(),
        Status::NotGeneratable => style(label).red(),
        Status::Loading => style(label).dim(),
    };
    println!("{}", style("Filename").bold());
    println!("  {:<16} {}", "preview", preview_filename);
    println!("  {:<16} {}", "status", styled);
}

fn print_cursor(filter: &str, cursor: &NavigationCursor) {
    println!(
        "{} {} of {} ({})",
        style("Position").bold(),
        cursor.current_position,
        cursor.total_unprocessed,
        filter
    );
    println!("  {:<16} {}", "previous", cursor.previous_id().unwrap_or("-"));
    println!("  {:<16} {}", "next", cursor.next_id().unwrap_or("-"));
}
