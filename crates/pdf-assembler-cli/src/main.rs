//! PDF Assembler CLI - combine pages from several PDFs into one document.

mod edits;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use edits::{DocumentMove, EditPlan, PageMove, PageRef};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_assembler_core::{
    AppConfig, AssemblySession, AssemblyStore, PdfAssembler, PreviewState, Upload,
};
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-assemble")]
#[command(author, version, about = "Combine pages from PDF documents", long_about = None)]
struct Args {
    /// Input PDF files, staged in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Where to write the combined PDF (default: the name the backend reports)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Filename requested for the combined document
    #[arg(long)]
    name: Option<String>,

    /// Move a whole file, by 1-based position (e.g. "2:1")
    #[arg(long = "move-file", value_name = "FROM:TO")]
    move_file: Vec<DocumentMove>,

    /// Drop a page onto another page's slot (e.g. "a.pdf:3@b.pdf:1")
    #[arg(long = "move-page", value_name = "PAGE@TARGET")]
    move_page: Vec<PageMove>,

    /// Rotate a page 90 degrees clockwise; repeat to rotate further
    #[arg(long, value_name = "PAGE")]
    rotate: Vec<PageRef>,

    /// Leave a page out of the output
    #[arg(long, value_name = "PAGE")]
    remove: Vec<PageRef>,

    /// Leave every page of a file out of the output
    #[arg(long = "remove-file", value_name = "FILE")]
    remove_file: Vec<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend or gateway base URL
    #[arg(long, env = "PDF_ASSEMBLER_API_BASE")]
    api_base: Option<String>,

    /// Backend API key (omit when talking to the gateway)
    #[arg(long, env = "PDF_ASSEMBLER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn edit_plan(&self) -> EditPlan {
        EditPlan {
            document_moves: self.move_file.clone(),
            page_moves: self.move_page.clone(),
            rotations: self.rotate.clone(),
            removals: self.remove.clone(),
            file_removals: self.remove_file.clone(),
        }
    }
}

/// The session's last error, or a generic message if none was recorded.
fn session_error(session: &AssemblySession, context: &str) -> anyhow::Error {
    anyhow!(
        "{}: {}",
        context,
        session.last_error().unwrap_or("unknown error")
    )
}

/// One line per page, in the order the pages will be submitted.
fn describe(store: &AssemblyStore) -> Vec<String> {
    store
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let rotation = store.rotation(page.id()).degrees();
            if rotation == 0 {
                format!("{:>3}. {}", i + 1, page.label())
            } else {
                format!("{:>3}. {} ({}°)", i + 1, page.label(), rotation)
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    if let Some(api_base) = &args.api_base {
        config.backend.api_base.clone_from(api_base);
    }
    if args.api_key.is_some() {
        config.backend.api_key.clone_from(&args.api_key);
    }

    let assembler = PdfAssembler::new(config).context("Failed to initialize assembler")?;
    let mut session = AssemblySession::new();

    #[allow(clippy::cast_possible_truncation)]
    let pb = ProgressBar::new(args.files.len() as u64);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for path in &args.files {
        pb.set_message(path.display().to_string());

        let upload = Upload::from_path(path)
            .await
            .context(format!("Failed to read {}", path.display()))?;

        if assembler.upload(&mut session, &upload).await.is_none() {
            pb.abandon();
            return Err(session_error(&session, &format!("Failed to upload {}", path.display())));
        }
        pb.inc(1);
    }

    pb.finish_with_message("Upload complete");
    info!(
        "Staged {} pages from {} files",
        session.store().page_count(),
        session.store().document_count()
    );

    args.edit_plan()
        .apply(&mut session)
        .context("Failed to apply edits")?;

    let filename = args.name.as_deref().unwrap_or_default();
    let lines = describe(session.store());

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("Output order:");
        for line in &lines {
            println!("  {line}");
        }
    }

    let Some(result_id) = assembler.submit(&mut session, filename).await else {
        return Err(session_error(&session, "Failed to create PDF"));
    };
    info!("Created result {}", result_id);

    let Some(view) = assembler.fetch_result(&mut session, &result_id).await else {
        return Err(session_error(&session, "Failed to fetch result"));
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&view.info.filename));

    match view.preview() {
        PreviewState::Ready(handle) => {
            handle
                .save_to(&output_path)
                .await
                .context(format!("Failed to write output: {}", output_path.display()))?;
        }
        PreviewState::Failed(reason) => {
            warn!("Preview unavailable ({}), downloading directly", reason);
            let bytes = assembler
                .retriever()
                .download(&result_id)
                .await
                .context("Failed to download result")?;
            tokio::fs::write(&output_path, &bytes)
                .await
                .context(format!("Failed to write output: {}", output_path.display()))?;
        }
        PreviewState::Loading => anyhow::bail!("Result preview was not loaded"),
    }

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "Combined PDF ({}) saved to: {}",
            view.info.display_size(),
            output_path.display()
        );
    }

    Ok(())
}
