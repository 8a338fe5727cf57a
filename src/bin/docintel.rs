//! CLI binary for docintel-client.
//!
//! A thin shim over the library crate: browse the tool catalog, run one tool
//! against the backend, and print or save the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docintel_client::catalog::{self, NO_TOOLS_FOUND};
use docintel_client::input::files::describe_accept;
use docintel_client::input::language;
use docintel_client::session::{BACK_LABEL, BACK_LINK, NOT_FOUND_TITLE};
use docintel_client::{
    registry, write_payload, ClientConfig, HttpConverter, InputMode, Osc52Clipboard,
    PayloadSummary, ProgressCallback, ResultPayload, ResultView, SelectedFile,
    SubmissionProgressCallback, SubmissionState, ToolPage, ToolSession,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Exit status when the requested tool does not exist.
const EXIT_NOT_FOUND: u8 = 2;

// ── CLI progress callback using indicatif ────────────────────────────────────

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}";

/// Spinner shown while a submission is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        Arc::new(Self { bar })
    }
}

impl SubmissionProgressCallback for CliProgressCallback {
    fn on_submission_start(&self, tool_id: &str, upload_bytes: u64) {
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.set_prefix("Processing");
        self.bar.set_message(format!(
            "{tool_id}  {}",
            dim(&format!("{:.2} MB sent", upload_bytes as f64 / 1024.0 / 1024.0))
        ));
    }

    fn on_response(&self, _tool_id: &str, status: u16) {
        self.bar.set_message(format!("backend answered {status}"));
    }

    fn on_submission_complete(&self, _tool_id: &str, _success: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Browse the catalog
  docintel list
  docintel list excel

  # Details of one tool
  docintel show merge-pdf

  # Convert a file (result saved as converted.docx)
  docintel run pdf-to-word report.pdf

  # Several files, explicit output path
  docintel run merge-pdf a.pdf b.pdf c.pdf -o merged.pdf

  # Text input, from an argument or from stdin
  docintel run qr-generator --text "https://example.com" -o qr.png
  cat notes.txt | docintel run text-to-pdf --text-file -

  # Translate into French and copy the result to the clipboard
  docintel run image-translator menu.jpg --lang fr --copy

  # Structured output
  docintel run pdf-to-text scan.pdf --json

ENVIRONMENT VARIABLES:
  DOCINTEL_API_URL   Backend base URL (default: http://localhost:8000)
  RUST_LOG           Override log filter (e.g. docintel_client=debug)

EXIT STATUS:
  0  success
  1  input rejected, backend error, or I/O failure
  2  unknown tool
"#;

/// Run DocIntel document conversion tools from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "docintel",
    version,
    about = "Run DocIntel document conversion tools from the terminal",
    long_about = "Browse the DocIntel tool catalog and run conversions (PDF, Word, Excel, \
images, QR codes, barcodes, translation) against a DocIntel backend.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL.
    #[arg(long, global = true, env = "DOCINTEL_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Whole-request timeout in seconds (default: wait for the backend).
    #[arg(long, global = true, env = "DOCINTEL_TIMEOUT")]
    timeout: Option<u64>,

    /// Largest file accepted before upload, in MB.
    #[arg(long, global = true, env = "DOCINTEL_MAX_FILE_MB", default_value_t = 50,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_file_mb: u64,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "DOCINTEL_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCINTEL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "DOCINTEL_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tools by category, optionally filtered by a search term.
    List {
        /// Case-insensitive match on tool name or category title.
        query: Option<String>,
    },

    /// Show what a tool accepts and returns.
    Show {
        /// Tool identifier, e.g. `pdf-to-word`.
        tool: String,
    },

    /// List target languages, optionally filtered.
    Languages {
        /// Case-insensitive match on language name or code.
        query: Option<String>,
    },

    /// Run a tool once.
    Run(RunArgs),

    /// Check that the backend is up.
    Health {
        /// Print the raw JSON answer.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Tool identifier, e.g. `merge-pdf`.
    tool: String,

    /// Input files, in upload order.
    files: Vec<PathBuf>,

    /// Text input for text tools.
    #[arg(long, conflicts_with_all = ["text_file", "files"])]
    text: Option<String>,

    /// Read text input from a file (`-` for stdin).
    #[arg(long, conflicts_with = "files")]
    text_file: Option<PathBuf>,

    /// Target language, by name or code (translator tools only).
    #[arg(short, long)]
    lang: Option<String>,

    /// Write the result here. File results default to `converted.<ext>`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Copy a text result to the clipboard (OSC 52).
    #[arg(long)]
    copy: bool,

    /// Print a JSON summary instead of the result itself.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::List { query } => list(query.as_deref().unwrap_or(""))?,
        Command::Show { tool } => return show(tool),
        Command::Languages { query } => languages(query.as_deref().unwrap_or(""))?,
        Command::Health { json } => health(&cli, *json).await?,
        // The session and its result store are dropped inside `run`, before
        // the exit code reaches the process.
        Command::Run(args) => return run(&cli, args).await,
    }
    Ok(ExitCode::SUCCESS)
}

fn list(query: &str) -> Result<()> {
    let categories = catalog::filter_catalog(query);
    if categories.is_empty() {
        println!("{}", dim(NO_TOOLS_FOUND));
        return Ok(());
    }
    for category in categories {
        println!("{}  {}", bold(category.title), dim(category.description));
        for tool in category.tools {
            println!("  {:<22} {}", tool.name, cyan(tool.href.trim_start_matches('/')));
        }
        println!();
    }
    Ok(())
}

fn show(id: &str) -> Result<ExitCode> {
    let Some(tool) = registry::lookup(id) else {
        return Ok(not_found(id));
    };
    println!("{}", bold(tool.title));
    println!("{}", tool.description);
    println!();
    println!("Id:           {}", tool.id);
    println!("Endpoint:     {}", tool.endpoint_path());
    match (tool.input_mode, tool.accept) {
        (InputMode::Text, _) => println!("Input:        text"),
        (InputMode::File, Some(rules)) => println!(
            "Input:        {} ({})",
            if tool.multiple { "files" } else { "file" },
            describe_accept(rules)
        ),
        (InputMode::File, None) => println!("Input:        any file"),
    }
    println!("Result:       {}", tool.result);
    if let Some(ext) = tool.output_extension {
        println!("Output:       converted.{ext}");
    }
    if tool.needs_target_language {
        println!("Language:     required (default Spanish)");
    }
    if let Some(placeholder) = tool.placeholder {
        println!("Placeholder:  {placeholder}");
    }
    Ok(ExitCode::SUCCESS)
}

fn languages(query: &str) -> Result<()> {
    let found = language::search(query);
    if found.is_empty() {
        println!("{}", dim("No languages found"));
    }
    for lang in found {
        println!("  {:<6} {}", cyan(lang.code), lang.name);
    }
    Ok(())
}

async fn health(cli: &Cli, json: bool) -> Result<()> {
    let config = build_config(cli, None)?;
    let converter = HttpConverter::new(config.clone()).context("Failed to create HTTP client")?;
    let status = converter
        .health()
        .await
        .with_context(|| format!("Backend at {} is not healthy", config.api_base_url))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "{} {}  {}",
            green("✔"),
            config.api_base_url,
            dim(&format!(
                "status={} model={}",
                status.status,
                status.model.as_deref().unwrap_or("-")
            ))
        );
    }
    Ok(())
}

async fn run(cli: &Cli, args: &RunArgs) -> Result<ExitCode> {
    let show_progress = !cli.quiet && !cli.no_progress && !args.json;
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SubmissionProgressCallback>)
    } else {
        None
    };
    let config = build_config(cli, progress)?;

    let mut session = match ToolPage::open(&args.tool, &config)? {
        ToolPage::Found(session) => *session,
        ToolPage::NotFound { requested } => return Ok(not_found(&requested)),
    };
    collect_input(&mut session, args).await?;
    if !session.can_submit() {
        anyhow::bail!(
            "Nothing to submit: {} needs {}",
            session.tool().id,
            match session.tool().input_mode {
                InputMode::Text => "--text or --text-file",
                InputMode::File => "at least one input file",
            }
        );
    }

    let converter = HttpConverter::new(config.clone()).context("Failed to create HTTP client")?;
    session.submit(&converter).await.context("Submission failed")?;

    if let SubmissionState::Error { error, .. } = session.state() {
        eprintln!("{} {}", red("✘"), error);
        return Ok(ExitCode::FAILURE);
    }
    let payload = session
        .payload()
        .context("Backend answered without a result")?;

    // File results live in a temp store that goes away on exit, so they are
    // always saved somewhere.
    let saved_to = match (payload, &args.output) {
        (_, Some(path)) => Some(path.clone()),
        (ResultPayload::Download(obj), None) => Some(PathBuf::from(obj.file_name())),
        _ => None,
    };
    if let Some(ref path) = saved_to {
        write_payload(payload, path)
            .await
            .with_context(|| format!("Failed to save result to {}", path.display()))?;
    }

    if args.json {
        let summary = serde_json::json!({
            "tool": session.tool().id,
            "result": PayloadSummary::from(payload),
            "saved_to": saved_to,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_view(session.view(Instant::now()), saved_to.as_ref(), cli.quiet)?;
    }

    if args.copy {
        let mut clipboard = Osc52Clipboard::new(io::stderr());
        let copied = session
            .copy_result(&mut clipboard, Instant::now())
            .context("Failed to copy to clipboard")?;
        if !cli.quiet {
            if copied {
                if let Some(ResultView::Text { copy_label, .. }) = session.view(Instant::now()) {
                    eprintln!("{} {}", green("✔"), copy_label);
                } else {
                    eprintln!("{} Copied!", green("✔"));
                }
            } else {
                eprintln!("{}", dim("Nothing to copy: result is a file"));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Feed files, text and language from the command line into the session.
async fn collect_input(session: &mut ToolSession, args: &RunArgs) -> Result<()> {
    if !args.files.is_empty() {
        let files = args
            .files
            .iter()
            .map(SelectedFile::from_path)
            .collect::<Result<Vec<_>, _>>()?;
        session.offer_files(files)?;
    }

    let text = match (&args.text, &args.text_file) {
        (Some(t), _) => Some(t.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            Some(buf)
        }
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read text from {:?}", path))?,
        ),
        (None, None) => None,
    };
    if let Some(text) = text {
        session.set_text(text)?;
    }

    if let Some(ref lang) = args.lang {
        session.select_language(lang)?;
    }
    Ok(())
}

fn print_view(view: Option<ResultView>, saved_to: Option<&PathBuf>, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match view {
        Some(ResultView::Download {
            label, preview, ..
        }) => {
            if !quiet {
                let dest = saved_to.map(|p| p.display().to_string()).unwrap_or_default();
                eprintln!("{} {}  →  {}", green("✔"), label, bold(&dest));
                if let Some(p) = preview {
                    eprintln!("   {}", dim(&format!("{} {}×{}", p.format, p.width, p.height)));
                }
            }
        }
        Some(ResultView::Text { content, .. }) => {
            if let Some(path) = saved_to {
                if !quiet {
                    eprintln!("{} text  →  {}", green("✔"), bold(&path.display().to_string()));
                }
            } else {
                out.write_all(content.as_bytes())
                    .context("Failed to write to stdout")?;
                if !content.ends_with('\n') {
                    out.write_all(b"\n").ok();
                }
            }
        }
        Some(ResultView::TranslationPair {
            original,
            translated,
        }) => {
            if let Some(path) = saved_to {
                if !quiet {
                    let dest = path.display().to_string();
                    eprintln!("{} translation  →  {}", green("✔"), bold(&dest));
                }
            } else {
                writeln!(out, "{}\n{}\n", bold(original.label), original.text)?;
                writeln!(out, "{}\n{}", bold(translated.label), translated.text)?;
            }
        }
        None => {}
    }
    Ok(())
}

fn not_found(requested: &str) -> ExitCode {
    eprintln!("{} {}", red("✘"), bold(NOT_FOUND_TITLE));
    eprintln!("{}", ToolPage::not_found_message(requested));
    eprintln!("{}", dim(&format!("{BACK_LABEL}: docintel list  ({BACK_LINK})")));
    ExitCode::from(EXIT_NOT_FOUND)
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder()
        .api_base_url(cli.api_url.clone())
        .max_file_size_bytes(cli.max_file_mb * 1024 * 1024);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}
