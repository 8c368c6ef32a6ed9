//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docstitch_markdown::CombineProgress;
use docstitch_shared::{AppConfig, CombineSettings, RenderSettings, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docstitch — combine Markdown trees and render HTML to PDF.
#[derive(Parser)]
#[command(
    name = "docstitch",
    version,
    about = "Combine Markdown files into one document and render HTML to PDF.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Concatenate every Markdown file under a directory into one file.
    Combine(CombineArgs),

    /// Convert an HTML file to PDF with wkhtmltopdf.
    Render(RenderArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `combine`.
#[derive(Args, Debug, Default)]
pub(crate) struct CombineArgs {
    /// Directory to search (defaults to the working directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output file name, written inside the root directory.
    #[arg(short, long)]
    pub output: Option<String>,

    /// File-name suffix to match.
    #[arg(long)]
    pub suffix: Option<String>,
}

/// Arguments for `render`.
#[derive(Args, Debug, Default)]
pub(crate) struct RenderArgs {
    /// HTML input file.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// PDF output file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the wkhtmltopdf executable.
    #[arg(long, env = "WKHTMLTOPDF_BINARY")]
    pub renderer: Option<PathBuf>,

    /// Let the renderer print its progress and warnings straight to the terminal.
    #[arg(long)]
    pub no_quiet: bool,

    /// Extra renderer option as key=value, or a bare key for a flag (repeatable).
    #[arg(short = 'O', long = "option", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show {
        /// Output format.
        #[arg(long, default_value = "toml")]
        format: ConfigFormat,
    },
}

/// Format for `config show`.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum ConfigFormat {
    Toml,
    Json,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s.split_once('=').unwrap_or((s, ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid option '{s}': expected key=value"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docstitch=info",
        1 => "docstitch=debug",
        _ => "docstitch=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Combine(args) => cmd_combine(&args).await,
        Command::Render(args) => cmd_render(&args).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show { format } => cmd_config_show(format).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Settings merge (defaults < config file < CLI flags)
// ---------------------------------------------------------------------------

fn combine_settings(config: &AppConfig, args: &CombineArgs, cwd: &Path) -> CombineSettings {
    let mut settings = CombineSettings::from(config);
    settings.root = args.root.clone().unwrap_or_else(|| cwd.to_path_buf());
    if let Some(output) = &args.output {
        settings.output_name = output.clone();
    }
    if let Some(suffix) = &args.suffix {
        settings.suffix = suffix.clone();
    }
    settings
}

fn render_settings(config: &AppConfig, args: &RenderArgs) -> RenderSettings {
    let mut settings = RenderSettings::from(config);
    if let Some(input) = &args.input {
        settings.input = input.clone();
    }
    if let Some(output) = &args.output {
        settings.output = output.clone();
    }
    if let Some(renderer) = &args.renderer {
        settings.renderer = Some(renderer.clone());
    }
    if args.no_quiet {
        settings.quiet = false;
    }
    // Earlier options win, so flags go in front of the config file's.
    let mut options = args.options.clone();
    options.extend(settings.options);
    settings.options = options;
    settings
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_combine(args: &CombineArgs) -> Result<()> {
    let config = load_config()?;
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    let settings = combine_settings(&config, args, &cwd);

    info!(
        root = %settings.root.display(),
        suffix = %settings.suffix,
        output = %settings.output_name,
        "combining markdown files"
    );

    let reporter = CliProgress::new("Searching for files");
    let result = docstitch_markdown::combine_dir(&settings, &reporter);
    reporter.spinner.finish_and_clear();

    match result? {
        Some(summary) => {
            println!();
            println!("  Combined {} file(s)", summary.files.len());
            println!("  Output: {}", summary.output_path.display());
            println!("  Size:   {} bytes", summary.bytes_written);
            println!();
        }
        None => {
            println!(
                "No '{}' files found under {}; nothing written.",
                settings.suffix,
                settings.root.display()
            );
        }
    }

    Ok(())
}

async fn cmd_render(args: &RenderArgs) -> Result<()> {
    let config = load_config()?;
    let settings = render_settings(&config, args);

    info!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        "converting HTML to PDF"
    );

    let reporter = CliProgress::new("Rendering PDF");
    let result = docstitch_render::render(&settings).await;
    reporter.spinner.finish_and_clear();

    let summary = result?;
    info!(
        renderer = %summary.renderer.display(),
        bytes = summary.bytes_written,
        "render finished"
    );
    println!("PDF conversion completed successfully!");

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(format: ConfigFormat) -> Result<()> {
    let config: AppConfig = load_config()?;
    match format {
        ConfigFormat::Toml => println!("{}", toml::to_string_pretty(&config)?),
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl CombineProgress for CliProgress {
    fn discovered(&self, count: usize) {
        self.spinner.set_message(format!("Found {count} file(s)"));
    }

    fn appended(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Combining [{current}/{total}] {}", path.display()));
    }
}
