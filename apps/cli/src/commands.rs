//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tabpanel_core::{
    AssemblyReport, AssetCache, BuiltinAssets, DirAssets, DocumentAssembler, FragmentSource,
};
use tabpanel_dom::{Document, parse_document, to_html};
use tabpanel_shared::{
    AppConfig, AssembleOptions, OrphanPolicy, config_file_path, init_config_at, load_config,
    load_config_from,
};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// tabpanel: merge HTML fragments into one tabbed page.
#[derive(Parser)]
#[command(
    name = "tabpanel",
    version,
    about = "Merge independently produced HTML fragments into one tab-switchable page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.tabpanel/tabpanel.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Assembly report format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
    None,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Assemble fragments into a tabbed HTML page.
    Build {
        /// Fragment files, in tab order.
        #[arg(required = true)]
        fragments: Vec<PathBuf>,

        /// Heading text (ignored when the target document already has one).
        #[arg(short, long)]
        title: String,

        /// Output file. Defaults to the --into file, else stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Existing document to extend instead of starting empty.
        #[arg(long)]
        into: Option<PathBuf>,

        /// Directory holding the style and script assets.
        #[arg(long)]
        assets_dir: Option<PathBuf>,

        /// Fate of fragments without a content node: skip or keep the button.
        /// Overrides `[assembly] orphan_policy`.
        #[arg(long)]
        orphan_policy: Option<OrphanPolicy>,

        /// Report printed to stderr after assembly.
        #[arg(long, default_value = "text")]
        report: ReportFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults (at --config when given).
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout may
/// carry the assembled page.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = format!(
        "tabpanel_cli={level},tabpanel_core={level},tabpanel_dom={level},tabpanel_shared={level}"
    );

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build {
            fragments,
            title,
            out,
            into,
            assets_dir,
            orphan_policy,
            report,
        } => {
            let args = BuildArgs {
                fragments,
                title,
                out,
                into,
                assets_dir,
                orphan_policy,
                report,
            };
            cmd_build(&resolve_config(config_path)?, args)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(&resolve_config(config_path)?),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

struct BuildArgs {
    fragments: Vec<PathBuf>,
    title: String,
    out: Option<PathBuf>,
    into: Option<PathBuf>,
    assets_dir: Option<PathBuf>,
    orphan_policy: Option<OrphanPolicy>,
    report: ReportFormat,
}

fn cmd_build(config: &AppConfig, args: BuildArgs) -> Result<()> {
    let mut options = AssembleOptions::from(config);
    if let Some(policy) = args.orphan_policy {
        options.orphan_policy = policy;
    }

    let assets_dir = args
        .assets_dir
        .clone()
        .or_else(|| config.assets.dir.as_ref().map(PathBuf::from));
    let cache = match &assets_dir {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading assets from directory");
            AssetCache::new(DirAssets::new(dir))
        }
        None => AssetCache::new(BuiltinAssets::for_markers(&options.markers)),
    };
    let assembler = DocumentAssembler::new(options, Arc::new(cache));

    let sources = read_sources(&args.fragments)?;
    let mut doc = match &args.into {
        Some(path) => read_document(path)?,
        None => Document::new(),
    };

    info!(
        fragments = sources.len(),
        title = %args.title,
        into = ?args.into,
        "assembling tabbed document"
    );

    let report = assembler.assemble_sources(&mut doc, &args.title, &sources)?;
    let html = to_html(&doc);

    match args.out.as_ref().or(args.into.as_ref()) {
        Some(path) => {
            std::fs::write(path, html)
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
            info!(path = %path.display(), "wrote tabbed document");
        }
        None => println!("{html}"),
    }

    print_report(&report, &args.report)
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<FragmentSource>> {
    paths
        .iter()
        .map(|path| {
            let html = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("cannot read fragment {}", path.display()))?;
            Ok(FragmentSource {
                name: path.display().to_string(),
                html,
            })
        })
        .collect()
}

fn read_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        debug!(path = %path.display(), "target document does not exist yet; starting empty");
        return Ok(Document::new());
    }
    let html = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read document {}", path.display()))?;
    Ok(parse_document(&html))
}

fn print_report(report: &AssemblyReport, format: &ReportFormat) -> Result<()> {
    match format {
        ReportFormat::None => {}
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| eyre!("cannot serialize report: {e}"))?;
            eprintln!("{json}");
        }
        ReportFormat::Text => {
            eprintln!();
            eprintln!("  Tabs:     {}", report.button_count());
            eprintln!("  Content:  {}", report.content_count());
            eprintln!(
                "  Heading:  {}",
                if report.heading_created { "created" } else { "kept existing" }
            );
            for tab in &report.tabs {
                let marker = if tab.has_content { " " } else { "!" };
                eprintln!("   {marker} {} -> #{}", tab.label, tab.target);
            }
            if !report.is_clean() {
                eprintln!();
                eprintln!("  Warnings:");
                for diagnostic in &report.diagnostics {
                    eprintln!("    - {diagnostic}");
                }
            }
            eprintln!();
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };
    if path.exists() {
        return Err(eyre!("config file already exists: {}", path.display()));
    }
    let path = init_config_at(&path)?;
    println!("Created config file: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| eyre!("cannot render config: {e}"))?;
    println!("{content}");
    Ok(())
}
