use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doi_cite::cite::{
    format_citation, format_in_text_narrative, format_in_text_parenthetical, strip_markup,
    CitationFormat, CitationStyle,
};
use doi_cite::config::{find_config_file, load_config, Config};
use doi_cite::doi::{
    detect_from_document, detect_from_pdf, detect_from_text, detect_from_url, normalize,
    HtmlDocument,
};
use doi_cite::models::{CitationMetadata, DetectionSource, DoiDetectionResult};
use doi_cite::sources::MetadataResolver;
use doi_cite::utils::HttpClient;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// doi-cite - Detect DOIs and format them as citations
#[derive(Parser, Debug)]
#[command(name = "doi-cite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Detect DOIs in pages, PDFs and text and format them as citations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable the metadata cache for this command
    #[arg(long, global = true, default_value_t = false)]
    no_cache: bool,

    /// Strip italics markup from formatted citations
    #[arg(long, global = true, default_value_t = false)]
    plain: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Citation style or BibTeX
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Apa,
    Mla,
    Chicago,
    Ieee,
    Vancouver,
    Bibtex,
}

impl From<Style> for CitationFormat {
    fn from(style: Style) -> Self {
        match style {
            Style::Apa => CitationFormat::Apa,
            Style::Mla => CitationFormat::Mla,
            Style::Chicago => CitationFormat::Chicago,
            Style::Ieee => CitationFormat::Ieee,
            Style::Vancouver => CitationFormat::Vancouver,
            Style::Bibtex => CitationFormat::Bibtex,
        }
    }
}

/// In-text citation form
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InText {
    /// `(Doe, 2021)`, `[1]`
    Parenthetical,
    /// `Doe (2021)`, `Doe [1]`
    Narrative,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonicalize DOIs, resolver URLs and `doi:` strings
    #[command(alias = "n")]
    Normalize {
        /// Candidates to normalize
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Find DOIs in text, a file, a PDF or a web page (reads stdin by default)
    #[command(alias = "d")]
    Detect {
        /// Text to scan
        #[arg(long, conflicts_with_all = ["file", "pdf", "url"])]
        text: Option<String>,

        /// Text or HTML file to scan
        #[arg(long, conflicts_with_all = ["pdf", "url"])]
        file: Option<PathBuf>,

        /// PDF file to scan
        #[arg(long, conflicts_with = "url")]
        pdf: Option<PathBuf>,

        /// Web page to fetch and scan
        #[arg(long)]
        url: Option<String>,

        /// Print the detection result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a DOI and print a citation
    #[command(alias = "c")]
    Cite {
        /// DOI, resolver URL or `doi:` string
        doi: String,

        #[command(flatten)]
        output: CitationArgs,
    },

    /// Format a metadata record read from a JSON file (`-` for stdin)
    #[command(alias = "f")]
    Format {
        /// JSON file holding a CitationMetadata record
        #[arg(long, short)]
        metadata: PathBuf,

        #[command(flatten)]
        output: CitationArgs,
    },

    /// List the supported citation styles
    Styles,
}

#[derive(clap::Args, Debug)]
struct CitationArgs {
    /// Output style (default: `[citation].default_format`)
    #[arg(long, short, value_enum)]
    style: Option<Style>,

    /// Print an in-text citation instead of a reference entry
    #[arg(long, value_enum)]
    in_text: Option<InText>,

    /// Reference number for numbered styles
    #[arg(long)]
    ordinal: Option<u32>,
}

fn print_env_vars() {
    println!("doi-cite - Environment Variables");
    println!();
    println!("Citation Settings:");
    println!("  DOI_CITE_CITATION__DEFAULT_FORMAT   apa, mla, chicago, ieee, vancouver or bibtex (default: apa)");
    println!("  DOI_CITE_CITATION__PLAIN_TEXT       Strip italics markup (default: false)");
    println!();
    println!("Cache Settings:");
    println!("  DOI_CITE_CACHE__ENABLED               Enable the metadata cache (default: true)");
    println!("  DOI_CITE_CACHE__DIRECTORY             Custom cache directory");
    println!("  DOI_CITE_CACHE__METADATA_TTL_SECONDS  TTL for metadata (default: 86400 = 24 hours)");
    println!();
    println!("HTTP Settings:");
    println!("  DOI_CITE_HTTP__TIMEOUT_SECONDS  Request timeout (default: 30)");
    println!("  DOI_CITE_HTTP__MAILTO           Contact address for CrossRef's polite pool");
    println!();
    println!("Source Settings:");
    println!("  DOI_CITE_SOURCES__ORDER  Metadata sources in lookup order (default: crossref,datacite)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG  Rust logging level (e.g., debug, info, warn, error)");
    std::process::exit(0);
}

fn read_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref())
        .with_context(|| match &path {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load config from the environment".to_string(),
        })?;

    if cli.no_cache {
        config.cache.enabled = false;
    }
    if cli.plain {
        config.citation.plain_text = true;
    }
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "html" | "htm" | "xhtml"))
}

fn render_citation(
    meta: &CitationMetadata,
    args: &CitationArgs,
    config: &Config,
) -> Result<String> {
    let format = args
        .style
        .map(CitationFormat::from)
        .unwrap_or(config.citation.default_format);

    let rendered = match (args.in_text, format.style()) {
        (None, _) => format_citation(meta, format, args.ordinal),
        (Some(InText::Parenthetical), Some(style)) => {
            format_in_text_parenthetical(meta, style, args.ordinal)
        }
        (Some(InText::Narrative), Some(style)) => {
            format_in_text_narrative(meta, style, args.ordinal)
        }
        (Some(_), None) => bail!("BibTeX has no in-text form"),
    };

    Ok(if config.citation.plain_text {
        strip_markup(&rendered)
    } else {
        rendered
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("doi_cite={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = read_config(&cli)?;

    match cli.command {
        Some(Commands::Normalize { inputs }) => {
            let mut failed = 0;
            for input in &inputs {
                match normalize(input) {
                    Some(doi) => println!("{}", doi),
                    None => {
                        failed += 1;
                        eprintln!("Not a DOI: {}", input);
                    }
                }
            }
            if failed > 0 {
                std::process::exit(1);
            }
        }

        Some(Commands::Detect {
            text,
            file,
            pdf,
            url,
            json,
        }) => {
            let result = if let Some(url) = url {
                let client = HttpClient::from_config(&config.http)?;
                let doi = detect_from_url(&url, &client).await?;
                DoiDetectionResult::new(doi.into_iter().collect(), DetectionSource::Url)
            } else if let Some(pdf) = pdf {
                detect_from_pdf(&pdf)?
            } else if let Some(file) = file {
                let content = read_input(&file)?;
                if is_html(&file) {
                    detect_from_document(&HtmlDocument::parse(&content))
                } else {
                    DoiDetectionResult::new(detect_from_text(&content), DetectionSource::Regex)
                }
            } else {
                let content = match text {
                    Some(text) => text,
                    None => read_input(Path::new("-"))?,
                };
                DoiDetectionResult::new(detect_from_text(&content), DetectionSource::Regex)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for doi in &result.dois {
                    println!("{}", doi);
                }
            }

            if result.is_empty() {
                if !cli.quiet {
                    eprintln!("No DOI found");
                }
                std::process::exit(1);
            }
        }

        Some(Commands::Cite { doi, output }) => {
            let resolver = MetadataResolver::from_config(&config)?;
            let meta = resolver
                .resolve(&doi)
                .await
                .with_context(|| format!("Failed to resolve {}", doi))?;
            println!("{}", render_citation(&meta, &output, &config)?);
        }

        Some(Commands::Format { metadata, output }) => {
            let content = read_input(&metadata)?;
            let meta: CitationMetadata = serde_json::from_str(&content)
                .with_context(|| format!("Invalid metadata record in {}", metadata.display()))?;
            println!("{}", render_citation(&meta, &output, &config)?);
        }

        Some(Commands::Styles) => {
            for style in CitationStyle::ALL {
                let numbering = if style.is_numbered() {
                    "numbered"
                } else {
                    "author-date"
                };
                println!("{:<10} {} ({})", style.id(), style.name(), numbering);
            }
            println!("{:<10} BibTeX entry", "bibtex");
        }

        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
