//! paperparse CLI - academic paper structure extraction tool

mod llm;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use paperparse::assist::{generate, PaperInfo};
use paperparse::{
    render, CompletionPolicy, GenerationKind, JsonFormat, LinkStrategy, PaperParser,
    ParseOptions, ParsedDocument,
};

use llm::{HttpCompletion, DEFAULT_ENDPOINT, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "paperparse")]
#[command(version)]
#[command(about = "Extract titles, authors, abstracts and section trees from academic PDFs", long_about = None)]
struct Cli {
    #[command(flatten)]
    parse: ParseArgs,

    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ParseArgs {
    /// Skip pages whose text cannot be extracted instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Resident memory ceiling in MB (0 disables the guard)
    #[arg(long, global = true, default_value = "500")]
    memory_limit_mb: u64,

    /// Pages cleaned per batch
    #[arg(long, global = true, default_value = "10")]
    batch_size: usize,

    /// Reject nearest-shallower parents that contradict dotted numbering
    #[arg(long, global = true)]
    strict_parents: bool,

    /// Refine metadata with the language model (requires an API key)
    #[arg(long, global = true)]
    assist: bool,
}

#[derive(Args)]
struct ModelArgs {
    /// API key for the chat-completion endpoint
    #[arg(long, global = true, env = "ZHIPUAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completion endpoint URL
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model name
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "60")]
    timeout_secs: u64,

    /// Attempts per request, including the first
    #[arg(long, global = true, default_value = "3")]
    retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a paper and print the document as JSON
    Parse {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show extracted metadata
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the section outline
    #[command(alias = "outline")]
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the storage record (list fields as JSON text)
    Record {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Generate a mindmap, timeline, concept graph, summary or review
    Generate {
        /// What to generate
        #[arg(value_enum)]
        kind: Kind,

        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Hierarchical mindmap of the paper's ideas
    Mindmap,
    /// Chronological events mentioned in the paper
    Timeline,
    /// Concept graph with nodes, links and categories
    Graph,
    /// Short summary
    Summary,
    /// Critical review
    Review,
}

impl From<Kind> for GenerationKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Mindmap => GenerationKind::Mindmap,
            Kind::Timeline => GenerationKind::Timeline,
            Kind::Graph => GenerationKind::Graph,
            Kind::Summary => GenerationKind::Summary,
            Kind::Review => GenerationKind::Review,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            ref input,
            ref output,
            compact,
        } => cmd_parse(&cli, input, output.as_deref(), compact),
        Commands::Info { ref input } => cmd_info(&cli, input),
        Commands::Sections { ref input } => cmd_sections(&cli, input),
        Commands::Record {
            ref input,
            ref output,
        } => cmd_record(&cli, input, output.as_deref()),
        Commands::Generate {
            ref input,
            kind,
            ref output,
        } => cmd_generate(&cli, input, kind.into(), output.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        let exhausted = e
            .downcast_ref::<paperparse::Error>()
            .is_some_and(|e| e.is_resource_exhaustion());
        if exhausted {
            eprintln!(
                "{}: {}\n{}",
                "Error".red().bold(),
                e,
                "The document is too large or complex; try --memory-limit-mb".yellow()
            );
            std::process::exit(2);
        }
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_memory_limit(self.parse.memory_limit_mb)
            .with_batch_size(self.parse.batch_size);
        if self.parse.lenient {
            options = options.lenient();
        }
        if self.parse.strict_parents {
            options = options.with_link_strategy(LinkStrategy::PrefixValidated);
        }
        options
    }

    fn completion(&self) -> Result<HttpCompletion, Box<dyn std::error::Error>> {
        let api_key = self
            .model
            .api_key
            .clone()
            .ok_or("No API key; pass --api-key or set ZHIPUAI_API_KEY")?;
        let policy = CompletionPolicy::default()
            .with_timeout(Duration::from_secs(self.model.timeout_secs))
            .with_max_attempts(self.model.retries);
        Ok(HttpCompletion::new(
            self.model.endpoint.clone(),
            api_key,
            self.model.model.clone(),
            policy,
        )?)
    }

    fn parse_paper(&self, input: &Path) -> Result<ParsedDocument, Box<dyn std::error::Error>> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")?
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing...");

        let bar = pb.clone();
        let mut parser = PaperParser::new(self.parse_options()).with_progress(move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        });
        if self.parse.assist {
            parser = parser.with_shared_assistant(Arc::new(self.completion()?));
        }

        let result = parser.parse_file(input);
        pb.finish_and_clear();
        Ok(result?)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(cli: &Cli, input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let doc = cli.parse_paper(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_info(cli: &Cli, input: &Path) -> CliResult {
    let doc = cli.parse_paper(input)?;

    println!("{}", "Paper Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    print_field("Title", &doc.title);
    print_field("Authors", &doc.authors.join(", "));
    print_field("Keywords", &doc.keywords.join(", "));
    print_field("Published", &doc.publish_date);
    print_field("Source", &doc.source);

    if !doc.abstract_text.is_empty() {
        println!();
        println!("{}", "Abstract".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", doc.abstract_text);
    }

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), doc.sections.len());
    println!("{}: {}", "Top-level".bold(), doc.root_sections().count());

    Ok(())
}

fn print_field(label: &str, value: &str) {
    if value.is_empty() {
        println!("{}: {}", label.bold(), "-".dimmed());
    } else {
        println!("{}: {}", label.bold(), value);
    }
}

fn cmd_sections(cli: &Cli, input: &Path) -> CliResult {
    let doc = cli.parse_paper(input)?;
    if doc.sections.is_empty() {
        println!("{}", "No section headings found".yellow());
        return Ok(());
    }
    print!("{}", render::to_outline(&doc));
    Ok(())
}

fn cmd_record(cli: &Cli, input: &Path, output: Option<&Path>) -> CliResult {
    let doc = cli.parse_paper(input)?;
    let record = doc.to_record()?;
    let json = render::to_json_value(&record, JsonFormat::Pretty)?;
    write_output(output, &json)
}

fn cmd_generate(
    cli: &Cli,
    input: &Path,
    kind: GenerationKind,
    output: Option<&Path>,
) -> CliResult {
    let client = cli.completion()?;
    let doc = cli.parse_paper(input)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Generating {}...", kind));
    spinner.enable_steady_tick(Duration::from_millis(120));
    let generation = generate(&client, PaperInfo::from(&doc), kind);
    spinner.finish_and_clear();
    let generation = generation?;

    if generation.fallback {
        eprintln!(
            "{}",
            "The model reply could not be used; showing fallback content".yellow()
        );
    }

    let json = render::to_json_value(&generation, JsonFormat::Pretty)?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "paperparse".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Academic paper structure extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["paperparse", "sections", "paper.pdf"]).unwrap();
        let options = cli.parse_options();
        assert_eq!(options.memory_limit_mb, 500);
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.link_strategy, LinkStrategy::NearestShallower);
        assert_eq!(cli.model.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "paperparse",
            "parse",
            "paper.pdf",
            "--lenient",
            "--memory-limit-mb",
            "0",
            "--strict-parents",
        ])
        .unwrap();
        let options = cli.parse_options();
        assert_eq!(options.error_mode, paperparse::ErrorMode::Lenient);
        assert_eq!(options.memory_limit_mb, 0);
        assert_eq!(options.link_strategy, LinkStrategy::PrefixValidated);
    }

    #[test]
    fn test_generate_kind() {
        let cli = Cli::try_parse_from(["paperparse", "generate", "graph", "paper.pdf"]).unwrap();
        match cli.command {
            Commands::Generate { kind, .. } => {
                assert_eq!(GenerationKind::from(kind), GenerationKind::Graph)
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_missing_file_is_error() {
        let cli = Cli::try_parse_from(["paperparse", "info", "/nonexistent/paper.pdf"]).unwrap();
        assert!(cli.parse_paper(Path::new("/nonexistent/paper.pdf")).is_err());
    }
}
