//! unnotion CLI - Notion page export tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use unnotion::fetch::{fetch_documents, NotionClient};
use unnotion::render::{to_markdown, to_markdown_batch, to_markdown_with_stats};
use unnotion::{document_from_files, slugify, Document, RenderOptions};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "unnotion")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Export Notion pages and databases to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an exported block listing to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Block listing JSON
        #[arg(value_name = "BLOCKS_JSON")]
        input: PathBuf,

        /// Page object JSON, for title and frontmatter
        #[arg(long, value_name = "PAGE_JSON")]
        page: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Omit the frontmatter header
        #[arg(long)]
        no_frontmatter: bool,

        /// Skip blank-line normalization
        #[arg(long)]
        raw: bool,
    },

    /// Show document information
    Info {
        /// Block listing JSON
        #[arg(value_name = "BLOCKS_JSON")]
        input: PathBuf,

        /// Page object JSON, for title and frontmatter
        #[arg(long, value_name = "PAGE_JSON")]
        page: Option<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download one page and write it as Markdown
    Page {
        /// Page id
        #[arg(value_name = "PAGE_ID")]
        id: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Integration token
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Download every entry of a database and write each as Markdown
    Database {
        /// Database id
        #[arg(value_name = "DATABASE_ID")]
        id: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Maximum concurrent page downloads
        #[arg(short = 'j', long, default_value = "4")]
        jobs: usize,

        /// Integration token
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Markdown {
            input,
            page,
            output,
            no_frontmatter,
            raw,
        } => cmd_markdown(&input, page.as_deref(), output.as_deref(), no_frontmatter, raw),
        Commands::Info { input, page, json } => cmd_info(&input, page.as_deref(), json),
        Commands::Page { id, output, token } => cmd_page(&id, output.as_deref(), token),
        Commands::Database {
            id,
            output,
            jobs,
            token,
        } => cmd_database(&id, output.as_deref(), jobs, token),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_markdown(
    input: &Path,
    page: Option<&Path>,
    output: Option<&Path>,
    no_frontmatter: bool,
    raw: bool,
) -> CliResult {
    let doc = document_from_files(page, input)?;

    let options = RenderOptions::new()
        .with_frontmatter(!no_frontmatter)
        .with_normalize(!raw);

    let markdown = to_markdown(&doc, &options)?;

    if let Some(path) = output {
        fs::write(path, &markdown)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", markdown);
    }

    Ok(())
}

fn cmd_info(input: &Path, page: Option<&Path>, json: bool) -> CliResult {
    let doc = document_from_files(page, input)?;
    let result = to_markdown_with_stats(&doc, &RenderOptions::new())?;
    let stats = &result.stats;

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Id".bold(), doc.id);
    if let Some(ref title) = result.title {
        println!("{}: {}", "Title".bold(), title);
    }

    if !doc.frontmatter.is_empty() {
        println!();
        println!("{}", "Frontmatter".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (key, value) in doc.frontmatter.iter() {
            println!("{}: {}", key.bold(), value);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Blocks".bold(), stats.block_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if stats.unsupported_count > 0 {
        println!(
            "{}: {}",
            "Unsupported".yellow().bold(),
            stats.unsupported_count
        );
    }

    Ok(())
}

fn cmd_page(id: &str, output: Option<&Path>, token: String) -> CliResult {
    let output_dir = output_dir(output)?;
    let client = NotionClient::new(token)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Fetching {}...", id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let rt = tokio::runtime::Runtime::new()?;
    let doc = rt.block_on(client.fetch_document(id))?;
    spinner.finish_and_clear();

    let markdown = to_markdown(&doc, &RenderOptions::new())?;
    let path = output_dir.join(file_name(&doc));
    fs::write(&path, &markdown)?;

    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_database(id: &str, output: Option<&Path>, jobs: usize, token: String) -> CliResult {
    let output_dir = output_dir(output)?;
    let client = Arc::new(NotionClient::new(token)?);
    let rt = tokio::runtime::Runtime::new()?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Querying database...");
    let entries = rt.block_on(client.query_database(id))?;
    let ids: Vec<String> = entries.into_iter().map(|page| page.id).collect();
    pb.inc(1);

    pb.set_message(format!("Downloading {} pages...", ids.len()));
    let limit = Arc::new(Semaphore::new(jobs.max(1)));
    let fetched = rt.block_on(fetch_documents(client, ids.clone(), limit));
    pb.inc(1);

    let mut failures: Vec<(String, String)> = Vec::new();
    let mut docs = Vec::new();
    for (page_id, result) in ids.iter().zip(fetched) {
        match result {
            Ok(doc) => docs.push(doc),
            Err(e) => failures.push((page_id.clone(), e.to_string())),
        }
    }
    log::debug!("Fetched {} of {} pages", docs.len(), ids.len());

    pb.set_message("Rendering Markdown...");
    let rendered = to_markdown_batch(&docs, &RenderOptions::new());
    let mut names = FileNames::default();
    let mut written = Vec::new();
    for (doc, result) in docs.iter().zip(rendered) {
        match result {
            Ok(markdown) => {
                let name = names.claim(doc);
                fs::write(output_dir.join(&name), &markdown)?;
                written.push(name);
            }
            Err(e) => failures.push((doc.id.clone(), e.to_string())),
        }
    }
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    if failures.is_empty() {
        return Ok(());
    }

    println!("\n{}", "Failed entries:".red().bold());
    for (page_id, message) in &failures {
        println!("  {} {}: {}", "✗".red(), page_id, message);
    }

    Err(format!("{} of {} entries failed", failures.len(), ids.len()).into())
}

fn output_dir(output: Option<&Path>) -> Result<PathBuf, std::io::Error> {
    let dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `<slug>.md`, or `<id>.md` for untitled pages.
fn file_name(doc: &Document) -> String {
    format!("{}.md", file_stem(doc))
}

fn file_stem(doc: &Document) -> String {
    let slug = doc.title.as_deref().map(slugify).unwrap_or_default();
    if slug.is_empty() {
        doc.id.clone()
    } else {
        slug
    }
}

/// Output names handed out during one export. A name that is already taken
/// gets `_` appended to its stem until it is free.
#[derive(Default)]
struct FileNames {
    used: HashSet<String>,
}

impl FileNames {
    fn claim(&mut self, doc: &Document) -> String {
        let mut stem = file_stem(doc);
        while self.used.contains(&stem) {
            stem.push('_');
        }
        let name = format!("{}.md", stem);
        self.used.insert(stem);
        name
    }
}

fn cmd_version() {
    println!("{} {}", "unnotion".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Notion page export tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unnotion".dimmed());
    println!("License: MIT");
}
