//! Catalogue browser binary entry point.
//!
//! This binary loads a publication catalogue from a static JSON file and lets
//! you filter it, page through it, and rank it against an abstract of your own.
//! It supports both single-shot and interactive REPL modes, with table or JSON
//! output.
//!
//! # Examples
//!
//! First page of the catalogue:
//! ```bash
//! catalogue --data publications.json
//! ```
//!
//! Rank by similarity to an abstract, networking papers only:
//! ```bash
//! catalogue --compare "We study congestion control in data centers." --area Networking
//! ```
//!
//! Interactive mode:
//! ```bash
//! catalogue --data publications.json --interactive
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use paper_similarity::{
    catalogue::{Catalogue, CatalogueConfig, RecordView},
    models::SimilarityBand,
    provider::json::JsonFileSource,
    query::Scoring,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for catalogue pages
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-friendly table with colored similarity bands
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Similarity scorer selection
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoringArg {
    /// Raw term-frequency cosine similarity (default)
    TermFrequency,
    /// Term frequency weighted by corpus IDF
    TfIdf,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::TermFrequency => Scoring::TermFrequency,
            ScoringArg::TfIdf => Scoring::TfIdf,
        }
    }
}

/// Browse a publication catalogue and find publications similar to an abstract
#[derive(Parser, Debug)]
#[command(
    name = "catalogue",
    version,
    about = "Browse a publication catalogue and rank it by similarity to an abstract",
    long_about = "Load a static publication catalogue, filter it by research area, title or \
                  author, page through it, and rank it by lexical similarity to an abstract.

EXAMPLES:
  First page:
    catalogue --data publications.json

  Compare against an abstract:
    catalogue --compare \"We study congestion control in data centers.\"

  Compare against an abstract stored in a file, JSON output:
    catalogue --compare-file abstract.txt --format json

  Filtered, third page:
    catalogue --area Networking --author lovelace --page 3

  Interactive mode:
    catalogue --interactive"
)]
struct Args {
    /// Catalogue JSON file
    #[arg(long, value_name = "PATH", default_value = "publications.json")]
    data: PathBuf,

    /// Abstract to rank the catalogue against
    #[arg(long, value_name = "TEXT", conflicts_with = "compare_file")]
    compare: Option<String>,

    /// File containing the abstract to rank the catalogue against
    #[arg(long, value_name = "PATH")]
    compare_file: Option<PathBuf>,

    /// Keep publications in this research area (repeatable)
    #[arg(long, value_name = "AREA")]
    area: Vec<String>,

    /// Keep publications whose title contains this text
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Keep publications with an author whose name contains this text
    #[arg(long, value_name = "TEXT")]
    author: Option<String>,

    /// Page to show
    #[arg(long, value_name = "N", default_value = "1")]
    page: usize,

    /// Publications per page
    #[arg(long, value_name = "N", default_value = "10")]
    page_size: usize,

    /// Similarity scorer
    #[arg(long, value_enum, default_value = "term-frequency")]
    scoring: ScoringArg,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// List the research areas in the catalogue and exit
    #[arg(long, conflicts_with = "interactive")]
    list_areas: bool,

    /// Enable interactive REPL mode
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

/// Truncate to at most `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

fn band_color(band: SimilarityBand) -> Color {
    match band {
        SimilarityBand::High => Color::Green,
        SimilarityBand::Medium => Color::Yellow,
        SimilarityBand::Low => Color::White,
    }
}

/// Format the current page as a pretty table
fn format_page_table(catalogue: &Catalogue) -> String {
    let page = catalogue.page();
    if page.records.is_empty() {
        return "No publications found.".to_string();
    }

    let scored = catalogue.comparison().is_some();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Authors").add_attribute(Attribute::Bold),
        Cell::new("Date").add_attribute(Attribute::Bold),
    ];
    if scored {
        header.push(Cell::new("Similarity").add_attribute(Attribute::Bold));
    }
    header.push(Cell::new("Value").add_attribute(Attribute::Bold));
    table.set_header(header);

    for (idx, record) in page.records.iter().enumerate() {
        let view = RecordView::from(*record);

        let mut row = vec![
            Cell::new(page.start + idx),
            Cell::new(truncate(&view.title, 60)),
            Cell::new(truncate(&view.authors.join(", "), 40)),
            Cell::new(&view.publication_date),
        ];
        if scored {
            let cell = match (view.similarity.as_deref(), view.band) {
                (Some(text), Some(band)) => Cell::new(text).fg(band_color(band)),
                _ => Cell::new("-"),
            };
            row.push(cell);
        }
        row.push(Cell::new(truncate(&view.value_summary, 100)));
        table.add_row(row);
    }

    table.to_string()
}

/// Format the current page as JSON
fn format_page_json(catalogue: &Catalogue) -> Result<String> {
    let page = catalogue.page();
    let results: Vec<RecordView> = page.records.iter().map(|r| RecordView::from(*r)).collect();
    let payload = json!({
        "summary": catalogue.results_summary(),
        "page": page.number,
        "total_pages": page.total_pages,
        "comparison": catalogue.comparison(),
        "filters": catalogue.filters(),
        "results": results,
    });
    serde_json::to_string_pretty(&payload).with_context(|| "Failed to serialize page to JSON")
}

/// Print the current page in the chosen format
fn print_page(catalogue: &Catalogue, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", catalogue.results_summary());
            println!("{}", format_page_table(catalogue));
            let page = catalogue.page();
            if page.total_pages > 0 {
                println!("Page {} of {}", page.number, page.total_pages);
            }
        }
        OutputFormat::Json => println!("{}", format_page_json(catalogue)?),
    }
    Ok(())
}

/// Display detailed view of a single record on the current page
fn display_record_detail(catalogue: &Catalogue, position: usize) {
    let page = catalogue.page();
    let Some(record) = position
        .checked_sub(page.start)
        .and_then(|offset| page.records.get(offset))
    else {
        eprintln!(
            "#{} is not on this page (showing {}-{})",
            position, page.start, page.end
        );
        return;
    };
    let view = RecordView::from(*record);

    println!("\n{}", "═".repeat(80));
    println!("Title: {}", view.title);
    println!("Authors: {}", view.authors.join(", "));
    println!("Areas: {}", view.research_areas.join(", "));
    println!("Date: {}", view.publication_date);
    println!("URL: {}", view.url);
    if let Some(similarity) = &view.similarity {
        println!("Similarity: {}", similarity);
    }
    println!("\nValue: {}", view.value_summary);
    println!("\nAbstract:\n{}", record.abstract_text);
    println!("{}", "═".repeat(80));
}

fn print_help() {
    println!("Commands:");
    println!("  <abstract>       - Rank the catalogue by similarity to this abstract");
    println!("  /reset           - Clear the comparison scores");
    println!("  /next, /prev     - Move between pages");
    println!("  /page N          - Jump to page N");
    println!("  /area AREA       - Add a research area filter");
    println!("  /area clear      - Clear the research area filter");
    println!("  /areas           - List research areas");
    println!("  /title [TEXT]    - Filter by title (no text clears)");
    println!("  /author [TEXT]   - Filter by author (no text clears)");
    println!("  /clear           - Clear all filters");
    println!("  /format table    - Use table output format");
    println!("  /format json     - Use JSON output format");
    println!("  /detail N        - Show full details for publication #N");
    println!("  /help            - Show this help");
    println!("  Ctrl+D or Ctrl+C - Exit");
}

/// Handle one slash command. Returns whether the page should be re-rendered.
fn handle_command(catalogue: &mut Catalogue, line: &str, format: &mut OutputFormat) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/help" => {
            print_help();
            false
        }
        "/reset" => {
            catalogue.clear_comparison();
            true
        }
        "/next" => {
            if !catalogue.next_page() {
                eprintln!("Already on the last page");
            }
            true
        }
        "/prev" => {
            if !catalogue.prev_page() {
                eprintln!("Already on the first page");
            }
            true
        }
        "/page" => match rest.parse::<usize>() {
            Ok(n) => match catalogue.go_to_page(n) {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("{}", e);
                    false
                }
            },
            Err(_) => {
                eprintln!("Usage: /page N");
                false
            }
        },
        "/area" => {
            if rest.is_empty() {
                eprintln!("Usage: /area AREA  or  /area clear");
                false
            } else if rest == "clear" {
                catalogue.set_areas(Vec::<String>::new());
                true
            } else {
                if !catalogue.research_areas().iter().any(|a| a == rest) {
                    eprintln!("Note: no publication is tagged '{}'", rest);
                }
                catalogue.add_area(rest);
                true
            }
        }
        "/areas" => {
            for area in catalogue.research_areas() {
                println!("  {}", area);
            }
            false
        }
        "/title" => {
            catalogue.set_title_filter(rest);
            true
        }
        "/author" => {
            catalogue.set_author_filter(rest);
            true
        }
        "/clear" => {
            catalogue.clear_filters();
            true
        }
        "/format" => match rest {
            "table" => {
                *format = OutputFormat::Table;
                println!("Set output format to table");
                false
            }
            "json" => {
                *format = OutputFormat::Json;
                println!("Set output format to JSON");
                false
            }
            _ => {
                eprintln!("Invalid format: must be 'table' or 'json'");
                false
            }
        },
        "/detail" => {
            match rest.parse::<usize>() {
                Ok(n) if n > 0 => display_record_detail(catalogue, n),
                _ => eprintln!("Invalid number: must be a positive integer"),
            }
            false
        }
        _ => {
            eprintln!("Unknown command: {}. Type /help for available commands.", command);
            false
        }
    }
}

/// Run interactive REPL mode
fn run_interactive(mut catalogue: Catalogue, mut format: OutputFormat) -> Result<()> {
    println!("Interactive Publication Catalogue");
    print_help();
    println!();
    print_page(&catalogue, format)?;

    let mut rl = DefaultEditor::new().with_context(|| "Failed to create readline editor")?;

    loop {
        match rl.readline("Catalogue> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line).ok();

                let rerender = if line.starts_with('/') {
                    handle_command(&mut catalogue, line, &mut format)
                } else {
                    let start = Instant::now();
                    match catalogue.compare(line) {
                        Ok(()) => {
                            debug!("Ranked catalogue in {:.3}s", start.elapsed().as_secs_f64());
                            true
                        }
                        Err(e) => {
                            eprintln!("{}", e);
                            false
                        }
                    }
                };

                if rerender {
                    if let Err(e) = print_page(&catalogue, format) {
                        eprintln!("Error rendering page: {}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!("Error reading input: {}", err);
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);

    if args.page == 0 {
        anyhow::bail!("Invalid page: pages start at 1");
    }
    if args.page_size == 0 {
        anyhow::bail!("Invalid page size: must be at least 1");
    }

    if !args.data.exists() {
        anyhow::bail!(
            "Catalogue file not found: {}\n\
             Pass the catalogue JSON with --data PATH.",
            args.data.display()
        );
    }

    let config = CatalogueConfig {
        page_size: args.page_size,
        scoring: args.scoring.into(),
    };

    let source = JsonFileSource::new(&args.data);
    let mut catalogue = Catalogue::load(&source, config)
        .await
        .with_context(|| format!("Failed to load catalogue from {}", args.data.display()))?;

    info!("Catalogue contains {} publications", catalogue.len());

    if args.list_areas {
        for area in catalogue.research_areas() {
            println!("{}", area);
        }
        return Ok(());
    }

    if !args.area.is_empty() {
        catalogue.set_areas(args.area.iter().cloned());
    }
    if let Some(title) = &args.title {
        catalogue.set_title_filter(title.as_str());
    }
    if let Some(author) = &args.author {
        catalogue.set_author_filter(author.as_str());
    }

    let query = match (&args.compare, &args.compare_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read abstract from {}", path.display()))?,
        ),
        (None, None) => None,
    };

    if let Some(query) = query {
        let start = Instant::now();
        catalogue
            .compare(&query)
            .with_context(|| "Failed to rank catalogue")?;
        info!("Ranked catalogue in {:.3}s", start.elapsed().as_secs_f64());
    }

    if args.interactive {
        return run_interactive(catalogue, args.format);
    }

    catalogue
        .go_to_page(args.page)
        .with_context(|| format!("Cannot show page {}", args.page))?;
    print_page(&catalogue, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_similarity::models::{CatalogueData, PublicationRecord};

    fn catalogue() -> Catalogue {
        let publications = (1..=12)
            .map(|i| {
                PublicationRecord::new(format!("Paper {}", i), "We improve network throughput.")
                    .with_authors(["Ada Lovelace"])
                    .with_areas(["Networking"])
            })
            .collect();
        Catalogue::from_data(
            CatalogueData {
                publications,
                last_updated: Some("2024-05-01".to_string()),
            },
            CatalogueConfig::default(),
        )
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_page_commands() {
        let mut catalogue = catalogue();
        let mut format = OutputFormat::Table;
        assert!(handle_command(&mut catalogue, "/next", &mut format));
        assert_eq!(catalogue.current_page(), 2);
        assert!(handle_command(&mut catalogue, "/page 1", &mut format));
        assert_eq!(catalogue.current_page(), 1);
        assert!(!handle_command(&mut catalogue, "/page 9", &mut format));
        assert!(!handle_command(&mut catalogue, "/page x", &mut format));
    }

    #[test]
    fn test_filter_commands() {
        let mut catalogue = catalogue();
        let mut format = OutputFormat::Table;
        handle_command(&mut catalogue, "/title paper 1", &mut format);
        assert_eq!(catalogue.filters().title, "paper 1");
        assert_eq!(catalogue.filtered().len(), 4);

        handle_command(&mut catalogue, "/title", &mut format);
        assert!(catalogue.filters().title.is_empty());

        handle_command(&mut catalogue, "/area Networking", &mut format);
        assert!(catalogue.filters().areas.contains("Networking"));
        handle_command(&mut catalogue, "/clear", &mut format);
        assert!(catalogue.filters().is_empty());
    }

    #[test]
    fn test_format_command() {
        let mut catalogue = catalogue();
        let mut format = OutputFormat::Table;
        handle_command(&mut catalogue, "/format json", &mut format);
        assert!(matches!(format, OutputFormat::Json));
    }

    #[test]
    fn test_json_output() {
        let mut catalogue = catalogue();
        catalogue.compare("network throughput").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_page_json(&catalogue).unwrap()).unwrap();
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["results"].as_array().unwrap().len(), 10);
        assert_eq!(json["results"][0]["band"], "high");
        assert_eq!(json["comparison"], "network throughput");
    }

    #[test]
    fn test_table_output_has_similarity_column_only_when_compared() {
        let mut catalogue = catalogue();
        assert!(!format_page_table(&catalogue).contains("Similarity"));
        catalogue.compare("network throughput").unwrap();
        assert!(format_page_table(&catalogue).contains("Similarity"));
    }
}
