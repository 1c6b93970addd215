use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use booksmith::config::AppConfig;
use booksmith::core::book_gen::{
    generate_book, long_form_request, BookAssembler, LongFormCache,
};
use booksmith::core::export::{ChartCardCapture, ExportPipeline};

/// Generate a 15-chapter study book and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "booksmith", version)]
struct Cli {
    /// Book topic, at least 3 characters
    topic: Option<String>,

    /// Target audience
    audience: Option<String>,

    /// Writing tone
    tone: Option<String>,

    /// Target words per chapter (clamped to 4500..=5200)
    #[arg(long)]
    words: Option<u32>,

    /// Print the long-form text of chapter N instead of the outline
    #[arg(long, value_name = "N")]
    text: Option<u32>,

    /// Generate every chapter's text and print word counts
    #[arg(long, conflicts_with = "text")]
    stats: bool,

    /// Export the book as a PDF of chart cards into DIR (default: config output dir)
    #[arg(
        long,
        value_name = "DIR",
        num_args = 0..=1,
        conflicts_with_all = ["text", "stats"]
    )]
    export: Option<Option<PathBuf>>,

    /// Config file (default: ~/.config/booksmith/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let _log_guard = booksmith::core::logging::init(&config.logging, &config.log_dir());
    log::info!("{} v{} starting", booksmith::NAME, booksmith::VERSION);

    let mut options = config.book_options(
        cli.topic.as_deref(),
        cli.audience.as_deref(),
        cli.tone.as_deref(),
    );
    if let Some(words) = cli.words {
        options.min_words_per_chapter = words;
    }

    let book = generate_book(&options).context("Invalid book options")?;

    if let Some(index) = cli.text {
        let Some(chapter) = book.chapter(index) else {
            bail!("Chapter {index} does not exist (book has {} chapters)", book.chapters.len());
        };
        let cache = LongFormCache::with_capacity(config.cache.capacity);
        let text = cache.get_or_generate(&long_form_request(&book, chapter));
        if text.bound_exceeded {
            log::warn!(
                "Chapter {index} is {} words short of its target",
                text.shortfall()
            );
        }
        println!("{}", text.text);
    } else if let Some(dir) = cli.export {
        let dir = dir.unwrap_or_else(|| config.output_dir());
        let page = config.page_spec().context("Invalid export settings")?;
        let path = ExportPipeline::with_page(ChartCardCapture::default(), page)
            .export(&book, &dir)
            .context("Export failed")?;
        println!("{}", path.display());
    } else if cli.stats {
        let cache = LongFormCache::with_capacity(config.cache.capacity.max(book.chapters.len()));
        let texts = BookAssembler::new().precompute_long_form(&book, &cache);
        for (chapter, text) in book.chapters.iter().zip(&texts) {
            println!(
                "{:>2}  {:>5} words  {:>3} paragraphs  {}",
                chapter.index,
                text.word_count,
                text.paragraph_count(),
                chapter.title
            );
        }
    } else {
        println!("{}", book.to_json().context("Failed to serialize book")?);
    }

    Ok(())
}
