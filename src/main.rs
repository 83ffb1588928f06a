//! cardeck - Markdown to social-card deck exporter

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use cardeck::deck::Deck;
use cardeck::export::{Pipeline, Progress, RasterCapturer};
use cardeck::fit::fit;
use cardeck::model::Document;
use cardeck::render::{CONTENT_HEIGHT, SlideMeasure, parse_blocks};

#[derive(Parser)]
#[command(name = "cardeck")]
#[command(version, about = "Markdown to social-card deck exporter", long_about = None)]
#[command(after_help = "EXAMPLES:
    cardeck notes.md cards/       Export each slide as a PNG
    cardeck notes.md deck.zip     Export all slides as one archive
    cardeck -i notes.md           Show deck stats without exporting")]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output directory, or a .zip path for an archive
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<String>,

    /// Show deck stats without exporting
    #[arg(short, long)]
    info: bool,

    /// Theme id (notebook, grid, latte, midnight, editorial)
    #[arg(long)]
    theme: Option<String>,

    /// Font id (sans, serif, rounded, hand, mincho, modern, elegant, mono)
    #[arg(long)]
    font: Option<String>,

    /// Deck title, used for output file names (defaults to the input stem)
    #[arg(long)]
    title: Option<String>,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = if cli.info {
        show_info(&cli)
    } else {
        convert(&cli)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_document(cli: &Cli) -> Result<Document, String> {
    let markdown = std::fs::read_to_string(&cli.input).map_err(|e| e.to_string())?;
    let mut doc = Document::new(markdown);
    doc.title = cli.title.clone().unwrap_or_else(|| {
        Path::new(&cli.input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string())
    });
    if let Some(theme) = &cli.theme {
        doc.theme_id = theme.clone();
    }
    if let Some(font) = &cli.font {
        doc.font_id = font.clone();
    }
    Ok(doc)
}

fn show_info(cli: &Cli) -> Result<(), String> {
    let doc = load_document(cli)?;
    let deck = Deck::from_markdown(doc.markdown());
    let pipeline = Pipeline::for_document(&doc);

    println!("File: {}", cli.input);
    println!("Title: {}", doc.title);
    println!("Theme: {}", pipeline.theme().name);
    println!("Slides: {}", deck.len());
    for (index, text) in deck.iter() {
        let blocks = parse_blocks(text);
        let fitted = fit(&SlideMeasure::new(&blocks, index == 0), CONTENT_HEIGHT);
        let flag = if fitted.overflowing { "  [overflow]" } else { "" };
        println!(
            "  {:>2}. scale {:>3}%{}",
            index + 1,
            fitted.scale.percent(),
            flag
        );
    }
    Ok(())
}

fn convert(cli: &Cli) -> Result<(), String> {
    let doc = load_document(cli)?;
    let deck = Deck::from_markdown(doc.markdown());
    if deck.is_empty() {
        return Err("document has no slides".to_string());
    }

    let base_dir = Path::new(&cli.input)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let pipeline = Pipeline::for_document(&doc).with_base_dir(base_dir);
    let mut capturer = RasterCapturer::new();

    let output = cli.output.as_deref().expect("output required");
    let quiet = cli.quiet;
    let progress = |p: Progress| {
        if !quiet {
            println!("  {}/{}", p.completed, p.total);
        }
    };

    let outcome = if output.ends_with(".zip") {
        pipeline
            .export_archive_to_file(&mut capturer, &deck, Path::new(output), progress)
            .map_err(|e| e.to_string())?
    } else {
        pipeline
            .export_deck_to_dir(&mut capturer, &deck, Path::new(output), progress)
            .map_err(|e| e.to_string())?
    };

    if !cli.quiet {
        println!(
            "wrote {} slide(s) to {output}",
            outcome.exported.len()
        );
    }
    for index in &outcome.skipped {
        eprintln!("warning: slide {} skipped (capture failed)", index + 1);
    }
    Ok(())
}
