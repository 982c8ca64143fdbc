//! lrf - Sony BBeB ebook reader

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};

use lrf::export::{ExportConfig, to_html, to_lrs};
use lrf::{Document, ObjectKind, ParseOptions, TrailerPolicy};

#[derive(Parser)]
#[command(name = "lrf")]
#[command(version, about = "Sony BBeB (LRF) ebook reader", long_about = None)]
#[command(after_help = "EXAMPLES:
    lrf book.lrf                  Print LRS-XML to stdout
    lrf book.lrf -o book.lrs      Write LRS-XML to a file
    lrf --html book.lrf -o b.html Write HTML
    lrf -i book.lrf               Show header and metadata
    lrf --extract out book.lrf    Write embedded images and fonts")]
struct Cli {
    /// Input LRF file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Emit HTML instead of LRS-XML
    #[arg(long)]
    html: bool,

    /// Show header and book metadata without converting
    #[arg(short, long)]
    info: bool,

    /// With --info, print JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Write embedded images and fonts into DIR
    #[arg(long, value_name = "DIR")]
    extract: Option<String>,

    /// Accept streams that lack their end-of-stream tag
    #[arg(long)]
    lenient_trailers: bool,

    /// Do not indent the output
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = ParseOptions {
        trailer: if cli.lenient_trailers {
            TrailerPolicy::Optional
        } else {
            TrailerPolicy::default()
        },
        ..ParseOptions::default()
    };
    let doc = Document::open_with(&cli.input, &options).map_err(|e| e.to_string())?;

    if cli.info {
        return show_info(&cli.input, &doc, cli.json);
    }
    if let Some(dir) = &cli.extract {
        return extract(&doc, Path::new(dir));
    }

    let config = ExportConfig {
        pretty: !cli.compact,
        ..ExportConfig::default()
    };
    let output = if cli.html {
        to_html(&doc, &config)
    } else {
        to_lrs(&doc, &config)
    }
    .map_err(|e| e.to_string())?;

    match &cli.output {
        Some(path) => fs::write(path, output).map_err(|e| format!("{path}: {e}")),
        None => {
            print!("{output}");
            Ok(())
        }
    }
}

fn show_info(path: &str, doc: &Document, json: bool) -> Result<(), String> {
    if json {
        let value = serde_json::json!({
            "file": path,
            "header": doc.header(),
            "info": doc.info(),
            "objects": doc.len(),
            "pages": doc.pages().len(),
            "toc_entries": doc.toc().len(),
        });
        let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("File: {path}");
    if let Some(header) = doc.header() {
        println!("Version: {}", header.version);
        println!(
            "Screen: {}x{} at {} dpi, {}-bit",
            header.width, header.height, header.dpi, header.color_depth
        );
        println!("Binding: {:?}", header.binding);
    }
    if let Some(meta) = doc.info() {
        println!("Title: {}", meta.title);
        if !meta.author.is_empty() {
            println!("Author: {}", meta.author);
        }
        if let Some(ref publisher) = meta.publisher {
            println!("Publisher: {publisher}");
        }
        if let Some(ref language) = meta.language {
            println!("Language: {language}");
        }
        if let Some(ref desc) = meta.free_text {
            let desc = desc.trim();
            match desc.char_indices().nth(200) {
                Some((cut, _)) => println!("Description: {}...", &desc[..cut]),
                None => println!("Description: {desc}"),
            }
        }
    }
    println!("Objects: {}", doc.len());
    println!("Pages: {}", doc.pages().len());
    println!("TOC entries: {}", doc.toc().len());
    println!("Images: {}", doc.images().len());
    println!("Fonts: {}", doc.fonts().len());

    Ok(())
}

fn extract(doc: &Document, dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))?;

    let mut written = 0;
    let resources = doc
        .objects_of(ObjectKind::ImageStream)
        .chain(doc.objects_of(ObjectKind::Font));
    for object in resources {
        let (Some(name), Ok(data)) = (object.file_name(), object.stream_data()) else {
            continue;
        };
        let path = dir.join(name);
        fs::write(&path, data).map_err(|e| format!("{}: {e}", path.display()))?;
        written += 1;
    }
    if let Some(thumbnail) = doc.thumbnail() {
        let ext = doc
            .header()
            .and_then(|header| header.thumbnail_format())
            .map_or("bin", |format| format.extension());
        let path = dir.join(format!("thumbnail.{ext}"));
        fs::write(&path, thumbnail).map_err(|e| format!("{}: {e}", path.display()))?;
        written += 1;
    }

    info!("wrote {written} files to {}", dir.display());
    Ok(())
}
