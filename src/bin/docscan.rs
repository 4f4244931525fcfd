//! Command-line driver for table detection and scan checks.
//!
//! Usage:
//!   docscan tables docs/test/test.docx --corpus data --output extracted_images
//!   docscan scan vov1.jpg --output output_images --docx docs/test/test.docx
//!
//! Set `RUST_LOG` (or pass `--verbose`) for diagnostics.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docscan::extractors::{source_for_path, DirectorySource};
use docscan::pipeline::{ScanPipeline, TablePipeline};
use docscan::writer::{DirectorySink, ImageSink};
use docscan::{RasterImage, ReferenceCorpus, Result, ScanConfig};

#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(version, about = "Table detection and scan quality checks for document images", long_about = None)]
struct Cli {
    /// JSON configuration file overriding the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug diagnostics (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the images that contain tables and report table coordinates
    Tables {
        /// A .docx document, an image directory, or a single image
        input: PathBuf,

        /// Directory of reference table images
        #[arg(long)]
        corpus: PathBuf,

        /// Write the extracted images to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check quality and orientation of one image and de-skew it
    Scan {
        /// Image file
        image: PathBuf,

        /// Directory for the original, monochrome and corrected images
        #[arg(short, long, default_value = "output_images")]
        output: PathBuf,

        /// Also embed the corrected image into a new Word document
        #[arg(long)]
        docx: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    let outcome = match cli.command {
        Commands::Tables {
            input,
            corpus,
            output,
            json,
        } => run_tables(&config, &input, &corpus, output.as_deref(), json),
        Commands::Scan {
            image,
            output,
            docx,
            json,
        } => run_scan(&config, &image, &output, docx.as_deref(), json),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::from_json_file(path),
        None => Ok(ScanConfig::default()),
    }
}

/// Returns `Ok(false)` when some images failed.
fn run_tables(
    config: &ScanConfig,
    input: &Path,
    corpus: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<bool> {
    let corpus = ReferenceCorpus::load(&DirectorySource::new(corpus))?;
    if corpus.is_empty() {
        log::warn!("Reference corpus is empty; no image will be classified as a table");
    }

    let source = source_for_path(input)?;
    let sink = output.map(DirectorySink::new);
    let report = TablePipeline::from_config(config).run(
        source.as_ref(),
        &corpus,
        sink.as_ref().map(|s| s as &dyn ImageSink),
    )?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        for image in &report.images {
            if image.contains_table() || image.is_failure() {
                println!("{}", image);
            }
        }
    }
    Ok(report.failures() == 0)
}

fn run_scan(
    config: &ScanConfig,
    image: &Path,
    output: &Path,
    docx: Option<&Path>,
    json: bool,
) -> Result<bool> {
    let raster = RasterImage::open(image)?;
    let pipeline = ScanPipeline::from_config(config);
    let outputs = pipeline.analyze(&raster)?;
    pipeline.write(&raster, &outputs, &DirectorySink::new(output))?;
    if let Some(path) = docx {
        write_docx(path, &outputs.corrected)?;
    }
    let report = outputs.report;
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(true)
}

#[cfg(feature = "office")]
fn write_docx(path: &Path, corrected: &RasterImage) -> Result<()> {
    use docscan::pipeline::scan::CORRECTED_IMAGE;
    use docscan::writer::DocxSink;

    DocxSink::new(path).with_title("").put(CORRECTED_IMAGE, corrected)
}

#[cfg(not(feature = "office"))]
fn write_docx(_path: &Path, _corrected: &RasterImage) -> Result<()> {
    Err(docscan::Error::Unsupported(
        "writing DOCX requires the `office` feature".to_string(),
    ))
}
