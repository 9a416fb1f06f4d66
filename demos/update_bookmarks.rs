use anyhow::Result;
use bookmark_time_updater::bookmarks::{
    check_ready, extract_urls, read_document, today, update_document, write_document, Settings,
    OUTPUT_PREFIX, PREVIEW_URL_CHARS,
};
use bookmark_time_updater::utils::logger::init_logger;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "update_bookmarks")]
#[command(about = "Re-points Hunt/Test bookmarks at the time ranges in a settings file", long_about = None)]
struct Cli {
    /// Exported bookmarks HTML file
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Settings file with [options], [hunts.HuntN] and [tests.TestN] tables
    #[arg(short = 'c', long = "config")]
    config_path: Option<PathBuf>,

    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    #[arg(long = "prefix", default_value = OUTPUT_PREFIX)]
    prefix: String,

    /// Only list the recognised bookmarks, as JSON
    #[arg(long)]
    preview: bool,

    #[arg(long = "log-dir")]
    log_dir: Option<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    match &args.log_dir {
        Some(dir) => {
            let log_file = init_logger(dir)?;
            println!("Logging to {}", log_file.display());
        }
        None => tracing_subscriber::fmt::init(),
    }

    let content = read_document(&args.input)?;

    if args.preview {
        let urls = extract_urls(&content);
        if urls.is_empty() {
            println!("No compatible URLs detected");
            return Ok(());
        }
        for url in &urls {
            println!("[{}] {}\n    {}", url.dialect, url.display_title(), url.excerpt(PREVIEW_URL_CHARS));
        }
        println!("{}", serde_json::to_string_pretty(&urls)?);
        return Ok(());
    }

    let settings = Settings::load(args.config_path.as_deref())?;
    let hunts = settings.hunt_config();
    let tests = settings.test_config();
    println!(
        "Hunts configured: {}, tests configured: {}",
        hunts.configured_count(),
        tests.configured_count()
    );

    if let Err(e) = check_ready(&content, &hunts, &tests) {
        // Not a failure, there is just nothing to do
        println!("{}", e);
        return Ok(());
    }

    let report = update_document(&content, &hunts, &tests, &settings.options)?;
    println!("{}", report.summary());

    let path = write_document(&args.output_dir, &args.prefix, &report.content, today())?;
    println!("Updated bookmarks written to {}", path.display());

    Ok(())
}
