//! comic-enhance - Apply reading enhancements to a saved comic page

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use url::Url;

use comic_enhance::{ComicConfig, LoadOutcome, Page, enhance_comic};

#[derive(Parser)]
#[command(name = "comic-enhance")]
#[command(version, about = "Apply reading enhancements to a comic page", long_about = None)]
#[command(after_help = "EXAMPLES:
    comic-enhance page.html -c site.json             Print the enhanced page
    comic-enhance page.html -c site.json --press ArrowRight --effects
                                                     Show where the next-page key leads")]
struct Cli {
    /// Saved HTML page
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON enhancement configuration
    #[arg(short, long, value_name = "CONFIG")]
    config: PathBuf,

    /// URL the page was fetched from, for resolving relative links
    #[arg(short, long, value_name = "URL")]
    base_url: Option<Url>,

    /// Treat every image as loaded after enhancing
    #[arg(long)]
    load_images: bool,

    /// Press a key after enhancing (repeatable)
    #[arg(long = "press", value_name = "KEY")]
    keys: Vec<String>,

    /// Write the enhanced page here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Print requested host actions as JSON to stderr
    #[arg(long)]
    effects: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> comic_enhance::Result<()> {
    let config = ComicConfig::from_path(&cli.config)?;
    let html = fs::read(&cli.input)?;

    let mut page = Page::parse_bytes(&html);
    if let Some(base) = &cli.base_url {
        page = page.with_base_url(base.clone());
    }

    enhance_comic(&mut page, &config)?;

    if cli.load_images {
        for image in page.pending_images() {
            page.settle_image(image, LoadOutcome::Loaded)?;
        }
    }
    for key in &cli.keys {
        let handled = page.press_key(key)?;
        log::debug!("pressed {key:?}, default prevented: {handled}");
    }

    let rendered = page.to_html();
    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    if cli.effects {
        let journal = serde_json::to_string_pretty(page.effects())?;
        eprintln!("{journal}");
    }
    Ok(())
}
