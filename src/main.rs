use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use dirfeed::{
    CacheOptions, CachedFeed, Completion, DescriptionSource, DirectoryPodcast, FeedConfig,
    NoopReporter, ProgressEvent, ProgressReporter, ScanOptions, SharedProgressReporter,
};

// Emoji with fallback for terminals without Unicode support
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static RECYCLE: Emoji<'_, '_> = Emoji("♻️  ", "[=] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Generate a podcast RSS feed from a directory of audio files
#[derive(Parser, Debug)]
#[command(name = "dirfeed")]
#[command(about = "Generate a podcast RSS feed from a directory of audio files")]
#[command(version)]
struct Args {
    /// Directory containing the episode files
    #[arg(default_value = ".")]
    media_dir: PathBuf,

    /// Write the feed to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Public base URL of the media directory
    #[arg(long)]
    media_url: Option<String>,

    /// Directory for cached feeds [default: <MEDIA_DIR>/temp]
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Seconds a cached feed is served before the directory is rescanned
    #[arg(long, default_value = "5")]
    min_cache_time: u64,

    /// Skip files modified less than this many seconds ago
    #[arg(long, default_value = "30")]
    min_file_age: u64,

    /// Maximum number of episodes in the feed
    #[arg(short = 'n', long, default_value = "10")]
    max_items: usize,

    /// Include files from subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Fail instead of writing a feed without episodes
    #[arg(long)]
    empty_is_error: bool,

    /// Prefix episode titles with their album tag
    #[arg(long)]
    long_titles: bool,

    /// Episode description when no <episode>.txt exists: comment or title
    #[arg(long, default_value = "comment")]
    description_source: DescriptionSource,

    /// Text appended to every episode's iTunes subtitle
    #[arg(long)]
    itunes_subtitle_suffix: Option<String>,

    /// Feed title [default: name of MEDIA_DIR]
    #[arg(long)]
    title: Option<String>,

    /// Feed description
    #[arg(long)]
    description: Option<String>,

    /// Feed language
    #[arg(long)]
    language: Option<String>,

    /// Website link of the podcast
    #[arg(long)]
    link: Option<String>,

    /// Public URL of the feed itself
    #[arg(long)]
    rss_link: Option<String>,

    /// Config file [default: <MEDIA_DIR>/dirfeed.toml when present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut FeedConfig) {
        let overrides = [
            (&self.title, &mut config.title),
            (&self.description, &mut config.description),
            (&self.language, &mut config.language),
            (&self.link, &mut config.link),
            (&self.rss_link, &mut config.rss_link),
            (&self.media_url, &mut config.media_url),
            (&self.itunes_subtitle_suffix, &mut config.itunes.subtitle_suffix),
        ];

        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            max_items: self.max_items,
            min_file_age: Duration::from_secs(self.min_file_age),
            empty_is_error: self.empty_is_error,
            long_titles: self.long_titles,
            description_source: self.description_source,
            ..Default::default()
        }
    }
}

/// Progress reporter rendering a spinner and status lines on stderr
struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(bar);
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(bar) = spinner.take()
        {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ScanStarted { root } => {
                self.start_spinner(format!(
                    "{SEARCH}Scanning {}",
                    root.display().to_string().cyan()
                ));
            }

            ProgressEvent::ScanCompleted {
                episodes,
                skipped_too_young,
                ..
            } => {
                self.finish_spinner();
                let mut line = format!(
                    "{HEADPHONES}Found {} episodes",
                    episodes.to_string().cyan()
                );
                if skipped_too_young > 0 {
                    line.push_str(&format!(
                        ", {} still being written",
                        skipped_too_young.to_string().yellow()
                    ));
                }
                eprintln!("{line}");
            }

            ProgressEvent::EmptyFeed { root } => {
                eprintln!(
                    "{WARNING}{} contains no episodes",
                    root.display().to_string().yellow()
                );
            }

            ProgressEvent::CacheServed { age, .. } => {
                eprintln!(
                    "{RECYCLE}Serving cached feed ({}s old)",
                    age.as_secs().to_string().cyan()
                );
            }

            ProgressEvent::CacheRebuilt { episodes, .. } => {
                eprintln!(
                    "{SUCCESS}{} with {} episodes",
                    "Feed generated".bold().green(),
                    episodes.to_string().green().bold()
                );
            }

            ProgressEvent::CacheWriteFailed { error, .. } => {
                eprintln!(
                    "{WARNING}{} {}",
                    "Could not update feed cache:".yellow(),
                    error.dimmed()
                );
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let media_dir = args
        .media_dir
        .canonicalize()
        .with_context(|| format!("Media directory {} not found", args.media_dir.display()))?;

    let mut config = FeedConfig::for_directory(&media_dir, args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    let cache_options = CacheOptions {
        directory: args
            .cache_dir
            .clone()
            .unwrap_or_else(|| CacheOptions::for_directory(&media_dir).directory),
        min_cache_time: Duration::from_secs(args.min_cache_time),
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter::new())
    };

    let podcast = DirectoryPodcast::new(&media_dir, config, args.scan_options())
        .context("Invalid feed configuration")?
        .with_reporter(reporter.clone());

    let feed = CachedFeed::new(podcast, &cache_options).with_reporter(reporter);

    let response = match feed.get() {
        Ok(response) => response,
        Err(e) if e.is_empty_result() => {
            eprintln!("** Error: generated podcast found no episodes.");
            return Err(anyhow::Error::new(e).context("Refusing to write an empty feed"));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to generate feed")),
    };

    match &args.output {
        Some(path) => {
            println!("Writing RSS to: {}", path.display());
            std::fs::write(path, &response.bytes)
                .with_context(|| format!("Failed to write feed to {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&response.bytes)
                .and_then(|()| stdout.flush())
                .context("Failed to write feed to stdout")?;
        }
    }

    let completion = response.completion();
    if completion == Completion::EmptyWarning {
        eprintln!("** Warning: generated podcast found no episodes.");
        std::process::exit(completion.exit_code());
    }

    Ok(())
}
