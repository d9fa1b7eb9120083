use clap::Parser;
use std::path::PathBuf;
use std::process;
use subfetch::{
    Config, DEFAULT_CONFIG_PATH, OutcomeStatus, ProgressEvent, fetch_subtitles,
};

/// Download subtitles for movies and TV shows
#[derive(Debug, Parser)]
#[command(name = "subfetch", version, about)]
struct Cli {
    /// Folder with video files
    folder: PathBuf,

    /// Display request and response summaries in the console
    #[arg(short, long)]
    debug: bool,

    /// Display deep per-candidate diagnostics
    #[arg(long)]
    debug_verbose: bool,

    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Subtitle language code, overriding the configured default
    #[arg(long)]
    lang: Option<String>,
}

/// Handles progress events and prints formatted output to stdout
///
/// `debug` gates request/response summaries, `verbose` additionally gates
/// per-candidate diagnostics. Outcome lines (saved, failed, not found) are
/// always printed.
fn handle_progress_event(event: ProgressEvent, debug: bool, verbose: bool) {
    match event {
        ProgressEvent::ScanningVideos => {}
        ProgressEvent::VideosFound { count } => {
            if count == 0 {
                println!("❌ No video files found");
            }
        }
        ProgressEvent::ProcessingVideo { video_path, .. } => {
            let name = video_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("\n🎬 Searching subtitles for: {}", name);
        }
        ProgressEvent::SubtitleExists { subtitle_path } => {
            if debug {
                let name = subtitle_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                println!("ℹ️ Subtitle already exists: {}, skipping.", name);
            }
        }
        ProgressEvent::MetadataGuessed {
            metadata,
            release_group,
        } => {
            if verbose {
                println!("  guessed metadata: {:?}", metadata);
                println!(
                    "  detected release group: '{}'",
                    release_group.as_deref().unwrap_or("")
                );
            }
        }
        ProgressEvent::SearchingByHash { hash } => {
            if debug {
                println!("📤 Trying subtitles by hash: {}", hash);
            }
        }
        ProgressEvent::FingerprintUnavailable => {
            if debug {
                println!("📤 Movie hash unavailable, falling back to text query");
            }
        }
        ProgressEvent::SearchingByQuery { query } => {
            if debug {
                println!("📤 Trying subtitles by query: {}", query);
            }
        }
        ProgressEvent::CandidatesReceived { count } => {
            if verbose {
                println!("🔹 Received {} result(s)", count);
            }
        }
        ProgressEvent::CandidateDetails {
            index,
            slug,
            file_count,
        } => {
            if verbose {
                println!("📝 Result {}: slug='{}' files={}", index, slug, file_count);
            }
        }
        ProgressEvent::SubtitleSaved {
            subtitle_path,
            method,
        } => {
            let name = subtitle_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("✅ Subtitle saved: {} (method: {})", name, method);
        }
        ProgressEvent::SaveFailed { message, .. } => {
            println!("❌ Failed to save subtitles: {}", message);
        }
        ProgressEvent::NoSubtitlesFound { video_name } => {
            println!("❌ No subtitles found for {}", video_name);
        }
        ProgressEvent::Complete { .. } => {}
    }
}

fn main() {
    let cli = Cli::parse();

    if !cli.folder.exists() || !cli.folder.is_dir() {
        eprintln!("❌ Folder not found: {}", cli.folder.display());
        process::exit(1);
    }

    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    let debug = cli.debug || cli.debug_verbose;
    let verbose = cli.debug_verbose;

    match fetch_subtitles(&cli.folder, &config, |event| {
        handle_progress_event(event, debug, verbose)
    }) {
        Ok(outcomes) => {
            let saved = outcomes
                .iter()
                .filter(|o| matches!(o.status, OutcomeStatus::Saved { .. }))
                .count();
            let skipped = outcomes
                .iter()
                .filter(|o| o.status == OutcomeStatus::AlreadyPresent)
                .count();

            if !outcomes.is_empty() {
                println!(
                    "\nDone: {} subtitle(s) saved, {} already present, {} video(s) total.",
                    saved,
                    skipped,
                    outcomes.len()
                );
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    }
}
