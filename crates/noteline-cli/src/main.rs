//! noteline CLI: Terminal reader with a timeline of neighboring notes

use clap::{Parser, Subcommand};
use noteline_engine::{fetch_window, Config, HttpNoteSource, Nid, NoteId, Route};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Terminal reader for notes with an animated timeline
#[derive(Parser, Debug)]
#[command(name = "noteline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API root URL (overrides the config file)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Path to the config file (default: .noteline/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui {
        /// Note to open, by numeric id
        #[arg(long)]
        note: Option<Nid>,
    },

    /// Print the notes around a note
    Neighbors {
        /// Note id
        id: String,

        /// Number of notes to request
        #[arg(long)]
        size: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the detail path for a note
    Route {
        /// Numeric note id
        nid: Nid,
    },

    /// Write a default config file
    Init,
}

const LOG_FILE: &str = "noteline.log";

fn main() {
    let cli = Cli::parse();
    let tui = matches!(cli.command, None | Some(Commands::Tui { .. }));
    init_logging(tui, &log_path(cli.config.as_deref()));

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None => cmd_tui(config, None),
        Some(Commands::Tui { note }) => cmd_tui(config, note),
        Some(Commands::Neighbors { id, size, json }) => cmd_neighbors(&config, &id, size, json),
        Some(Commands::Route { nid }) => {
            println!("{}", Route::Note { nid }.path());
            Ok(())
        }
        Some(Commands::Init) => cmd_init(cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install the tracing subscriber. While the TUI owns the terminal, logs
/// go to a file in the config directory.
fn init_logging(tui: bool, log_path: &Path) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("noteline=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let log_file = tui
        .then(|| {
            if let Some(dir) = log_path.parent() {
                std::fs::create_dir_all(dir).ok()?;
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .ok()
        })
        .flatten();

    match log_file {
        Some(file) => builder.with_writer(Mutex::new(file)).with_ansi(false).init(),
        // No writable log file: keep the terminal clean
        None if tui => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
}

fn config_path(cli_path: Option<&Path>) -> PathBuf {
    cli_path.map_or_else(|| Config::default_path(Path::new(".")), Path::to_path_buf)
}

/// Log file next to the config file.
fn log_path(cli_path: Option<&Path>) -> PathBuf {
    let config = config_path(cli_path);
    match config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILE),
        _ => PathBuf::from(LOG_FILE),
    }
}

fn load_config(cli: &Cli) -> Result<Config, noteline_engine::ConfigError> {
    let mut config = Config::load_or_default(&config_path(cli.config.as_deref()))?;
    if let Some(api) = &cli.api {
        config.api_base_url.clone_from(api);
    }
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn cmd_tui(config: Config, note: Option<Nid>) -> Result<(), Box<dyn std::error::Error>> {
    let source = HttpNoteSource::from_config(&config)?;
    let start_path = note.map_or_else(|| Route::Home.path(), |nid| Route::Note { nid }.path());
    runtime()?.block_on(noteline_tui::run_tui(config, start_path, Arc::new(source)))
}

fn cmd_neighbors(
    config: &Config,
    id: &str,
    size: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = HttpNoteSource::from_config(config)?;
    let key = NoteId::from(id);
    let size = size.unwrap_or(config.window_size);
    let notes = runtime()?.block_on(fetch_window(&source, Some(&key), size))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("No notes around {id}");
        return Ok(());
    }
    for note in &notes {
        let marker = if note.id == key { ">" } else { " " };
        println!(
            "{marker} {:>6}  {}  {}",
            note.nid,
            note.created_str(),
            note.title
        );
    }
    Ok(())
}

fn cmd_init(cli_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(cli_path);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["noteline"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_tui_with_note() {
        let cli = Cli::try_parse_from(["noteline", "tui", "--note", "42"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Tui { note: Some(42) }));
    }

    #[test]
    fn test_parse_neighbors_with_global_api() {
        let cli = Cli::try_parse_from([
            "noteline",
            "neighbors",
            "a1",
            "--size",
            "5",
            "--json",
            "--api",
            "http://example.test/api",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Neighbors {
                id: "a1".into(),
                size: Some(5),
                json: true,
            })
        );
        assert_eq!(cli.api.as_deref(), Some("http://example.test/api"));
    }

    #[test]
    fn test_route_rejects_non_numeric() {
        assert!(Cli::try_parse_from(["noteline", "route", "abc"]).is_err());
    }

    #[test]
    fn test_load_config_applies_api_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let cli = Cli::try_parse_from([
            "noteline",
            "--config",
            path.to_str().unwrap(),
            "--api",
            "http://override.test",
            "init",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.api_base_url, "http://override.test");
        assert_eq!(config.window_size, Config::default().window_size);
    }

    #[test]
    fn test_log_file_follows_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("custom").join("config.json");
        assert_eq!(
            log_path(Some(&config)),
            dir.path().join("custom").join("noteline.log")
        );
        assert_eq!(
            log_path(None),
            Path::new(".").join(".noteline").join("noteline.log")
        );
        assert_eq!(
            log_path(Some(Path::new("config.json"))),
            PathBuf::from("noteline.log")
        );
    }

    #[test]
    fn test_config_path_default() {
        assert_eq!(
            config_path(None),
            Path::new(".").join(".noteline").join("config.json")
        );
    }
}
