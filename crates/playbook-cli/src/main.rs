//! Playbook command-line host
//!
//! Browses the plays in a file store and plays them back against a roster.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use playbook_core::{
    ConfigError, Editor, EditorConfig, FileStore, Frame, PlayLibrary, PlaybackTick, Roster,
    StorageError, StoredPlay, TokenKind,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "playbook", about = "Browse and play back stored tactical plays")]
struct Cli {
    /// Editor config file (JSON).
    #[arg(long, env = "PLAYBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the play files.
    #[arg(long, env = "PLAYBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Roster file (JSON) whose starters fill the position slots.
    #[arg(long, env = "PLAYBOOK_ROSTER")]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored plays.
    List,
    /// Print every frame of a play, bound to the roster.
    Show { id: String },
    /// Play a play back in real time.
    Play { id: String },
    /// Delete a stored play.
    Delete { id: String },
    /// Store a play from a wire-format JSON file.
    Import {
        file: PathBuf,
        /// Store under this name instead of the file's.
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<(), CliError> {
    env_logger::init();
    let cli = Cli::parse();
    pollster::block_on(run(cli))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let roster = match &cli.roster {
        Some(path) => serde_json::from_str(&read_file(path)?)?,
        None => Roster::default(),
    };
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => FileStore::default_path()?,
    };
    log::debug!("Using plays directory {}", data_dir.display());
    let library = PlayLibrary::new(Arc::new(FileStore::new(data_dir)?));

    match cli.command {
        Command::List => run_list(&library).await,
        Command::Show { id } => run_show(&library, &id, &roster, config).await,
        Command::Play { id } => run_play(&library, &id, &roster, config).await,
        Command::Delete { id } => library.delete(&id).await.map_err(CliError::from),
        Command::Import { file, name } => run_import(&library, &file, name, &roster).await,
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

async fn run_list(library: &PlayLibrary<FileStore>) -> Result<(), CliError> {
    for play in library.list().await? {
        println!(
            "{}\t{}\t{} court\t{} frame(s)",
            play.id.as_deref().unwrap_or("-"),
            play.name,
            play.court,
            play.frames.len()
        );
    }
    Ok(())
}

async fn run_show(
    library: &PlayLibrary<FileStore>,
    id: &str,
    roster: &Roster,
    config: EditorConfig,
) -> Result<(), CliError> {
    let (editor, _) = library.open(id, roster, config).await?;
    println!("{} ({} court)", editor.name(), editor.court());
    for (index, frame) in editor.frames().iter().enumerate() {
        print_frame(index, editor.frame_count(), frame);
    }
    Ok(())
}

async fn run_play(
    library: &PlayLibrary<FileStore>,
    id: &str,
    roster: &Roster,
    config: EditorConfig,
) -> Result<(), CliError> {
    let (mut editor, _) = library.open(id, roster, config).await?;
    println!("{} ({} court)", editor.name(), editor.court());
    show_current(&editor);
    if !editor.play() {
        return Ok(());
    }

    let interval = editor.config().playback_interval();
    loop {
        thread::sleep(interval);
        match editor.tick() {
            PlaybackTick::Idle => {}
            PlaybackTick::Advanced(_) => show_current(&editor),
            PlaybackTick::Finished(_) => {
                show_current(&editor);
                break;
            }
            PlaybackTick::Stopped => break,
        }
    }
    Ok(())
}

async fn run_import(
    library: &PlayLibrary<FileStore>,
    file: &Path,
    name: Option<String>,
    roster: &Roster,
) -> Result<(), CliError> {
    let mut play = StoredPlay::from_json(&read_file(file)?)?;
    if let Some(name) = name {
        play.name = name;
    }
    // Re-save through a session so load-time cleanup applies and bound
    // players map back to the roster's slots
    let (editor, report) = Editor::from_stored(&play, roster, EditorConfig::default());
    if report.dropped > 0 {
        log::warn!("Dropped {} duplicate token(s) from {}", report.dropped, file.display());
    }
    let pending = editor.prepare_save(roster);
    let id = library.save(&pending).await?;
    println!("{id}");
    Ok(())
}

fn show_current(editor: &Editor) {
    print_frame(editor.cursor(), editor.frame_count(), editor.current_frame());
}

fn print_frame(index: usize, count: usize, frame: &Frame) {
    println!("Frame {}/{}", index + 1, count);
    for token in &frame.tokens {
        let who = match (&token.player, token.kind) {
            (Some(card), _) => format!("{} ({})", token.display_label(), card.name),
            (None, TokenKind::Ball) => "ball".to_string(),
            (None, _) => token.display_label(),
        };
        println!("  {:<8} {:<20} {:>6.1} {:>6.1}", token.kind, who, token.x, token.y);
    }
    if !frame.paths.is_empty() {
        println!("  {} path(s)", frame.paths.len());
    }
}
