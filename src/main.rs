use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::{self, stdin, Write},
    path::PathBuf,
    str::FromStr,
};
use tracing::{error, warn};
use tracing_subscriber::fmt::SubscriberBuilder;

mod classify;
mod deck;
mod error;
mod loader;
mod normalize;
mod records;
mod render;
mod session;
mod tables;

use classify::TableShape;
use deck::{Mode, TableSelection};
use loader::{BundledSource, DeckSource, FileSource, UrlSource};
use session::{AppState, DeckConfig, StudySession};

#[derive(Parser, Debug)]
#[command(version, about = "Hán Việt kanji and lesson vocabulary flashcards")]
struct Args {
    /// JSON export to study (defaults to the bundled export)
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Fetch the JSON export over HTTP instead
    #[arg(short, long)]
    url: Option<String>,
    /// Study Table_1 as a lesson vocabulary list
    #[arg(long, default_value = "false")]
    lesson: bool,
    #[arg(short, long, default_value = "words")]
    mode: Mode,
    /// Table name, or "all"
    #[arg(short, long, default_value = "all")]
    table: TableSelection,
    /// Lesson mode: show the Vietnamese meaning first
    #[arg(short, long, default_value = "false")]
    reverse: bool,
    #[arg(short, long, default_value = "false")]
    shuffle: bool,
    /// List tables and their detected shape
    #[arg(short, long, default_value = "false")]
    list: bool,
    /// Print the built deck as JSON lines
    #[arg(long, default_value = "false")]
    dump: bool,
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

enum Commands {
    Answer(String),
    Next,
    Prev,
    Flip,
    Shuffle,
    Correct,
    Wrong,
    Mode(Mode),
    Table(TableSelection),
    Reverse,
    Open(PathBuf),
    Stats,
    Help,
    Quit,
}

impl Commands {
    fn help() {
        println!("Available commands:");
        println!("  \\h          - Show this help message");
        println!("  \\n / \\p     - Next / previous card");
        println!("  \\f or <enter> - Flip the current card");
        println!("  \\s          - Shuffle the deck");
        println!("  \\d / \\a     - Mark correct / wrong");
        println!("  \\m <mode>   - Switch mode (words, examples, lesson)");
        println!("  \\t <table>  - Switch table (a table name or all)");
        println!("  \\r          - Toggle lesson reverse");
        println!("  \\o <path>   - Open another JSON export");
        println!("  \\i          - Show progress");
        println!("  \\q          - Quit the study session");
        println!("  <answer>    - Enter your answer for the current card");
    }
}

impl FromStr for Commands {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (command, arg) = s.split_once(char::is_whitespace).map_or((s, ""), |(c, a)| (c, a.trim()));
        match command {
            "" => Ok(Commands::Flip),
            "\\h" => Ok(Commands::Help),
            "\\n" => Ok(Commands::Next),
            "\\p" => Ok(Commands::Prev),
            "\\f" => Ok(Commands::Flip),
            "\\s" => Ok(Commands::Shuffle),
            "\\d" => Ok(Commands::Correct),
            "\\a" => Ok(Commands::Wrong),
            "\\r" => Ok(Commands::Reverse),
            "\\i" => Ok(Commands::Stats),
            "\\q" => Ok(Commands::Quit),
            "\\m" => arg.parse().map(Commands::Mode),
            "\\t" if arg.is_empty() => Err("Missing table name".to_string()),
            "\\t" => Ok(Commands::Table(arg.parse().unwrap_or_default())),
            "\\o" if arg.is_empty() => Err("Missing file path".to_string()),
            "\\o" => Ok(Commands::Open(PathBuf::from(arg))),
            _ if s.starts_with('\\') => Err("Unknown command".to_string()),
            _ => Ok(Commands::Answer(s.to_string())),
        }
    }
}

fn show(session: &StudySession) {
    println!();
    for line in render::render_current(session) {
        println!("{}", line);
    }
    println!("{}", render::status_line(session));
}

fn run_session(mut state: AppState) -> Result<()> {
    show(&state.session);
    loop {
        print!("|> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = stdin()
            .read_line(&mut input)
            .context("Failed to read line from stdin")?;
        if read == 0 {
            println!();
            break Ok(());
        }

        match Commands::from_str(input.trim()) {
            Ok(Commands::Help) => {
                Commands::help();
                continue;
            }
            Ok(Commands::Stats) => {
                println!("{}", render::status_line(&state.session));
                continue;
            }
            Ok(Commands::Quit) => {
                println!("Quitting...");
                break Ok(());
            }
            Ok(Commands::Next) => state.session.next(),
            Ok(Commands::Prev) => state.session.prev(),
            Ok(Commands::Flip) => state.session.flip(),
            Ok(Commands::Shuffle) => state.session.shuffle(),
            Ok(Commands::Correct) => state.session.mark_correct(),
            Ok(Commands::Wrong) => state.session.mark_wrong(),
            Ok(Commands::Mode(mode)) => state = state.with_mode(mode),
            Ok(Commands::Table(selection)) => state = state.with_selection(selection),
            Ok(Commands::Reverse) => {
                let reverse = !state.config.reverse;
                state = state.with_reverse(reverse);
                println!("Lesson reverse: {}", if reverse { "on" } else { "off" });
            }
            Ok(Commands::Open(path)) => match FileSource(path).load_tables() {
                Ok(tables) => state = state.load(tables),
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            },
            Ok(Commands::Answer(answer)) => {
                let Some(card) = state.session.current() else {
                    warn!("No cards to answer");
                    continue;
                };
                let expected = card.answer().to_string();
                let back = render::render_back(card);
                if state.session.answer(&answer) == Some(true) {
                    println!("Correct!");
                } else {
                    println!("Incorrect. The correct answer is: {}", expected);
                    for line in back {
                        println!("  {}", line);
                    }
                }
            }
            Err(e) => {
                eprintln!("Invalid command: {}. Type \\h for help.", e);
                continue;
            }
        }

        show(&state.session);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = SubscriberBuilder::default()
        .with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(io::stderr)
        .try_init();

    let source: Box<dyn DeckSource> = match (args.file, args.url) {
        (Some(path), _) => Box::new(FileSource(path)),
        (None, Some(url)) => Box::new(UrlSource(url)),
        (None, None) => Box::new(BundledSource),
    };
    let tables = source
        .load_tables()
        .with_context(|| format!("Failed to load {}", source.describe()))?;
    if tables.is_empty() {
        warn!("{} contains no tables", source.describe());
    }

    if args.list {
        for (name, table) in tables.iter() {
            println!(
                "{:<16} {:<7} {} rows",
                name,
                TableShape::classify(table).label(),
                table.len().saturating_sub(1)
            );
        }
        return Ok(());
    }

    let initial = AppState {
        config: DeckConfig { mode: args.mode, selection: args.table, reverse: args.reverse },
        ..AppState::default()
    };
    let mut state = if args.lesson { initial.load_lesson(tables) } else { initial.load(tables) };

    if args.shuffle {
        state.session.shuffle();
    }

    if args.dump {
        for card in state.session.deck() {
            println!("{}", serde_json::to_string(card).context("Failed to serialize card")?);
        }
        return Ok(());
    }

    println!(
        "Starting session for {} cards ({} mode, table {})",
        state.session.len(),
        state.config.mode,
        state.config.selection
    );
    println!("Type '\\h' for commands.");

    run_session(state)?;

    Ok(())
}
