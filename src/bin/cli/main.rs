mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Flashdeck study-card manager", version)]
struct Cli {
    /// Use a specific settings file (default: <config dir>/flashdeck/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Timeout in seconds for each remote image fetch
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum AlgorithmArg {
    /// Walk the deck in order
    Rotational,
    /// Weakest cards first after every cycle
    Mastery,
}

#[derive(Subcommand)]
enum Command {
    /// Show the cards of a deck
    Show {
        /// Deck file
        deck: PathBuf,
    },

    /// Study a deck interactively
    Study {
        /// Deck file (defaults to the last used deck)
        deck: Option<PathBuf>,
        /// Scheduling policy
        #[arg(long, default_value = "rotational")]
        algorithm: AlgorithmArg,
        /// Number of cycles before the session ends (0 = until you quit)
        #[arg(long, default_value = "1")]
        cycles: i32,
    },

    /// Create an empty deck
    New {
        /// Deck file to create
        deck: PathBuf,
        /// Deck name
        name: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a card to a deck
    Add {
        /// Deck file
        deck: PathBuf,
        #[command(flatten)]
        card: commands::add::NewCard,
    },

    /// Change a card's text, hint or images
    Edit {
        /// Deck file
        deck: PathBuf,
        /// Card number as listed by `show`
        number: usize,
        #[command(flatten)]
        edit: commands::edit::CardEdit,
    },

    /// Append a copy of a card
    Duplicate {
        /// Deck file
        deck: PathBuf,
        /// Card number as listed by `show`
        number: usize,
    },

    /// Remove a card from a deck
    Remove {
        /// Deck file
        deck: PathBuf,
        /// Card number as listed by `show`
        number: usize,
    },

    /// Remove every card from a deck
    Clear {
        /// Deck file
        deck: PathBuf,
    },

    /// Re-save a deck with all images embedded
    Export {
        /// Deck file to read
        deck: PathBuf,
        /// Where to write the exported deck
        output: PathBuf,
    },

    /// Show the last used deck and its mastery levels
    Last,

    /// Show or set the theme
    Theme {
        /// New theme
        #[arg(value_parser = ["light", "dark"])]
        theme: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.config.clone(), cli.timeout)?;

    match cli.command {
        Command::Show { deck } => {
            commands::show::run(&mut app, &deck, &cli.format, use_color)?;
        }
        Command::Study { deck, algorithm, cycles } => {
            let deck = match deck {
                Some(deck) => deck,
                None => app.last_deck_path()?,
            };
            let stdin = std::io::stdin();
            commands::study::run(
                &mut app,
                &deck,
                algorithm.into(),
                cycles,
                stdin.lock(),
                std::io::stdout(),
                use_color,
            )?;
        }
        Command::New { deck, name, force } => {
            commands::new::run(&mut app, &deck, &name, force, &cli.format)?;
        }
        Command::Add { deck, card } => {
            commands::add::run(&mut app, &deck, card, &cli.format)?;
        }
        Command::Edit { deck, number, edit } => {
            commands::edit::run(&mut app, &deck, number, &edit, &cli.format)?;
        }
        Command::Duplicate { deck, number } => {
            commands::duplicate::run(&mut app, &deck, number, &cli.format)?;
        }
        Command::Remove { deck, number } => {
            commands::remove::run(&mut app, &deck, number, &cli.format)?;
        }
        Command::Clear { deck } => {
            commands::clear::run(&mut app, &deck, &cli.format)?;
        }
        Command::Export { deck, output } => {
            commands::export::run(&mut app, &deck, &output, &cli.format)?;
        }
        Command::Last => {
            commands::last::run(&app, &cli.format)?;
        }
        Command::Theme { theme } => {
            commands::theme::run(&app, theme.as_deref())?;
        }
    }

    Ok(())
}

impl From<AlgorithmArg> for flashdeck_lib::study::AlgorithmKind {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Rotational => Self::Rotational,
            AlgorithmArg::Mastery => Self::MasteryWeighted,
        }
    }
}
