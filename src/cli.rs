//! Command-line surface: argument definitions, text rendering and the
//! interactive session loop.

use crate::card::{Card, CardParseError};
use crate::game::{Advice, DrawRecord, GameConfig, GameState, MAX_DRAWS};
use crate::simulation::{parse_deck_file, DeckError, Policy};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "gamba")]
#[command(about = "Card draw simulator with a continue/stop heuristic", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Deck file to use instead of the standard 21-card deck
    #[arg(short, long, global = true)]
    pub deck: Option<String>,

    /// Maximum number of draws per session
    #[arg(short, long, global = true, default_value_t = MAX_DRAWS)]
    pub max_draws: u32,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play an interactive session on stdin (default)
    Play,

    /// Draw a fixed sequence of cards and print the history
    Draw {
        /// Cards in draw order, e.g. +20% x0.5 -50%
        #[arg(required = true)]
        cards: Vec<String>,

        /// Print the final state as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the draw odds for a fresh deck
    Odds,

    /// Simulate many sessions with random draws
    Simulate {
        /// Number of games to simulate
        #[arg(short, long, default_value = "10000")]
        num_games: usize,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// When the simulated player stops drawing
        #[arg(short, long, value_enum, default_value_t = Policy::FollowAdvice)]
        policy: Policy,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Global options that consume the following token as their value
const VALUE_FLAGS: &[&str] = &["-d", "--deck", "-m", "--max-draws"];

/// Reorder `draw` arguments so card tokens like `-20%` reach the positional
/// list after a `--` while flags such as `--json` or `-v` stay flags wherever
/// they appear. Arguments for other subcommands are returned unchanged.
pub fn normalize_draw_args(args: Vec<String>) -> Vec<String> {
    let mut draw_at = None;
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if VALUE_FLAGS.contains(&arg) {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        if arg == "draw" {
            draw_at = Some(i);
        }
        break;
    }
    let Some(draw_at) = draw_at else {
        return args;
    };

    let mut rest = args.into_iter();
    let mut normalized: Vec<String> = rest.by_ref().take(draw_at + 1).collect();
    let mut cards = Vec::new();
    while let Some(arg) = rest.next() {
        if arg == "--" {
            cards.extend(rest.by_ref());
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            normalized.push(arg);
            normalized.extend(rest.next());
        } else if arg.parse::<Card>().is_ok() || !arg.starts_with('-') {
            cards.push(arg);
        } else {
            normalized.push(arg);
        }
    }
    normalized.push("--".to_string());
    normalized.extend(cards);
    normalized
}

impl Cli {
    /// Parse `args` (program name first), accepting flags before, between or
    /// after `draw` cards
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        Cli::parse_from(normalize_draw_args(args))
    }

    /// Build the session config from the deck and draw-cap flags
    pub fn game_config(&self) -> Result<GameConfig, DeckError> {
        let mut config = GameConfig {
            max_draws: self.max_draws,
            ..GameConfig::default()
        };
        if let Some(path) = &self.deck {
            config.deck = parse_deck_file(path)?;
        }
        Ok(config)
    }
}

/// One line of input during an interactive session
#[derive(Debug, Clone, PartialEq)]
pub enum PlayCommand {
    Draw(Card),
    Reset,
    Odds,
    History,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<PlayCommand, CardParseError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "reset" | "r" => Ok(PlayCommand::Reset),
        "odds" | "o" | "deck" => Ok(PlayCommand::Odds),
        "history" | "h" => Ok(PlayCommand::History),
        "help" | "?" => Ok(PlayCommand::Help),
        "quit" | "q" | "exit" => Ok(PlayCommand::Quit),
        _ => line.parse().map(PlayCommand::Draw),
    }
}

/// Selectable card line: remaining count, draw chance and previewed effect
pub fn format_choice(state: &GameState, card: Card, count: usize) -> String {
    format!(
        "{:>5}  {:2} left  {:6.2}%  effect {:+.2}",
        card.to_string(),
        count,
        state.draw_probability(card) * 100.0,
        state.preview_effect(card)
    )
}

pub fn format_record(index: usize, record: &DrawRecord) -> String {
    format!(
        "Card {}: {} -> Value: {:.2}% | Average Remaining Impact: {:.2} | Heuristic: {}",
        index + 1,
        record.card,
        record.value,
        record.expected_remaining_impact,
        record.advice.description()
    )
}

pub fn format_final_value(value: f64) -> String {
    format!("Final Value: {:.2}%", value)
}

/// End-of-game banner, flavoured by the last draw's advice
pub fn format_outcome(advice: Advice) -> &'static str {
    match advice {
        Advice::Continue => "Game over - the deck still favoured drawing when your draws ran out.",
        Advice::Stop => "Game over - the odds had turned against you, stopping was the right call.",
    }
}

pub fn write_choices<W: Write>(out: &mut W, state: &GameState) -> io::Result<()> {
    writeln!(
        out,
        "Deck: {} cards, {} draws left",
        state.remaining_deck().total(),
        state.draws_left()
    )?;
    for (card, count) in state.remaining_counts() {
        writeln!(out, "  {}", format_choice(state, *card, *count))?;
    }
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, state: &GameState) -> io::Result<()> {
    for (i, record) in state.history().iter().enumerate() {
        writeln!(out, "{}", format_record(i, record))?;
    }
    writeln!(out, "{}", format_final_value(state.value()))
}

const HELP: &str = "Enter a card to draw (e.g. +10%, -30%, x2), or: odds, history, reset, quit";

/// Read commands from `input` until quit or end of input
pub fn run_session<R: BufRead, W: Write>(
    state: &mut GameState,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{}", HELP)?;
    write_choices(out, state)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(PlayCommand::Draw(card)) => match state.draw_card(card) {
                Ok(record) => {
                    writeln!(out, "{}", format_record(state.history().len() - 1, &record))?;
                    if let Some(advice) = state.outcome() {
                        writeln!(out, "{}", format_final_value(state.value()))?;
                        writeln!(out, "{}", format_outcome(advice))?;
                        writeln!(out, "Type 'reset' to play again.")?;
                    } else {
                        write_choices(out, state)?;
                    }
                }
                Err(e) => writeln!(out, "✗ {}", e)?,
            },
            Ok(PlayCommand::Reset) => {
                state.reset();
                writeln!(out, "Game reset.")?;
                write_choices(out, state)?;
            }
            Ok(PlayCommand::Odds) => write_choices(out, state)?,
            Ok(PlayCommand::History) => write_history(out, state)?,
            Ok(PlayCommand::Help) => writeln!(out, "{}", HELP)?,
            Ok(PlayCommand::Quit) => break,
            Err(e) => writeln!(out, "✗ {}", e)?,
        }
    }

    Ok(())
}
