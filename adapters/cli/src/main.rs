#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line harness that loads a room layout and plays commands against it.

mod layout_transfer;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roomsim_core::{Command, CueEvents, Direction, EngineConfig, RoomLayout};
use roomsim_world::{process_command, query, Room};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Room simulation harness.
#[derive(Debug, Parser)]
#[command(name = "roomsim", version, about)]
struct Cli {
    /// TOML file with engine settings; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Loads a layout and plays a command script against it.
    Run {
        /// Layout file holding JSON or a transfer string.
        layout: PathBuf,
        /// Commands separated by spaces or commas: n ne e se s sw w nw cw ccw wait.
        #[arg(long, default_value = "")]
        commands: String,
        /// Prints the final layout as JSON.
        #[arg(long)]
        print_layout: bool,
    },
    /// Converts a JSON layout into a single-line transfer string.
    Encode {
        /// Layout file holding JSON.
        layout: PathBuf,
    },
    /// Converts a transfer string back into JSON.
    Decode {
        /// Transfer string produced by `encode`.
        value: String,
    },
    /// Prints an empty room sized by the configuration as JSON.
    New,
}

/// Entry point for the room simulation command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Run {
            layout,
            commands,
            print_layout,
        } => run(&layout, &commands, config, print_layout),
        CliCommand::Encode { layout } => {
            let layout = read_layout(&layout)?;
            println!("{}", layout_transfer::encode(&layout)?);
            Ok(())
        }
        CliCommand::Decode { value } => {
            let layout = layout_transfer::decode(&value)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
            Ok(())
        }
        CliCommand::New => {
            let room = Room::new(config);
            println!("{}", serde_json::to_string_pretty(&room.to_layout())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    debug!(?config, "engine config loaded");
    Ok(config)
}

fn read_layout(path: &Path) -> Result<RoomLayout> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    if layout_transfer::is_transfer_string(&content) {
        return layout_transfer::decode(&content)
            .with_context(|| format!("failed to decode layout {}", path.display()));
    }
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse layout {}", path.display()))
}

fn run(path: &Path, script: &str, config: EngineConfig, print_layout: bool) -> Result<()> {
    let layout = read_layout(path)?;
    let mut room = Room::load(&layout, config)
        .with_context(|| format!("layout {} is inconsistent", path.display()))?;
    let commands = parse_script(script)?;
    info!(commands = commands.len(), "room loaded");

    let mut cue = CueEvents::new();
    for command in commands {
        if query::is_player_dead(&room) {
            warn!("the player is dead; remaining commands ignored");
            break;
        }
        process_command(&mut room, command, &mut cue)
            .with_context(|| format!("turn {} corrupted the room", query::turn(&room)))?;
        let kinds: Vec<String> = cue.kinds().map(|kind| kind.to_string()).collect();
        println!("turn {}: {}", query::turn(&room), kinds.join(" "));
    }

    if print_layout {
        println!("{}", serde_json::to_string_pretty(&room.to_layout())?);
    }
    Ok(())
}

fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .split(|character: char| character.is_whitespace() || character == ',')
        .filter(|token| !token.is_empty())
        .map(parse_command)
        .collect()
}

fn parse_command(token: &str) -> Result<Command> {
    let direction = match token.to_ascii_lowercase().as_str() {
        "cw" => return Ok(Command::RotateClockwise),
        "ccw" => return Ok(Command::RotateCounterClockwise),
        "wait" | "." => return Ok(Command::Wait),
        "n" => Direction::North,
        "ne" => Direction::NorthEast,
        "e" => Direction::East,
        "se" => Direction::SouthEast,
        "s" => Direction::South,
        "sw" => Direction::SouthWest,
        "w" => Direction::West,
        "nw" => Direction::NorthWest,
        other => bail!("unknown command '{other}'"),
    };
    Ok(Command::Move { direction })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_accept_spaces_and_commas() {
        let commands = parse_script("n, ne cw\twait").expect("script parses");

        assert_eq!(
            commands,
            vec![
                Command::Move {
                    direction: Direction::North
                },
                Command::Move {
                    direction: Direction::NorthEast
                },
                Command::RotateClockwise,
                Command::Wait,
            ]
        );
    }

    #[test]
    fn unknown_tokens_are_reported() {
        let error = parse_script("n jump").expect_err("jump is not a command");
        assert!(error.to_string().contains("jump"));
    }
}
