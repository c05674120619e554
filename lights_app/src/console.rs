//! Console command parsing
//!
//! One command per line. Commands map one-to-one onto render loop events
//! except `help`, which the console answers itself.

use rig_engine::LoopEvent;
use thiserror::Error;

/// Usage text printed by `help`
pub const USAGE: &str = "\
commands:
  resize W H [RATIO]         resize the viewport
  set FOLDER LABEL VALUE     move a slider
  toggle FOLDER LABEL [on|off]
                             set or flip a checkbox
  open FOLDER | close FOLDER expand or collapse a folder
  orbit DX DY                orbit the camera
  panel                      print the panel
  quit                       stop the render loop";

/// A parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forward to the render loop
    Event(LoopEvent),
    /// Print usage
    Help,
    /// Blank line
    Empty,
}

/// Why a console line was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// First word is not a command
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    /// Wrong number of arguments
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Argument did not parse
    #[error("invalid {what}: '{value}'")]
    Invalid {
        /// Argument name
        what: &'static str,
        /// Text that failed to parse
        value: String,
    },
}

fn number<T: std::str::FromStr>(what: &'static str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::Invalid {
        what,
        value: value.to_string(),
    })
}

fn switch(value: &str) -> Result<bool, CommandError> {
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CommandError::Invalid {
            what: "switch",
            value: value.to_string(),
        }),
    }
}

/// Parse one console line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(Command::Empty);
    };

    let event = match (name, args) {
        ("help", _) => return Ok(Command::Help),
        ("quit" | "exit", []) => LoopEvent::Cancel,
        ("panel", []) => LoopEvent::DescribePanel,
        ("resize", [width, height, rest @ ..]) if rest.len() <= 1 => LoopEvent::Resize {
            width: number("width", width)?,
            height: number("height", height)?,
            pixel_ratio: match rest.first() {
                Some(ratio) => number("pixel ratio", ratio)?,
                None => 1.0,
            },
        },
        ("resize", _) => return Err(CommandError::Usage("resize W H [RATIO]")),
        ("set", [folder, label, value]) => LoopEvent::SetNumber {
            folder: (*folder).to_string(),
            label: (*label).to_string(),
            value: number("value", value)?,
        },
        ("set", _) => return Err(CommandError::Usage("set FOLDER LABEL VALUE")),
        ("toggle", [folder, label, rest @ ..]) if rest.len() <= 1 => LoopEvent::Toggle {
            folder: (*folder).to_string(),
            label: (*label).to_string(),
            value: rest.first().map(|v| switch(v)).transpose()?,
        },
        ("toggle", _) => return Err(CommandError::Usage("toggle FOLDER LABEL [on|off]")),
        ("open", [folder]) => LoopEvent::OpenFolder((*folder).to_string()),
        ("close", [folder]) => LoopEvent::CloseFolder((*folder).to_string()),
        ("open" | "close", _) => return Err(CommandError::Usage("open|close FOLDER")),
        ("orbit", [dx, dy]) => LoopEvent::Orbit {
            dx: number("dx", dx)?,
            dy: number("dy", dy)?,
        },
        ("orbit", _) => return Err(CommandError::Usage("orbit DX DY")),
        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Event(event))
}
