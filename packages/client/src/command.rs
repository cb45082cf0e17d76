//! REPL command parsing.

use std::str::FromStr;

use crate::error::ClientError;

/// A single line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the local identity
    As(String),
    Create,
    Join(String),
    Place { row: usize, col: usize },
    Restart,
    Show,
    Leave,
    Help,
    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
Commands:
  as <name>            act as another player on this terminal
  create               create a room and take the black seat
  join <id>            join the room with the 4-digit id
  place <row> <col>    place a stone (0-18, 0-18)
  restart              clear the board and start the next game
  show                 print the current board
  leave                stop watching the current room
  help                 show this help
  quit                 exit";
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ClientError::UnknownCommand(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("as", [player]) => Command::As((*player).to_string()),
            ("as", _) => return Err(ClientError::Usage("as <name>")),
            ("create", []) => Command::Create,
            ("join", [room_id]) => Command::Join((*room_id).to_string()),
            ("join", _) => return Err(ClientError::Usage("join <id>")),
            ("place" | "p", [row, col]) => {
                let (Ok(row), Ok(col)) = (row.parse(), col.parse()) else {
                    return Err(ClientError::Usage("place <row> <col>"));
                };
                Command::Place { row, col }
            }
            ("place" | "p", _) => return Err(ClientError::Usage("place <row> <col>")),
            ("restart", []) => Command::Restart,
            ("show", []) => Command::Show,
            ("leave", []) => Command::Leave,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(ClientError::UnknownCommand(line.trim().to_string())),
        };
        Ok(command)
    }
}
