//! User command parsing.

use thiserror::Error;

/// Every command: key, usage and description.
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("h", "h", "Display this help message"),
    ("q", "q", "Quit"),
    ("n", "n <room>", "Register a new chat room"),
    ("d", "d <room>", "Deregister one of your chat rooms"),
    ("i", "i <name>", "Get info about a registered entity"),
    ("r", "r", "View all registered chat rooms"),
    ("m", "m", "View your hosted chat rooms"),
    ("p", "p", "View your joined chat rooms"),
    ("j", "j <room>", "Join a chat room"),
    ("t", "t <room> <message>", "Send a chat message"),
    ("l", "l <room>", "Leave a chat room"),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0} is not a valid command")]
    Unknown(String),
}

/// A parsed command line.
///
/// Arguments left out are prompted for when the command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    RegisterRoom(Option<String>),
    DeregisterRoom(Option<String>),
    Info(Option<String>),
    Rooms,
    HostedRooms,
    JoinedRooms,
    Join(Option<String>),
    Talk(Option<String>, Option<String>),
    Leave(Option<String>),
}

impl Command {
    /// Parse one input line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (key, rest) = match line.split_once(char::is_whitespace) {
            Some((key, rest)) => (key, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match key {
            "h" => Self::Help,
            "q" => Self::Quit,
            "n" => Self::RegisterRoom(argument),
            "d" => Self::DeregisterRoom(argument),
            "i" => Self::Info(argument),
            "r" => Self::Rooms,
            "m" => Self::HostedRooms,
            "p" => Self::JoinedRooms,
            "j" => Self::Join(argument),
            "t" => match rest.split_once(char::is_whitespace) {
                Some((room, message)) => Self::Talk(
                    Some(room.to_string()),
                    Some(message.trim().to_string()),
                ),
                None => Self::Talk(argument, None),
            },
            "l" => Self::Leave(argument),
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}
