//! Text rendering for the terminal.

use palaver_server::domain::{ClientEvent, EntityInfo, EntityName};

use super::command::COMMANDS;

/// Sender shown for notices that come from the chat service itself.
pub const ADMIN_SENDER: &str = "admin";

/// Shown when a joined room closes.
pub const CLOSED_NOTICE: &str = "(this chat room has been closed)";

pub fn render_event(event: &ClientEvent) -> String {
    match event {
        ClientEvent::Delivered {
            room,
            sender,
            message,
        } => chat_line(room, sender, message),
        ClientEvent::RoomClosed { room } => chat_line(room, ADMIN_SENDER, CLOSED_NOTICE),
    }
}

fn chat_line(room: &EntityName, sender: &str, message: &str) -> String {
    format!("[{room}] {sender} says: {message}")
}

pub fn render_info(info: &EntityInfo) -> String {
    info.iter()
        .map(|(key, value)| format!("\t{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// All registered rooms, marking the ones hosted `(*)` and joined `(**)`.
pub fn render_room_listing(
    rooms: &[EntityName],
    hosted: &[EntityName],
    joined: &[EntityName],
) -> String {
    if rooms.is_empty() {
        return "There are no registered chat rooms".to_string();
    }

    let mut lines = vec![
        "Registered chat rooms:".to_string(),
        "[(*) indicates you are hosting the chat room]".to_string(),
        "[(**) indicates you have joined the chat room]".to_string(),
    ];
    for room in rooms {
        let mut line = format!("\t{room}");
        if hosted.contains(room) {
            line.push_str(" (*)");
        }
        if joined.contains(room) {
            line.push_str(" (**)");
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn help() -> String {
    let mut text =
        String::from("\nChat provider help: you may enter one of the following commands\n");
    for (_, usage, description) in COMMANDS {
        text.push_str(&format!("\t{usage:<20}{description}\n"));
    }
    text
}
