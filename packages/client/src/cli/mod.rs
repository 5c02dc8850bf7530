//! Command line front end.

mod command;
mod error;
mod reader;
mod render;

pub use command::{COMMANDS, Command, CommandError};
pub use error::CliError;
pub use reader::LineReader;
pub use render::{ADMIN_SENDER, CLOSED_NOTICE, help, render_event, render_info, render_room_listing};

use palaver_server::{
    ChatProvider,
    domain::{ClientEvent, EntityName},
    usecase::ProviderError,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Run the interactive session until the user quits or input ends.
///
/// Inbound chat messages are printed as they arrive. The caller is expected
/// to call [`ChatProvider::quit`] afterwards.
pub async fn run_cli(
    provider: &ChatProvider,
    mut events: UnboundedReceiver<ClientEvent>,
) -> Result<(), CliError> {
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!();
            println!("\t{}", render_event(&event));
        }
    });

    let mut reader = LineReader::spawn();
    let outcome = session(provider, &mut reader).await;
    printer.abort();
    outcome
}

async fn session(provider: &ChatProvider, reader: &mut LineReader) -> Result<(), CliError> {
    if !register_screen_name(provider, reader).await? {
        return Ok(());
    }
    println!("{}", help());

    loop {
        let Some(line) = reader.read_line("Enter command: ").await else {
            return Ok(());
        };
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            // The user hit enter to clear alerts.
            Ok(None) => continue,
            Err(e) => {
                println!("Sorry, {e}");
                println!("{}", help());
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }

        match execute(provider, reader, command).await {
            Ok(()) => {}
            Err(CliError::Provider(ProviderError::RegistryUnreachable(e))) => {
                println!("The chat registry is unreachable: {e}");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Prompt until a screen name is registered. `false` if input ended first.
async fn register_screen_name(
    provider: &ChatProvider,
    reader: &mut LineReader,
) -> Result<bool, CliError> {
    loop {
        let Some(line) = reader.read_line("Enter a screen name: ").await else {
            return Ok(false);
        };
        let Some(name) = entity_name(line) else {
            continue;
        };
        if provider.register_chat_client(name.clone()).await? {
            println!("Welcome {name}");
            return Ok(true);
        }
        println!("Sorry, the screen name [{name}] is already in use");
    }
}

fn entity_name(raw: String) -> Option<EntityName> {
    match EntityName::new(raw) {
        Ok(name) => Some(name),
        Err(e) => {
            println!("Invalid name: {e}");
            None
        }
    }
}

/// The argument given inline, or one prompted for.
async fn argument(reader: &mut LineReader, given: Option<String>, prompt: &str) -> Option<String> {
    match given {
        Some(value) => Some(value),
        None => reader.read_line(prompt).await,
    }
}

async fn name_argument(
    reader: &mut LineReader,
    given: Option<String>,
    prompt: &str,
) -> Option<EntityName> {
    argument(reader, given, prompt).await.and_then(entity_name)
}

async fn execute(
    provider: &ChatProvider,
    reader: &mut LineReader,
    command: Command,
) -> Result<(), CliError> {
    match command {
        Command::Help => println!("{}", help()),
        Command::Quit => {}
        Command::RegisterRoom(given) => {
            let Some(name) = name_argument(reader, given, "Enter desired chat room name: ").await
            else {
                return Ok(());
            };
            if provider.register_chat_room(name.clone()).await? {
                println!("Chat room [{name}] successfully registered");
            } else {
                println!("Sorry, an entity named [{name}] already exists");
            }
        }
        Command::DeregisterRoom(given) => {
            if provider.hosted_chat_rooms().await.is_empty() {
                println!("You are not hosting any chat rooms");
                return Ok(());
            }
            let Some(name) = name_argument(reader, given, "Enter chat room name: ").await else {
                return Ok(());
            };
            if provider.deregister_chat_room(&name).await? {
                println!("Chat room [{name}] successfully deregistered");
            } else {
                println!("Unable to deregister chat room [{name}]");
            }
        }
        Command::Info(given) => {
            let Some(name) = name_argument(reader, given, "Enter entity name: ").await else {
                return Ok(());
            };
            match provider.get_entity_info(name).await? {
                Some(info) => println!("{}", render_info(&info)),
                None => println!("There is no registered entity with that name"),
            }
        }
        Command::Rooms => {
            let rooms = provider.get_chat_rooms().await?;
            let hosted = provider.hosted_chat_rooms().await;
            let joined = provider.joined_chat_rooms().await;
            println!("{}", render_room_listing(&rooms, &hosted, &joined));
        }
        Command::HostedRooms => {
            let hosted = provider.hosted_chat_rooms().await;
            if hosted.is_empty() {
                println!("You are not hosting any chat rooms");
            } else {
                println!("Your hosted chat rooms:");
                hosted.iter().for_each(|name| println!("\t{name}"));
            }
        }
        Command::JoinedRooms => {
            let joined = provider.joined_chat_rooms().await;
            if joined.is_empty() {
                println!("You have not joined any chat rooms");
            } else {
                println!("Your joined chat rooms:");
                joined.iter().for_each(|name| println!("\t{name}"));
            }
        }
        Command::Join(given) => {
            let Some(name) = name_argument(reader, given, "Enter chat room name: ").await else {
                return Ok(());
            };
            if provider.join_chat_room(&name).await? {
                println!("Successfully joined chat room [{name}]");
            } else {
                println!("Unable to join chat room [{name}]");
            }
        }
        Command::Talk(room, message) => {
            let Some(name) = name_argument(reader, room, "Enter chat room name: ").await else {
                return Ok(());
            };
            let Some(message) = argument(reader, message, "Enter chat message: ").await else {
                return Ok(());
            };
            if !provider.talk_chat_room(&name, message.trim().to_string()).await? {
                println!("You have not joined a chat room with the name [{name}]");
            }
        }
        Command::Leave(given) => {
            let Some(name) = name_argument(reader, given, "Enter chat room name: ").await else {
                return Ok(());
            };
            if provider.leave_chat_room(&name).await? {
                println!("Successfully left chat room [{name}]");
            } else {
                println!("Unable to leave chat room [{name}]");
            }
        }
    }
    Ok(())
}
