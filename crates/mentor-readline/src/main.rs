use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use tracing_subscriber::EnvFilter;

use mentor_application::{ChatUseCase, DocumentUseCase, PreferencesUseCase, SendOutcome};
use mentor_core::chat::{ChatStore, StoreRepository};
use mentor_core::prefs::PreferencesRepository;
use mentor_core::remote::RemoteChatService;
use mentor_infrastructure::{
    HttpChatService, JsonPreferencesRepository, JsonStoreRepository, MentorConfig, MentorPaths,
};

const COMMANDS: &[&str] = &[
    "/chats", "/folders", "/new", "/open", "/mkdir", "/rename", "/rmdir", "/rm", "/mv", "/docs",
    "/upload", "/rmdoc", "/dark", "/help", "/quit",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Resolves a folder argument: exact ID first, then name (first match).
fn find_folder_id(store: &ChatStore, arg: &str) -> Option<String> {
    if let Some(folder) = store.folder(arg) {
        return Some(folder.id.clone());
    }
    store
        .folders
        .iter()
        .find(|f| f.name == arg)
        .map(|f| f.id.clone())
}

/// Resolves a chat argument: the 1-based index shown by `/chats`.
fn find_chat_id(store: &ChatStore, arg: &str) -> Option<String> {
    let index: usize = arg.parse().ok()?;
    store.chats.get(index.checked_sub(1)?).map(|c| c.id.clone())
}

/// Prints the sidebar: folders with their chats, then the unfiled chats.
fn print_sidebar(store: &ChatStore) {
    let index_of = |id: &str| {
        store
            .chats
            .iter()
            .position(|c| c.id == id)
            .map(|i| i + 1)
            .unwrap_or(0)
    };
    let print_chat = |chat: &mentor_core::chat::Chat| {
        let marker = if store.current_chat_id.as_deref() == Some(&chat.id) {
            "*"
        } else {
            " "
        };
        println!(
            "  {marker} [{}] {} ({} messages)",
            index_of(&chat.id),
            chat.title,
            chat.messages.len()
        );
    };

    for folder in &store.folders {
        let fold = if folder.is_expanded { "v" } else { ">" };
        println!("{}", format!("{fold} {}/", folder.name).bright_yellow());
        if folder.is_expanded {
            for chat in store.chats_in_folder(&folder.id) {
                print_chat(chat);
            }
        }
    }
    let unfiled = store.unfiled_chats();
    if !unfiled.is_empty() {
        println!("{}", "  (unfiled)".bright_black());
        for chat in unfiled {
            print_chat(chat);
        }
    }
    if store.chats.is_empty() && store.folders.is_empty() {
        println!("{}", "No chats yet. Start one with /new.".bright_black());
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_black());
    println!("{}", "  /chats                      list folders and chats".bright_black());
    println!("{}", "  /new [folder]               start a chat (optionally in a folder)".bright_black());
    println!("{}", "  /open <n>                   switch to chat n".bright_black());
    println!("{}", "  /rm <n>                     delete chat n".bright_black());
    println!("{}", "  /mv <n> <folder|->          move chat n into a folder (- = unfiled)".bright_black());
    println!("{}", "  /mkdir <name>               create a folder".bright_black());
    println!("{}", "  /rename <folder> <name>     rename a folder".bright_black());
    println!("{}", "  /rmdir <folder>             delete a folder (chats survive)".bright_black());
    println!("{}", "  /folders                    toggle-fold: /folders <folder>".bright_black());
    println!("{}", "  /docs <folder>              list a folder's documents".bright_black());
    println!("{}", "  /upload <folder> <path>...  upload documents".bright_black());
    println!("{}", "  /rmdoc <folder> <file>      delete a document".bright_black());
    println!("{}", "  /dark                       toggle dark mode".bright_black());
    println!("{}", "  /quit                       exit".bright_black());
    println!("{}", "Anything else is sent to the current chat.".bright_black());
}

async fn handle_command(
    line: &str,
    chats: &ChatUseCase,
    documents: &DocumentUseCase,
    prefs: &PreferencesUseCase,
) -> Result<()> {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();
    let store = chats.snapshot().await;

    match command {
        "/help" => print_help(),
        "/chats" => print_sidebar(&store),
        "/folders" => {
            if let Some(arg) = args.first() {
                match find_folder_id(&store, arg) {
                    Some(folder_id) => chats.toggle_folder_expansion(&folder_id).await?,
                    None => println!("{}", format!("No folder named '{arg}'").red()),
                }
            } else {
                for folder in &store.folders {
                    println!("{}", folder.name.bright_yellow());
                }
            }
        }
        "/new" => {
            let folder_id = match args.first() {
                Some(arg) => match find_folder_id(&store, arg) {
                    Some(id) => Some(id),
                    None => {
                        println!("{}", format!("No folder named '{arg}'").red());
                        return Ok(());
                    }
                },
                None => None,
            };
            chats.create_chat(folder_id).await?;
            println!("{}", "Started a new chat.".green());
        }
        "/open" => match args.first().and_then(|arg| find_chat_id(&store, arg)) {
            Some(chat_id) => {
                chats.select_chat(&chat_id).await?;
                let snapshot = chats.snapshot().await;
                if let Some(chat) = snapshot.chat(&chat_id) {
                    println!("{}", format!("Switched to '{}'.", chat.title).green());
                    for message in &chat.messages {
                        print_message(message);
                    }
                }
            }
            None => println!("{}", "Usage: /open <n> (see /chats)".red()),
        },
        "/rm" => match args.first().and_then(|arg| find_chat_id(&store, arg)) {
            Some(chat_id) => {
                chats.delete_chat(&chat_id).await?;
                let remaining = chats.snapshot().await;
                if remaining.chat(&chat_id).is_some() {
                    println!("{}", "The server refused; chat kept.".yellow());
                } else {
                    println!("{}", "Chat deleted.".green());
                }
            }
            None => println!("{}", "Usage: /rm <n>".red()),
        },
        "/mv" => {
            let (Some(chat_arg), Some(folder_arg)) = (args.first(), args.get(1)) else {
                println!("{}", "Usage: /mv <n> <folder|->".red());
                return Ok(());
            };
            let Some(chat_id) = find_chat_id(&store, chat_arg) else {
                println!("{}", "Usage: /mv <n> <folder|-> (see /chats)".red());
                return Ok(());
            };
            let target = if *folder_arg == "-" {
                None
            } else {
                match find_folder_id(&store, folder_arg) {
                    Some(id) => Some(id),
                    None => {
                        println!("{}", format!("No folder named '{folder_arg}'").red());
                        return Ok(());
                    }
                }
            };
            chats.move_chat(&chat_id, target).await?;
            println!("{}", "Chat moved.".green());
        }
        "/mkdir" => {
            let name = args.join(" ");
            match chats.create_folder(&name).await? {
                Some(_) => println!("{}", format!("Created folder '{}'.", name.trim()).green()),
                None => println!("{}", "Folder name cannot be empty.".red()),
            }
        }
        "/rename" => {
            let (Some(folder_arg), rest) = (args.first(), args.get(1..).unwrap_or(&[])) else {
                println!("{}", "Usage: /rename <folder> <new name>".red());
                return Ok(());
            };
            match find_folder_id(&store, folder_arg) {
                Some(folder_id) => {
                    chats.rename_folder(&folder_id, &rest.join(" ")).await?;
                    println!("{}", "Folder renamed.".green());
                }
                None => println!("{}", format!("No folder named '{folder_arg}'").red()),
            }
        }
        "/rmdir" => match args.first().and_then(|arg| find_folder_id(&store, arg)) {
            Some(folder_id) => {
                chats.delete_folder(&folder_id).await?;
                let remaining = chats.snapshot().await;
                if remaining.folder(&folder_id).is_some() {
                    println!("{}", "The server refused; folder kept.".yellow());
                } else {
                    println!("{}", "Folder deleted; its chats are now unfiled.".green());
                }
            }
            None => println!("{}", "Usage: /rmdir <folder>".red()),
        },
        "/docs" => match args.first().and_then(|arg| find_folder_id(&store, arg)) {
            Some(folder_id) => match documents.refresh_documents(&folder_id).await {
                Ok(listing) if listing.is_empty() => {
                    println!("{}", "No documents in this folder.".bright_black())
                }
                Ok(listing) => {
                    for name in listing {
                        println!("  {name}");
                    }
                }
                Err(e) => println!("{}", format!("Could not list documents: {e}").red()),
            },
            None => println!("{}", "Usage: /docs <folder>".red()),
        },
        "/upload" => {
            let (Some(folder_arg), paths) = (args.first(), args.get(1..).unwrap_or(&[])) else {
                println!("{}", "Usage: /upload <folder> <path>...".red());
                return Ok(());
            };
            if paths.is_empty() {
                println!("{}", "Usage: /upload <folder> <path>...".red());
                return Ok(());
            }
            let Some(folder_id) = find_folder_id(&store, folder_arg) else {
                println!("{}", format!("No folder named '{folder_arg}'").red());
                return Ok(());
            };
            let files: Vec<PathBuf> = paths.iter().map(|p| PathBuf::from(*p)).collect();
            let outcome = documents.upload_documents(Some(&folder_id), &files).await?;
            println!(
                "{}",
                format!("Uploaded {}/{} documents.", outcome.uploaded, outcome.total).green()
            );
            for failure in &outcome.failures {
                println!(
                    "{}",
                    format!("  {}: {}", failure.filename, failure.message).red()
                );
            }
        }
        "/rmdoc" => {
            let (Some(folder_arg), Some(filename)) = (args.first(), args.get(1)) else {
                println!("{}", "Usage: /rmdoc <folder> <file>".red());
                return Ok(());
            };
            match find_folder_id(&store, folder_arg) {
                Some(folder_id) => {
                    documents.delete_document(&folder_id, filename).await;
                    println!("{}", "Done.".green());
                }
                None => println!("{}", format!("No folder named '{folder_arg}'").red()),
            }
        }
        "/dark" => {
            let dark = prefs.toggle_dark_mode().await?;
            println!(
                "{}",
                format!("Dark mode {}.", if dark { "on" } else { "off" }).green()
            );
        }
        _ => println!("{}", "Unknown command (try /help)".bright_black()),
    }

    Ok(())
}

fn print_message(message: &mentor_core::chat::ConversationMessage) {
    use mentor_core::chat::MessageRole;
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

/// The main entry point for the Mentor readline client.
///
/// Sets up the persistence and remote-service stack, restores the last
/// session state, and runs a rustyline REPL: slash commands manage the
/// folder/chat tree and documents, anything else is sent to the current
/// chat. Sends are awaited in place, so a second submit cannot start while
/// one is in flight.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // ===== Backend Initialization =====
    let paths = MentorPaths::new()?;
    let config = MentorConfig::load(&paths);

    let store_repository: Arc<dyn StoreRepository> = Arc::new(JsonStoreRepository::new(&paths));
    let prefs_repository: Arc<dyn PreferencesRepository> =
        Arc::new(JsonPreferencesRepository::new(&paths));
    let remote: Arc<dyn RemoteChatService> =
        Arc::new(HttpChatService::new(config.backend_url.clone()));

    let chats = ChatUseCase::new(store_repository, Arc::clone(&remote));
    chats.hydrate().await?;
    let documents = DocumentUseCase::new(remote);
    let prefs = PreferencesUseCase::new(prefs_repository);
    prefs.hydrate().await?;

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Mentor ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend: {}", config.backend_url).bright_black()
    );
    println!(
        "{}",
        "Type /help for commands, /quit to exit.".bright_black()
    );
    println!();
    print_sidebar(&chats.snapshot().await);

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed.starts_with('/') {
                    if let Err(e) = handle_command(trimmed, &chats, &documents, &prefs).await {
                        eprintln!("{}", format!("Error: {e}").red());
                    }
                    continue;
                }

                // Plain text goes to the current chat. The await here is
                // the whole "sending" state: input stays blocked until the
                // round trip finishes.
                match chats.send_message(trimmed).await {
                    Ok(SendOutcome::Sent { reply, sources }) => {
                        for line in reply.lines() {
                            println!("{}", line.bright_blue());
                        }
                        for source in &sources {
                            let origin = source
                                .metadata
                                .get("source")
                                .and_then(|v| v.as_str())
                                .unwrap_or("document");
                            println!("{}", format!("  [source: {origin}]").bright_black());
                        }
                    }
                    Ok(SendOutcome::Failed) => {
                        println!("{}", mentor_application::SEND_FAILURE_REPLY.yellow());
                    }
                    Ok(SendOutcome::Ignored) => {
                        println!(
                            "{}",
                            "No chat selected. Start one with /new.".bright_black()
                        );
                    }
                    Err(e) => eprintln!("{}", format!("Error: {e}").red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
