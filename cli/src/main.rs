
use clap::{Args, Parser, Subcommand};
use client::config::{ClientConfig, ConfigError};
use client::net::api::{ApiClient, ApiError};
use client::net::socket::{ChatSocket, SocketEvent};
use client::net::types::{CreateChatroomRequest, LoginRequest, MessageQuery, RoomMessage};
use client::state::chat::ChatMessage;
use client::state::page::ChatPage;
use client::view;
use frames::ChatFrame;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing token; pass --token or set CHAT_TOKEN")]
    MissingToken,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("gave up on room {room_id} after {attempts} reconnect attempts")]
    Exhausted { room_id: String, attempts: u32 },
}

#[derive(Parser, Debug)]
#[command(name = "chat-cli", about = "Chat backend API and room channel CLI")]
struct Cli {
    /// REST base URL, e.g. `http://localhost:8080/api`.
    #[arg(long, env = "CHAT_API_URL")]
    api_url: Option<String>,

    /// WebSocket base URL, e.g. `ws://localhost:8080/ws`.
    #[arg(long, env = "CHAT_WS_URL")]
    ws_url: Option<String>,

    #[arg(long, env = "CHAT_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the chat page with its built-in data.
    Mock(MockArgs),
    Api(ApiCommand),
    /// Join a room: print what arrives, send each stdin line.
    Chat {
        room_id: String,
        /// Own username, used to hide the room's echo of sent lines.
        #[arg(long = "as")]
        username: Option<String>,
    },
}

#[derive(Args, Debug)]
struct MockArgs {
    /// Message to submit before rendering. Repeatable.
    #[arg(long = "send")]
    send: Vec<String>,

    /// Room id to open instead of the default.
    #[arg(long)]
    select: Option<String>,

    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Profile,
    Logout,
    Rooms(RoomsCommand),
    Messages {
        room_id: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        /// One `author: content` line per message instead of JSON.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Args, Debug)]
struct RoomsCommand {
    #[command(subcommand)]
    command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RoomsSubcommand {
    List,
    Get {
        room_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.api_url.as_deref(), cli.ws_url.as_deref())?;

    match cli.command {
        Command::Mock(args) => {
            println!("{}", run_mock(&args, now()));
            Ok(())
        }
        Command::Api(api) => run_api(&config, cli.token, api).await,
        Command::Chat { room_id, username } => run_chat(&config, &room_id, cli.token.as_deref(), username).await,
    }
}

/// Environment config with URL flags applied on top.
fn resolve_config(api_url: Option<&str>, ws_url: Option<&str>) -> Result<ClientConfig, CliError> {
    let base = ClientConfig::from_env()?;
    if api_url.is_none() && ws_url.is_none() {
        return Ok(base);
    }
    let urls = ClientConfig::with_urls(
        api_url.unwrap_or(&base.api_base_url),
        ws_url.unwrap_or(&base.ws_base_url),
    )?;
    Ok(ClientConfig { api_base_url: urls.api_base_url, ws_base_url: urls.ws_base_url, ..base })
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn run_mock(args: &MockArgs, now: OffsetDateTime) -> String {
    let mut page = ChatPage::mount(now);
    if let Some(room_id) = &args.select {
        if !page.sidebar.select_room(room_id) {
            eprintln!("unknown room: {room_id}");
        }
    }
    if let Some(query) = &args.search {
        page.sidebar.search(query.clone());
    }
    for text in &args.send {
        page.chat.set_draft(text.clone());
        if page.chat.send_draft(now).is_none() {
            eprintln!("skipped blank message");
        }
    }
    view::render_page(&page)
}

async fn run_api(config: &ClientConfig, token: Option<String>, api: ApiCommand) -> Result<(), CliError> {
    let mut client = ApiClient::new(config)?;
    if let Some(token) = token {
        client = client.with_token(token);
    }

    match api.command {
        ApiSubcommand::Login { username, password } => {
            let response = client.login(&LoginRequest { username, password }).await?;
            print_json(&response)
        }
        ApiSubcommand::Profile => {
            require_token(&client)?;
            print_json(&client.profile().await?)
        }
        ApiSubcommand::Logout => {
            require_token(&client)?;
            client.logout().await?;
            println!("ok");
            Ok(())
        }
        ApiSubcommand::Rooms(rooms) => match rooms.command {
            RoomsSubcommand::List => print_json(&client.list_chatrooms().await?),
            RoomsSubcommand::Get { room_id } => print_json(&client.chatroom(&room_id).await?),
            RoomsSubcommand::Create { name, description } => {
                require_token(&client)?;
                let room = client.create_chatroom(&CreateChatroomRequest { name, description }).await?;
                print_json(&room)
            }
        },
        ApiSubcommand::Messages { room_id, limit, offset, plain } => {
            let messages = client.messages(&room_id, MessageQuery { limit, offset }).await?;
            if !plain {
                return print_json(&messages);
            }
            for message in &messages {
                println!("{}", history_line(message));
            }
            Ok(())
        }
    }
}

fn history_line(message: &RoomMessage) -> String {
    match message.created_at.as_deref() {
        Some(at) => format!("[{at}] {}: {}", message.author(), message.content),
        None => format!("{}: {}", message.author(), message.content),
    }
}

fn require_token(client: &ApiClient) -> Result<(), CliError> {
    client.token().map(|_| ()).ok_or(CliError::MissingToken)
}

async fn run_chat(
    config: &ClientConfig,
    room_id: &str,
    token: Option<&str>,
    username: Option<String>,
) -> Result<(), CliError> {
    let (socket, mut events) = ChatSocket::new(config);
    let mut page = ChatPage::mount(now());
    if let Some(username) = username {
        page = page.with_identity(username);
    }
    tracing::info!(%room_id, authenticated = token.is_some(), "joining room");
    socket.connect(room_id, token);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    if let Err(error) = socket.send(&ChatFrame::message(line)) {
                        eprintln!("not sent: {error}");
                    }
                }
                None => break Ok(()),
            },
            event = events.recv() => {
                let Some(event) = event else { break Ok(()) };
                let before = page.chat.messages().len();
                page.apply(&event, now());
                if let Some(line) = describe_event(&event, page.chat.messages().get(before)) {
                    println!("{line}");
                }
                if let SocketEvent::Exhausted { attempts } = event {
                    break Err(CliError::Exhausted { room_id: room_id.to_owned(), attempts });
                }
            }
        }
    };

    socket.disconnect();
    outcome
}

/// One terminal line per socket event. Frames print as the feed entry they
/// produced, if any.
fn describe_event(event: &SocketEvent, appended: Option<&ChatMessage>) -> Option<String> {
    match event {
        SocketEvent::Opened { room_id } => Some(format!("* connected to room {room_id}")),
        SocketEvent::Frame(_) => appended.map(view::render_message),
        SocketEvent::Error(message) => Some(format!("! {message}")),
        SocketEvent::Closed { code, reason } if reason.is_empty() => Some(format!("* closed ({code})")),
        SocketEvent::Closed { code, reason } => Some(format!("* closed ({code}): {reason}")),
        SocketEvent::Retrying { attempt, max_attempts } => {
            Some(format!("* reconnecting ({attempt}/{max_attempts})"))
        }
        SocketEvent::Exhausted { attempts } => Some(format!("* gave up after {attempts} attempts")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
