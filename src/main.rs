use dinelink_assistant::api::{self, AppState};
use dinelink_assistant::chat::{ChatSession, HistoryStore, IntentResolver};
use dinelink_assistant::commands::CommandHandler;
use dinelink_assistant::config::{AssistantConfig, FallbackMode, RenderMode};
use dinelink_assistant::menu::Catalog;
use dinelink_assistant::persona::AssistantPersona;
use dinelink_assistant::providers;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use dotenv::dotenv;
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::net::TcpListener;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FallbackArg {
    Terminal,
    Delegate,
}

impl From<FallbackArg> for FallbackMode {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Terminal => FallbackMode::Terminal,
            FallbackArg::Delegate => FallbackMode::Delegate,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serve the HTTP API instead of the interactive chat
    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,

    /// JSON file with the menu items
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON persona profile for the AI fallback
    #[arg(long)]
    persona: Option<PathBuf>,

    #[arg(long, value_enum)]
    fallback: Option<FallbackArg>,

    /// Render list replies with HTML markup
    #[arg(long)]
    html: bool,

    /// Skip the simulated typing pause
    #[arg(long)]
    no_delay: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize colored output
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();
    let config = load_config(&args)?;

    let catalog = Arc::new(match &config.catalog_path {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::default(),
    });

    let persona = match &args.persona {
        Some(path) => AssistantPersona::from_file(path)?,
        None => AssistantPersona::default(),
    };
    let system_prompt = persona.generate_system_prompt(Some(&catalog));

    let resolver = Arc::new(IntentResolver::new(catalog.clone(), config.resolver));

    if args.api {
        run_api_server(&args, &config, resolver, &system_prompt).await
    } else {
        run_cli_mode(&config, resolver, catalog, &system_prompt).await
    }
}

fn load_config(args: &Args) -> Result<AssistantConfig, Box<dyn std::error::Error + Send + Sync>> {
    let mut config = AssistantConfig::from_env()?;

    if let Some(path) = &args.catalog {
        config.catalog_path = Some(path.clone());
    }
    if let Some(fallback) = args.fallback {
        config.resolver.fallback_mode = fallback.into();
    }
    if args.html {
        config.resolver.render_mode = RenderMode::Html;
    } else if !args.api && std::env::var("DINELINK_RENDER_MODE").is_err() {
        // The terminal cannot show markup.
        config.resolver.render_mode = RenderMode::Plain;
    }
    if args.no_delay {
        config.typing_delay = Duration::ZERO;
    }

    Ok(config)
}

async fn run_cli_mode(
    config: &AssistantConfig,
    resolver: Arc<IntentResolver>,
    catalog: Arc<Catalog>,
    system_prompt: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = HistoryStore::new(config.history_path(), config.history_limit);
    let mut session = ChatSession::new(resolver.clone(), config.history_limit)
        .with_store(store)
        .with_typing_delay(config.typing_delay);

    if resolver.settings().fallback_mode == FallbackMode::Delegate {
        match providers::delegate_from_config(config, system_prompt) {
            Some(provider) => {
                if let Ok(model) = provider.get_model_info().await {
                    info!("Unmatched messages go to {}", model);
                }
                session = session.with_provider(provider);
            }
            None => warn!("Fallback mode is delegate but neither DINELINK_ASK_URL nor OPENAI_API_KEY is set"),
        }
    }

    let mut command_handler = CommandHandler::new(session, catalog);

    // Show initial help menu
    command_handler.handle_command("help").await?;

    // Initialize rustyline editor
    let mut rl = Editor::<(), DefaultHistory>::new()?;

    // Main input loop
    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                if let Err(e) = command_handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(
    args: &Args,
    config: &AssistantConfig,
    resolver: Arc<IntentResolver>,
    system_prompt: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = ([0, 0, 0, 0], args.port).into();

    let mut state = AppState::new(resolver.clone());

    // `/ask` always talks to the model directly; the relay URL may point back here.
    match providers::openai_from_config(config, system_prompt) {
        Some(provider) => state = state.with_completion(Box::new(provider)),
        None => warn!("OPENAI_API_KEY not set, /ask will answer 503"),
    }
    if resolver.settings().fallback_mode == FallbackMode::Delegate {
        if let Some(provider) = providers::delegate_from_config(config, system_prompt) {
            state = state.with_delegate(provider);
        }
    }

    let app = api::create_api(state);

    let listener = TcpListener::bind(&addr).await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    info!("Server successfully bound to {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
