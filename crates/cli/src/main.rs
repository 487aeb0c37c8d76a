use chatbot::config::Config;
use chatbot::dialog::{self, DialogAdapter};
use chatbot::router::{Dispatcher, TransportRequest};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(about = "Chatbot request router", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the HTTP gateway (POST /chat, POST /invoke, GET /). Uses the dialog engine when BOT_ID and BOT_ALIAS_ID are set, the keyword fallback otherwise.
    Serve {
        /// Config file path (default: CHATBOT_CONFIG_PATH or ~/.chatbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from config or 8080)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one chat message through the router and print the reply JSON.
    Ask {
        /// Message text.
        message: String,

        /// Session id to send (default "default-session").
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Skip the dialog engine and answer from the keyword fallback.
        #[arg(long)]
        offline: bool,

        /// Config file path (default: CHATBOT_CONFIG_PATH or ~/.chatbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Dispatch one raw event (JSON file, or "-" for stdin) and print the response JSON.
    Invoke {
        /// Event file path; "-" reads stdin.
        #[arg(long, short, value_name = "PATH", default_value = "-")]
        event: PathBuf,

        /// Skip the dialog engine and answer from the keyword fallback.
        #[arg(long)]
        offline: bool,

        /// Config file path (default: CHATBOT_CONFIG_PATH or ~/.chatbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("chatbot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Ask {
            message,
            session,
            offline,
            config,
        }) => {
            if let Err(e) = run_ask(message, session, offline, config).await {
                log::error!("ask failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Invoke {
            event,
            offline,
            config,
        }) => {
            if let Err(e) = run_invoke(event, offline, config).await {
                log::error!("invoke failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn build_adapter(config: &Config, offline: bool) -> DialogAdapter {
    if offline {
        dialog::offline_adapter("--offline")
    } else {
        dialog::adapter_from_config(config)
    }
}

async fn run_serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = chatbot::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    chatbot::gateway::run_gateway(config).await
}

async fn run_ask(
    message: String,
    session: Option<String>,
    offline: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = chatbot::config::load_config(config_path)?;
    let adapter = build_adapter(&config, offline);
    let mut body = serde_json::json!({ "message": message });
    if let Some(id) = session {
        body["sessionId"] = serde_json::Value::String(id);
    }
    let req = TransportRequest::post(serde_json::to_string(&body)?);
    let res = chatbot::router::handle_transport(&adapter, &req, None).await;
    let reply = res.body_json()?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    if res.status_code != 200 {
        anyhow::bail!("request rejected with status {}", res.status_code);
    }
    Ok(())
}

async fn run_invoke(
    event_path: PathBuf,
    offline: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let raw = if event_path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(&event_path)
            .map_err(|e| anyhow::anyhow!("reading event from {}: {}", event_path.display(), e))?
    };
    let event: serde_json::Value = serde_json::from_str(&raw)?;
    let config = chatbot::config::load_config(config_path)?;
    let dispatcher = Dispatcher::new(build_adapter(&config, offline));
    let response = dispatcher.dispatch_value(event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
