//! DSA Tutor CLI: the main entry point.
//!
//! Commands:
//! - `serve`: Start the HTTP server with the chat UI
//! - `ask`: Single question or interactive tutoring in the terminal
//! - `models`: List models offered by the completion API
//! - `tool`: Run one of the built-in DSA lookup tools
//! - `status`: Show the effective configuration
//! - `doctor`: Diagnose configuration and connectivity

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dsatutor",
    about = "DSA Tutor: step-by-step data structures & algorithms tutoring",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the tutor a question
    Ask {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List models offered by the completion API
    Models,

    /// Run a built-in tool
    Tool {
        /// Tool name (e.g. explain_dsa_concept)
        name: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Show the effective configuration
    Status,

    /// Diagnose configuration and connectivity
    Doctor,
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { message } => commands::ask::run(message).await?,
        Commands::Models => commands::models::run().await?,
        Commands::Tool { name, args } => commands::tool::run(&name, &args).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
