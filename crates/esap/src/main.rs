//! ESAP agents command line

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::{
    chat_command, init_command, status_command, tool_command, tools_command,
    workflow_command, WorkflowKind,
};

/// ESAP agents for your terminal
#[derive(Parser)]
#[command(name = "esap")]
#[command(about = "◆ HRMS, supply-chain and weather agents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config
    Init,
    /// Show system status
    Status,
    /// Chat with an agent persona
    Chat {
        /// Persona: hrms, scm or weather
        #[arg(short, long, default_value = "hrms")]
        agent: String,
        /// Message to send
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Run a fixed fetch-then-summarize workflow
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
    /// Call a single tool and print its envelope
    Tool {
        /// Tool name, see `esap tools`
        name: String,
        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// List available tools
    Tools,
}

#[derive(Subcommand)]
enum WorkflowCommands {
    /// Daily forecast and activity suggestions for a city
    Weather {
        #[arg(short, long)]
        city: String,
    },
    /// Summarize a page of employees
    Employees {
        #[arg(long)]
        page_index: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Summarize a page of suppliers
    Suppliers {
        #[arg(long)]
        page_index: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
}

impl From<WorkflowCommands> for WorkflowKind {
    fn from(command: WorkflowCommands) -> Self {
        match command {
            WorkflowCommands::Weather { city } => WorkflowKind::Weather { city },
            WorkflowCommands::Employees {
                page_index,
                page_size,
            } => WorkflowKind::Employees {
                page_index,
                page_size,
            },
            WorkflowCommands::Suppliers {
                page_index,
                page_size,
            } => WorkflowKind::Suppliers {
                page_index,
                page_size,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let result = match cli.command {
        Commands::Init => init_command().await,
        Commands::Status => status_command().await,
        Commands::Chat { agent, message } => chat_command(&agent, message).await,
        Commands::Workflow { command } => workflow_command(command.into()).await,
        Commands::Tool { name, args } => tool_command(&name, &args).await,
        Commands::Tools => tools_command().await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
