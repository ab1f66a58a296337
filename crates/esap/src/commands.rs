//! ESAP command implementations

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, info};

use esap_agent::{AgentLoop, Backends, Persona, WorkflowOutput, WorkflowRunner};
use esap_config::{self, Config};
use esap_provider::OpenRouterProvider;
use esap_records::PageRequest;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Which fixed workflow to run
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowKind {
    Weather {
        city: String,
    },
    Employees {
        page_index: Option<u32>,
        page_size: Option<u32>,
    },
    Suppliers {
        page_index: Option<u32>,
        page_size: Option<u32>,
    },
}

fn provider(config: &Config) -> Result<OpenRouterProvider> {
    let api_key = config
        .api_key()
        .context("No API key configured. Set one in ~/.esap/config.json or OPENROUTER_API_KEY")?;
    Ok(OpenRouterProvider::new(
        api_key,
        config.api_base(),
        Some(config.default_model()),
    ))
}

/// Initialize config
pub async fn init_command() -> Result<()> {
    println!("◆ Initializing ESAP agents...");
    println!("{RULE}");

    esap_config::init()
        .await
        .context("could not write default config")?;

    println!("\n◆ Config ready at {}", esap_config::config_path().display());
    println!("\nNext steps:");
    println!("  1. Add your LLM API key to ~/.esap/config.json");
    println!("     (or export OPENROUTER_API_KEY)");
    println!("  2. Add HRMS / SCM tokens, or export ESAP_HRMS_TOKEN / ESAP_SCM_TOKEN");
    println!("  3. Start chatting: esap chat --agent hrms -m \"List employees\"");

    Ok(())
}

fn set_or_missing(set: bool) -> &'static str {
    if set {
        "[Set]"
    } else {
        "[Missing]"
    }
}

/// Show system status
pub async fn status_command() -> Result<()> {
    let config_path = esap_config::config_path();

    println!("◆ ESAP System Status");
    println!("{RULE}");

    println!(
        "Config:     {} {}",
        config_path.display(),
        if config_path.exists() { "[OK]" } else { "[Missing]" }
    );

    let config = Config::load().await.context("could not read config")?;
    println!("Model:      {}", config.default_model());
    println!("API Key:    {}", set_or_missing(config.has_api_key()));
    println!(
        "HRMS:       {} token {}",
        config.services.hrms.base_url,
        set_or_missing(config.hrms_token().is_some())
    );
    println!(
        "SCM:        {} token {}",
        config.services.scm.base_url,
        set_or_missing(config.scm_token().is_some())
    );
    println!("Weather:    {}", config.services.weather.forecast_url);
    println!("Timeout:    {}s", config.services.timeout_secs);

    println!("\n◆ Ready");
    Ok(())
}

/// Chat with one persona, once or interactively
pub async fn chat_command(agent: &str, message: Option<String>) -> Result<()> {
    let persona: Persona = agent.parse()?;
    let config = Config::load().await?;
    let provider = provider(&config)?;

    let backends = Backends::from_config(&config).context("could not build service clients")?;
    let tools = backends.registry_for(persona.tool_names());
    debug!("{} tools for {}", tools.len(), persona);

    let agent = AgentLoop::with_defaults(provider, persona, tools, &config.agent);

    if let Some(msg) = message {
        let answer = agent.process(&msg).await?;
        println!("\n◆ {}", answer);
        return Ok(());
    }

    println!("◆ {} (type 'exit' to quit, 'reset' to forget)", persona.display_name());
    println!("{RULE}");

    loop {
        print!("◆ ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }
        if input == "reset" {
            agent.clear_history().await;
            println!("◆ History cleared\n");
            continue;
        }

        match agent.process(input).await {
            Ok(answer) => println!("\n◆ {}\n", answer),
            Err(e) => println!("\n✗ {}\n", e),
        }
    }

    Ok(())
}

fn print_workflow(title: &str, output: &WorkflowOutput) {
    println!("◆ {}", title);
    println!("{RULE}");
    println!("{}", output.text);
}

/// Run a fixed workflow
pub async fn workflow_command(kind: WorkflowKind) -> Result<()> {
    let config = Config::load().await?;
    let runner = WorkflowRunner::new(provider(&config)?, &config.agent);
    let backends = Backends::from_config(&config).context("could not build service clients")?;

    match kind {
        WorkflowKind::Weather { city } => {
            let output = runner.weather(&backends.weather, &city).await?;
            print_workflow(&format!("Activities for {}", city), &output);
        }
        WorkflowKind::Employees {
            page_index,
            page_size,
        } => {
            let page = PageRequest::new(page_index, page_size);
            let output = runner.employees(&backends.employee, page).await?;
            print_workflow("Employee summary", &output);
        }
        WorkflowKind::Suppliers {
            page_index,
            page_size,
        } => {
            let page = PageRequest::new(page_index, page_size);
            let output = runner.suppliers(&backends.supplier, page).await?;
            print_workflow("Supplier summary", &output);
        }
    }

    Ok(())
}

/// Call one tool directly
pub async fn tool_command(name: &str, args: &str) -> Result<()> {
    let args: Value = serde_json::from_str(args).context("--args must be a JSON object")?;
    if !args.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }

    let config = Config::load().await?;
    let registry = Backends::from_config(&config)
        .context("could not build service clients")?
        .full_registry();

    info!("calling {}", name);
    let output = registry.call(name, args).await?;

    // envelopes are JSON; print them readably
    match serde_json::from_str::<Value>(&output) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", output),
    }
    Ok(())
}

/// List tools
pub async fn tools_command() -> Result<()> {
    let config = Config::load().await?;
    let backends = Backends::from_config(&config).context("could not build service clients")?;
    let registry = backends.full_registry();

    println!("◆ Tools ({})", registry.len());
    println!("{RULE}");
    for spec in registry.definitions() {
        println!("  {:<26} {}", spec.function.name, spec.function.description);
    }

    println!("\n◆ Personas");
    for persona in Persona::ALL {
        println!("  {:<8} {}", persona.key(), persona.tool_names().join(", "));
    }
    Ok(())
}
