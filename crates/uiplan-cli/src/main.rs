//! `uiplan` binary
//!
//! Exit status: 0 on success, 1 when execution fails, the agent is
//! unreachable, or the request is rejected.

mod cli;

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uiplan_agent::{AgentConfig, AgentService, AgentTransport, HttpAgentTransport};
use uiplan_core::{CatalogResolver, Plan, PlanStatus, Planner, Resolver};
use uiplan_executor::PlanExecutor;

#[tokio::main]
async fn main() {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let code = match run(&matches).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("plan", args)) => {
            let (_, plan) = build_plan(args)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(true)
        }
        Some(("run", args)) => {
            let (resolver, plan) = build_plan(args)?;
            let service = AgentService::http(load_config(args)?, resolver)?;

            let executing = plan.with_status(PlanStatus::Executing);
            tracing::info!(plan_id = %executing.id(), status = ?executing.status(), "running plan");

            let result = PlanExecutor::new(Arc::new(service.clone()))
                .execute(&executing)
                .await;
            service.close().await;

            let status = if result.success() {
                PlanStatus::Completed
            } else {
                PlanStatus::Failed
            };
            let finished = executing.with_status(status);

            let report = serde_json::json!({
                "plan": finished,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(result.success())
        }
        Some(("health", args)) => {
            let config = load_config(args)?;
            let available = HttpAgentTransport::new(&config)?.is_available().await;
            println!(
                "{}: {}",
                config.agent_url,
                if available { "available" } else { "unavailable" }
            );
            Ok(available)
        }
        _ => Ok(false),
    }
}

fn build_plan(args: &ArgMatches) -> Result<(Arc<dyn Resolver>, Plan)> {
    let catalog = args
        .get_one::<PathBuf>("catalog")
        .context("--catalog is required")?;
    let resolver: Arc<dyn Resolver> = Arc::new(
        CatalogResolver::from_path(catalog)
            .with_context(|| format!("loading catalog {}", catalog.display()))?,
    );

    let request = cli::request_from(args)?;
    let plan = Planner::new(resolver.clone())
        .create_plan(&request)
        .context("planning failed")?;
    Ok((resolver, plan))
}

fn load_config(args: &ArgMatches) -> Result<AgentConfig> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => AgentConfig::from_toml_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    let mut config = config.apply_env_overrides()?;

    if let Some(url) = args.get_one::<String>("agent-url") {
        config = config.with_agent_url(url.as_str());
    }
    Ok(config)
}
