//! Command line definition

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use uiplan_core::{ExecutionRequest, Metadata};

pub(crate) fn build_cli() -> Command {
    Command::new("uiplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan and run UI actions through an interaction agent")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("plan")
                .about("Build the plan for a request and print it as JSON")
                .args(request_args()),
        )
        .subcommand(
            Command::new("run")
                .about("Build and execute a plan, print the execution result as JSON")
                .args(request_args())
                .args(agent_args()),
        )
        .subcommand(
            Command::new("health")
                .about("Check whether the interaction agent is reachable")
                .args(agent_args()),
        )
}

fn request_args() -> [Arg; 5] {
    [
        Arg::new("catalog")
            .long("catalog")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Metadata catalog (.toml, .json, .yaml)"),
        Arg::new("entity-type")
            .long("entity-type")
            .required(true)
            .help("Entity type id, e.g. Building"),
        Arg::new("entity-id")
            .long("entity-id")
            .required(true)
            .help("Entity instance id"),
        Arg::new("action")
            .long("action")
            .required(true)
            .help("Action id"),
        Arg::new("param")
            .long("param")
            .action(ArgAction::Append)
            .value_parser(parse_param)
            .help("Request parameter as key=value (value may be JSON)"),
    ]
}

fn agent_args() -> [Arg; 2] {
    [
        Arg::new("config")
            .long("config")
            .value_parser(value_parser!(PathBuf))
            .help("Agent config file (TOML)"),
        Arg::new("agent-url")
            .long("agent-url")
            .help("Agent URL, overrides config and environment"),
    ]
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a string
pub(crate) fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in {raw:?}"));
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub(crate) fn request_from(args: &ArgMatches) -> Result<ExecutionRequest> {
    let value = |name: &str| {
        args.get_one::<String>(name)
            .cloned()
            .unwrap_or_default()
    };

    let parameters: Metadata = args
        .get_many::<(String, serde_json::Value)>("param")
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let request = ExecutionRequest::new(value("entity-type"), value("entity-id"), value("action"))
        .context("invalid request")?;
    Ok(request.with_parameters(parameters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn params_accept_json_and_plain_values() {
        assert_eq!(parse_param("limit=10").unwrap(), ("limit".to_string(), json!(10)));
        assert_eq!(
            parse_param("note=urgent order").unwrap(),
            ("note".to_string(), json!("urgent order"))
        );
        assert_eq!(parse_param("empty=").unwrap(), ("empty".to_string(), json!("")));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn request_is_built_from_run_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "uiplan",
                "run",
                "--catalog",
                "catalog.toml",
                "--entity-type",
                "Building",
                "--entity-id",
                "93939",
                "--action",
                "order_egrn_extract",
                "--param",
                "urgent=true",
                "--json-logs",
            ])
            .unwrap();
        assert!(matches.get_flag("json-logs"));

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "run");

        let request = request_from(args).unwrap();
        assert_eq!(request.entity_type_id(), "Building");
        assert_eq!(request.entity_id(), "93939");
        assert_eq!(request.parameters().get("urgent"), Some(&json!(true)));
    }

    #[test]
    fn empty_entity_id_is_rejected() {
        let matches = build_cli()
            .try_get_matches_from([
                "uiplan", "plan", "--catalog", "c.toml", "--entity-type", "Building",
                "--entity-id", "", "--action", "a",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(request_from(args).is_err());
    }
}
