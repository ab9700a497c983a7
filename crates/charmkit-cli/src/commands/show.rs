//! Show command - display charm information

use charmkit_core::{Charm, LoadedCharm, MetricType, RelationRole, read_charm};
use console::style;
use serde::Serialize;
use std::path::Path;

use crate::error::{CliError, Result};

#[derive(Serialize)]
struct ShowOutput<'a> {
    format: &'static str,
    path: String,
    revision: u32,
    version: Option<&'a str>,
    meta: &'a charmkit_core::Meta,
    config: &'a charmkit_core::Config,
    actions: &'a charmkit_core::Actions,
    metrics: Option<&'a charmkit_core::Metrics>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let charm = read_charm(path)?;

    if json {
        return print_json(&charm);
    }

    let meta = charm.meta();

    println!("{}", style(&meta.name).cyan().bold());
    println!("{}", style("=".repeat(meta.name.len())).dim());
    println!();

    println!("{}: {}", style("Format").bold(), format_name(&charm));
    println!("{}: {}", style("Revision").bold(), charm.revision());

    if let Some(version) = charm.version() {
        println!("{}: {}", style("Version").bold(), version);
    }

    if !meta.summary.is_empty() {
        println!("{}: {}", style("Summary").bold(), meta.summary);
    }

    if meta.subordinate {
        println!("{}: yes", style("Subordinate").bold());
    }

    match meta.series.split_first() {
        Some((default, rest)) => {
            let mut series = vec![format!("{} (default)", default)];
            series.extend(rest.iter().cloned());
            println!("{}: {}", style("Series").bold(), series.join(", "));
        }
        None => println!("{}: any (legacy charm)", style("Series").bold()),
    }

    let relations: Vec<_> = meta.relations().collect();
    if !relations.is_empty() {
        println!();
        println!("{}:", style("Relations").bold());
        for (name, role, relation) in relations {
            let role = match role {
                RelationRole::Provider => "provides",
                RelationRole::Requirer => "requires",
                RelationRole::Peer => "peers",
            };
            println!("  - {} ({} {})", name, role, relation.interface);
        }
    }

    let options = &charm.config().options;
    if !options.is_empty() {
        println!();
        println!("{}:", style("Options").bold());
        for (name, option) in options {
            match &option.default {
                Some(default) => println!(
                    "  - {} [{}] = {}",
                    name,
                    option.option_type,
                    yaml_scalar(default)
                ),
                None => println!("  - {} [{}]", name, option.option_type),
            }
        }
    }

    let actions = charm.actions();
    if !actions.is_empty() {
        println!();
        println!("{}:", style("Actions").bold());
        for (name, action) in &actions.actions {
            if action.description.is_empty() {
                println!("  - {}", name);
            } else {
                println!("  - {}: {}", name, style(&action.description).dim());
            }
        }
    }

    if let Some(metrics) = charm.metrics().filter(|m| !m.is_empty()) {
        println!();
        println!("{}:", style("Metrics").bold());
        for (name, metric) in &metrics.metrics {
            let kind = match metric.metric_type {
                Some(MetricType::Gauge) => "gauge",
                Some(MetricType::Absolute) => "absolute",
                None => "builtin",
            };
            println!("  - {} ({})", name, kind);
        }
    }

    Ok(())
}

fn print_json(charm: &LoadedCharm) -> Result<()> {
    let output = ShowOutput {
        format: format_name(charm),
        path: charm.path().display().to_string(),
        revision: charm.revision(),
        version: charm.version(),
        meta: charm.meta(),
        config: charm.config(),
        actions: charm.actions(),
        metrics: charm.metrics(),
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::internal(format!("JSON serialization failed: {e}")))?;
    println!("{}", rendered);
    Ok(())
}

fn format_name(charm: &LoadedCharm) -> &'static str {
    if charm.is_dir() { "directory" } else { "archive" }
}

fn yaml_scalar(value: &serde_yaml::Value) -> String {
    match serde_yaml::to_string(value) {
        Ok(rendered) => rendered.trim_end().to_string(),
        Err(_) => format!("{:?}", value),
    }
}
