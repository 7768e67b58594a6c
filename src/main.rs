//! prompt-forge CLI.
//!
//! Usage:
//!   prompt-forge analyze "write a blog post" --tool claude_chat
//!   echo "write a report" | prompt-forge optimize --framework RISEN --save
//!   prompt-forge tools
//!   prompt-forge history

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use prompt_forge::config::{Config, RuntimeConfig};
use prompt_forge::library::RunRecord;
use prompt_forge::{LibraryEntry, LibraryLog, LibraryStats, OptimizerSession};
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "prompt-forge")]
#[command(about = "Score and optimize prompts for AI tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Selection {
    /// Prompt text; read from stdin when omitted
    prompt: Option<String>,
    /// Target tool id
    #[arg(long)]
    tool: Option<String>,
    /// Structuring framework id
    #[arg(long)]
    framework: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a prompt on all ten metrics
    Analyze {
        #[command(flatten)]
        selection: Selection,
    },
    /// Run the optimization pipeline
    Optimize {
        #[command(flatten)]
        selection: Selection,
        /// Print every stage record
        #[arg(long)]
        stages: bool,
        /// Append the run to the history library
        #[arg(long)]
        save: bool,
    },
    /// List catalog tools
    Tools,
    /// List catalog frameworks
    Frameworks,
    /// Summarize the history library
    History {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let runtime = RuntimeConfig::load_from_env();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&runtime.log_level))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    let kb = Arc::new(config.knowledge_base().context("Failed to load knowledge base")?);
    info!(
        "Catalog ready: {} tools, {} frameworks, {} techniques",
        kb.tools.len(),
        kb.frameworks.len(),
        kb.techniques.len()
    );
    let session = OptimizerSession::new(kb);

    match cli.command {
        Commands::Analyze { selection } => analyze(&session, &config, selection),
        Commands::Optimize {
            selection,
            stages,
            save,
        } => optimize(&session, &config, selection, stages, save),
        Commands::Tools => {
            for (id, tool) in &session.knowledge_base().tools {
                println!("{:<26} {:<10} {}", id, tool.category, tool.name);
            }
            Ok(())
        }
        Commands::Frameworks => {
            let strategies = prompt_forge::frameworks::registry();
            for (id, framework) in &session.knowledge_base().frameworks {
                let kind = if strategies.has_dedicated(id) { "dedicated" } else { "generic" };
                println!("{:<10} {:<9} {}", id, kind, framework.components.join(", "));
            }
            Ok(())
        }
        Commands::History { json } => history(&config, json),
    }
}

fn read_prompt(prompt: Option<String>) -> Result<String> {
    match prompt {
        Some(p) => Ok(p),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read prompt from stdin")?;
            Ok(buf)
        }
    }
}

/// Resolve ids against the catalog, falling back to configured defaults.
fn resolve(session: &OptimizerSession, config: &Config, selection: &Selection) -> Result<(String, String)> {
    let kb = session.knowledge_base();
    let tool = selection.tool.clone().unwrap_or_else(|| config.defaults.tool.clone());
    let framework = selection
        .framework
        .clone()
        .unwrap_or_else(|| config.defaults.framework.clone());
    kb.require_tool(&tool)?;
    kb.require_framework(&framework)?;
    Ok((tool, framework))
}

fn analyze(session: &OptimizerSession, config: &Config, selection: Selection) -> Result<()> {
    let (tool, framework) = resolve(session, config, &selection)?;
    let prompt = read_prompt(selection.prompt)?;
    let analysis = session.analyze(&prompt, &tool, &framework);

    if selection.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }
    for (metric, score) in analysis.scores.iter() {
        println!("{:<20} {:>3}", metric.key(), score);
    }
    println!("{:<20} {:>3}", "average", analysis.average);
    for issue in &analysis.issues {
        println!("issue: {}", issue);
    }
    for rec in &analysis.recommendations {
        println!("recommend: {}", rec);
    }
    Ok(())
}

fn optimize(
    session: &OptimizerSession,
    config: &Config,
    selection: Selection,
    stages: bool,
    save: bool,
) -> Result<()> {
    let (tool, framework) = resolve(session, config, &selection)?;
    let prompt = read_prompt(selection.prompt)?;
    let analysis = session.analyze(&prompt, &tool, &framework);
    let result = session.optimize(&prompt, &tool, &framework)?;

    if save {
        let category = session
            .knowledge_base()
            .tool(&tool)
            .map(|t| t.category.as_str())
            .unwrap_or("general");
        let entry = LibraryEntry::from_run(
            Uuid::new_v4(),
            Utc::now(),
            &RunRecord {
                prompt: &prompt,
                tool_id: &tool,
                framework_id: &framework,
                category,
                analysis: &analysis,
                result: &result,
            },
        );
        LibraryLog::new(&config.library.path).append(&entry)?;
        info!("Saved {} to {}", entry.id, config.library.path.display());
    }

    if selection.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if stages {
        for stage in &result.stages {
            let mark = if stage.applied { "+" } else { "-" };
            eprintln!("[{}] {}: {}", mark, stage.name, stage.description);
        }
    }
    println!("{}", result.final_text);
    eprintln!();
    eprintln!("techniques: {}", result.applied_techniques.join(", "));
    for check in &result.validation {
        let mark = if check.passed { "pass" } else { "FAIL" };
        eprintln!(
            "{} {}: {}",
            mark,
            check.name,
            check.details.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn history(config: &Config, json: bool) -> Result<()> {
    let entries = LibraryLog::new(&config.library.path).entries()?;
    let stats = LibraryStats::from_entries(&entries);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("Total optimizations: {}", stats.total);
    println!("Avg improvement:     {} pts", stats.avg_improvement);
    println!(
        "Most used tool:      {}",
        stats.most_used_tool.as_deref().unwrap_or("None")
    );
    for (technique, count) in &stats.technique_usage {
        println!("  {:<28} {}", technique, count);
    }
    Ok(())
}
