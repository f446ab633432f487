//! TypeCraft CLI - Bridge interface for the host panel
//!
//! Commands: rulesets, analyze, recommend, report, format, rescale, kern, fix-plan
//! Element payloads are the host's JSON snapshots; outputs JSON to stdout.
//! Returns non-zero on failure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use typecraft_core::{
    kerning::{plan_pair_kerning, KerningPair},
    rules::RuleSetRegistry,
    scale::DEFAULT_SCALE_RATIO,
    AnalysisResult, SnapshotHost, TextElement, TypographyPipeline,
};

#[derive(Parser)]
#[command(name = "typecraft-cli")]
#[command(about = "TypeCraft CLI - Typography Correction Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the rule sets directory
    #[arg(short, long, default_value = "rulesets")]
    rulesets_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List available rule sets
    Rulesets,

    /// Analyze a selection of text elements
    Analyze {
        /// JSON payload (array of TextElement)
        #[arg(short, long)]
        payload: String,
    },

    /// Aggregate analysis results into prioritized recommendations
    Recommend {
        /// JSON payload (array of AnalysisResult)
        #[arg(short, long)]
        payload: String,
    },

    /// Analyze and wrap the run in a hashed report manifest
    Report {
        /// JSON payload (array of TextElement)
        #[arg(short, long)]
        payload: String,
    },

    /// Apply a registered rule set to a selection snapshot
    Format {
        /// Rule set ID
        #[arg(short = 't', long)]
        ruleset: String,

        /// JSON payload (array of TextElement)
        #[arg(short, long)]
        payload: String,
    },

    /// Rescale a selection onto a geometric type scale
    Rescale {
        /// JSON payload (array of TextElement)
        #[arg(short, long)]
        payload: String,

        /// Base size in points for the smallest level
        #[arg(short, long)]
        base_size: Option<f64>,

        /// Ratio between adjacent levels
        #[arg(short, long, default_value_t = DEFAULT_SCALE_RATIO)]
        scale_ratio: f64,
    },

    /// Plan pair-kerning edits over a text run
    Kern {
        /// Text content to scan
        #[arg(short, long)]
        text: String,

        /// JSON payload (array of KerningPair)
        #[arg(short, long)]
        payload: String,
    },

    /// Resolve a fix type into its default corrective plan
    FixPlan {
        /// Task type (kerning, alignment, hierarchy, consistency, readability)
        #[arg(short, long)]
        task_type: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load rule sets
    let registry = match RuleSetRegistry::load_from_dir(&cli.rulesets_dir) {
        Ok(r) => r,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load rule sets: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = TypographyPipeline::new(registry);

    match cli.command {
        Commands::Rulesets => {
            let rule_sets: Vec<_> = pipeline
                .list_rule_sets()
                .iter()
                .map(|rs| {
                    serde_json::json!({
                        "id": rs.id,
                        "name": rs.name,
                        "version": rs.ruleset_version,
                        "rules": rs.rules.len(),
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&rule_sets).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Analyze { payload } => {
            let elements: Vec<TextElement> = match serde_json::from_str(&payload) {
                Ok(e) => e,
                Err(e) => return payload_error(e),
            };

            let results = pipeline.analyze(&elements);
            println!("{}", serde_json::to_string_pretty(&results).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Recommend { payload } => {
            let results: Vec<AnalysisResult> = match serde_json::from_str(&payload) {
                Ok(r) => r,
                Err(e) => return payload_error(e),
            };

            let recommendations = pipeline.recommend(&results);
            println!("{}", serde_json::to_string_pretty(&recommendations).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Report { payload } => {
            let elements: Vec<TextElement> = match serde_json::from_str(&payload) {
                Ok(e) => e,
                Err(e) => return payload_error(e),
            };

            match pipeline.build_report(&elements) {
                Ok(report) => {
                    println!("{}", serde_json::to_string_pretty(&report).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => operation_error(e),
            }
        }

        Commands::Format { ruleset, payload } => {
            let elements: Vec<TextElement> = match serde_json::from_str(&payload) {
                Ok(e) => e,
                Err(e) => return payload_error(e),
            };

            // The panel applies the result itself; the bridge works over an
            // in-memory snapshot and returns the resulting elements.
            let mut host = SnapshotHost::new(elements.clone());
            match pipeline.apply_rule_set(&mut host, &elements, &ruleset) {
                Ok(job) => {
                    let output = serde_json::json!({
                        "success": true,
                        "job": job,
                        "elements": host.into_elements(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => operation_error(e),
            }
        }

        Commands::Rescale {
            payload,
            base_size,
            scale_ratio,
        } => {
            let elements: Vec<TextElement> = match serde_json::from_str(&payload) {
                Ok(e) => e,
                Err(e) => return payload_error(e),
            };

            let mut host = SnapshotHost::new(elements.clone());
            let changes = pipeline.rescale_hierarchy(&mut host, &elements, base_size, scale_ratio);
            let output = serde_json::json!({
                "success": true,
                "changes": changes,
                "elements": host.into_elements(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
            ExitCode::SUCCESS
        }

        Commands::Kern { text, payload } => {
            let pairs: Vec<KerningPair> = match serde_json::from_str(&payload) {
                Ok(p) => p,
                Err(e) => return payload_error(e),
            };

            let edits = plan_pair_kerning(&text, &pairs);
            println!("{}", serde_json::to_string_pretty(&edits).unwrap());
            ExitCode::SUCCESS
        }

        Commands::FixPlan { task_type } => match pipeline.fix_plan(&task_type) {
            Ok(plan) => {
                println!("{}", serde_json::to_string_pretty(&plan).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => operation_error(e),
        },
    }
}

fn payload_error(e: serde_json::Error) -> ExitCode {
    println!(r#"{{"success": false, "error": "Invalid payload: {}"}}"#, e);
    ExitCode::FAILURE
}

fn operation_error(e: typecraft_core::EngineError) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": e.to_string(),
    });
    println!("{}", serde_json::to_string(&output).unwrap());
    ExitCode::from(2) // Operation failure
}
