use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use meetact::config::{self, OutputShape, PipelineConfig};
use meetact::evaluate;
use meetact::extract::{Extractor, Strictness};
use meetact::models::LooseRecord;
use meetact::output::{json as json_out, table};
use meetact::pipeline::Pipeline;
use meetact::temporal::normalize_deadline;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meetact", version, about = "Meeting actions: extract tasks, assignees, and deadlines from transcripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

/// Overrides for values in ~/.meetact/config.toml.
#[derive(Args)]
struct PipelineArgs {
    /// Directory of transcripts (.txt, .json)
    #[arg(long, env = "MEETACT_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Role table file name inside the input directory
    #[arg(long)]
    roles: Option<String>,

    /// Output JSON file
    #[arg(long, short, env = "MEETACT_OUTPUT")]
    output: Option<PathBuf>,

    /// Linear classifier JSON; rules only when absent or unreadable
    #[arg(long, env = "MEETACT_MODEL")]
    model: Option<PathBuf>,

    /// Classifier decision threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Extraction policy: lenient, strict
    #[arg(long)]
    strictness: Option<Strictness>,

    /// Output shape: full, reduced
    #[arg(long)]
    shape: Option<OutputShape>,

    /// Reference date for relative deadlines (YYYY-MM-DD, default today)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Minimum words in an extracted task
    #[arg(long)]
    min_words: Option<usize>,
}

impl PipelineArgs {
    fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(v) = self.input_dir {
            config.input_dir = v;
        }
        if let Some(v) = self.roles {
            config.roles_filename = v;
        }
        if let Some(v) = self.output {
            config.output_path = v;
        }
        if let Some(v) = self.model {
            config.model_path = Some(v);
        }
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
        if let Some(v) = self.strictness {
            config.strictness = v;
        }
        if let Some(v) = self.shape {
            config.output_shape = v;
        }
        if let Some(v) = self.reference_date {
            config.reference_date = Some(v);
        }
        if let Some(v) = self.min_words {
            config.min_task_words = Some(v);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract action items from every transcript in the input directory
    Run {
        #[command(flatten)]
        args: PipelineArgs,

        /// Print records without writing the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show action items from an output file
    Show {
        /// Output file (default: configured output path)
        path: Option<PathBuf>,
    },

    /// Score predictions against a hand-labeled gold file
    Evaluate {
        /// Predictions file (default: configured output path)
        #[arg(long)]
        pred: Option<PathBuf>,

        /// Gold file (default: gold.json beside the predictions)
        #[arg(long)]
        gold: Option<PathBuf>,
    },

    /// Run the extractor on a single utterance
    Parse {
        /// Utterance text
        text: String,

        /// Extraction policy: lenient, strict
        #[arg(long, default_value = "lenient")]
        strictness: Strictness,

        /// Reference date for relative deadlines (YYYY-MM-DD, default today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
    },

    /// Show or initialize the config file
    Config {
        /// Write a commented template to ~/.meetact/config.toml
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    match cli.command {
        Commands::Run { args, dry_run } => {
            let config = args.apply(PipelineConfig::load()?);
            let pipeline = Pipeline::from_config(config);
            let report = pipeline.run()?;
            let config = pipeline.config();

            if json_output {
                println!("{}", json_out::render_records(&report.records, config.output_shape)?);
            } else if dry_run {
                let loose: Vec<LooseRecord> = report.records.iter().map(LooseRecord::from).collect();
                table::print_actions(&loose);
                println!();
            }

            if dry_run {
                if !json_output {
                    println!("[dry-run] Would write to {}", config.output_path.display());
                }
            } else {
                json_out::write_records(&config.output_path, &report.records, config.output_shape)?;
                if !json_output {
                    table::print_run_report(&report, pipeline.gate_name());
                    println!("Wrote {}", config.output_path.display());
                }
            }
        }

        Commands::Show { path } => {
            let path = match path {
                Some(p) => p,
                None => PipelineConfig::load()?.output_path,
            };
            let records = json_out::read_loose(&path)?;
            if json_output {
                json_out::print_json(&records)?;
            } else {
                table::print_actions(&records);
            }
        }

        Commands::Evaluate { pred, gold } => {
            let pred = match pred {
                Some(p) => p,
                None => PipelineConfig::load()?.output_path,
            };
            let gold = gold.unwrap_or_else(|| pred.with_file_name("gold.json"));

            match evaluate::evaluate_files(&pred, &gold)? {
                Some(e) if json_output => json_out::print_json(&e)?,
                Some(e) => table::print_evaluation(&e),
                None => {
                    println!("Missing predictions or gold file.");
                    println!("  Predictions: {}", pred.display());
                    println!("  Gold:        {}", gold.display());
                }
            }
        }

        Commands::Parse {
            text,
            strictness,
            reference_date,
        } => {
            let reference = reference_date
                .unwrap_or_else(|| Local::now().date_naive())
                .and_time(NaiveTime::MIN);
            let parsed = Extractor::new(strictness).extract(&text);
            let deadline_iso = parsed
                .as_ref()
                .and_then(|p| normalize_deadline(p.deadline_raw.as_deref(), reference));

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "text": text,
                    "strictness": strictness,
                    "action": parsed,
                    "deadline_iso": deadline_iso,
                }))?;
            } else {
                table::print_parsed(&text, parsed.as_ref(), deadline_iso.as_deref());
            }
        }

        Commands::Config { init } => {
            let path = config::config_path()?;
            if init {
                if config::init_config()? {
                    println!("Created {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            } else {
                let cfg = PipelineConfig::load()
                    .with_context(|| format!("Failed to load config: {}", path.display()))?;
                if json_output {
                    json_out::print_json(&cfg)?;
                } else {
                    println!("Config: {}\n", path.display());
                    println!("{}", cfg.display());
                }
            }
        }
    }

    Ok(())
}
