use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::extract::{Extractor, Strictness};
use crate::gate::DEFAULT_THRESHOLD;

/// Which fields each output record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Roles, assignee, and normalized deadline included.
    #[default]
    Full,
    /// Only meeting, speaker, action item, and raw deadline.
    Reduced,
}

impl OutputShape {
    pub fn as_str(&self) -> &str {
        match self {
            OutputShape::Full => "full",
            OutputShape::Reduced => "reduced",
        }
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(OutputShape::Full),
            "reduced" => Ok(OutputShape::Reduced),
            other => Err(format!("Unknown output shape: {other}. Use: full, reduced")),
        }
    }
}

/// Everything a pipeline run needs. Built from defaults, then
/// ~/.meetact/config.toml, then CLI flags.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub roles_filename: String,
    pub output_path: PathBuf,
    pub model_path: Option<PathBuf>,
    pub strictness: Strictness,
    pub output_shape: OutputShape,
    pub threshold: f64,
    /// Reference date for deadline normalization; today when unset.
    pub reference_date: Option<NaiveDate>,
    /// Overrides the strictness policy's minimum task word count.
    pub min_task_words: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_dir: PathBuf::from("data/raw"),
            roles_filename: "roles.csv".to_string(),
            output_path: PathBuf::from("data/processed/actions.json"),
            model_path: None,
            strictness: Strictness::Lenient,
            output_shape: OutputShape::Full,
            threshold: DEFAULT_THRESHOLD,
            reference_date: None,
            min_task_words: None,
        }
    }
}

impl PipelineConfig {
    /// Load config from ~/.meetact/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(PipelineConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    /// Role table location: `roles_filename` inside the input directory.
    pub fn roles_path(&self) -> PathBuf {
        self.input_dir.join(&self.roles_filename)
    }

    /// Extractor configured with this run's strictness policy.
    pub fn extractor(&self) -> Extractor {
        let ex = Extractor::new(self.strictness);
        match self.min_task_words {
            Some(n) => ex.with_min_words(n),
            None => ex,
        }
    }

    /// Human-readable view of the effective configuration.
    pub fn display(&self) -> String {
        let mut lines = vec![
            format!("input_dir      = \"{}\"", self.input_dir.display()),
            format!("roles_filename = \"{}\"", self.roles_filename),
            format!("output_path    = \"{}\"", self.output_path.display()),
        ];
        match &self.model_path {
            Some(p) => lines.push(format!("model_path     = \"{}\"", p.display())),
            None => lines.push("model_path     = (none, rules only)".to_string()),
        }
        lines.push(format!("strictness     = \"{}\"", self.strictness));
        lines.push(format!("output_shape   = \"{}\"", self.output_shape));
        lines.push(format!("threshold      = {:.2}", self.threshold));
        match self.reference_date {
            Some(d) => lines.push(format!("reference_date = {d}")),
            None => lines.push("reference_date = (today)".to_string()),
        }
        if let Some(n) = self.min_task_words {
            lines.push(format!("min_task_words = {n}"));
        }
        lines.join("\n")
    }
}

/// Path to the config file: ~/.meetact/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".meetact").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.meetact/config.toml
# Precedence: CLI flag > env var > this file > built-in default

# input_dir = "data/raw"
# roles_filename = "roles.csv"
# output_path = "data/processed/actions.json"
# model_path = "data/processed/clf.json"

# lenient | strict
# strictness = "lenient"

# full | reduced
# output_shape = "full"

# threshold = 0.40
# reference_date = "2024-01-01"
# min_task_words = 4
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}
