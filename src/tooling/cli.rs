//! CLI Tooling
//!
//! Each invocation rehydrates the tree from the sled store, runs one command against the
//! controller and prints the result. Every state change is persisted by the store, so
//! successive invocations continue where the previous one left off.

use crate::config::{ConfigLoader, LazytreeConfig};
use crate::controller::{ToggleOutcome, TreeController};
use crate::error::ApiError;
use crate::provider::{ChildProvider, MockChildProvider};
use crate::render::{self, format_rows, format_status_table};
use crate::store::{SledStateRepository, StateRepository, TreeStore};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Lazytree CLI - lazy-loading tree view over a persisted tree
#[derive(Parser)]
#[command(name = "lazytree")]
#[command(about = "Lazy-loading hierarchical tree view with persisted state")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tree state database directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags into a loaded configuration
    pub fn apply_overrides(&self, config: &mut LazytreeConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render the visible rows of the tree
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Expand or collapse a node, waiting for its children to load
    Toggle {
        /// Node id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Retry loading a node whose last fetch failed
    Retry {
        /// Node id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every node with its state
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Discard the tree and start from a single collapsed root
    Reset,
    /// Interactively toggle nodes
    Browse,
    /// Print the effective configuration as TOML
    Config,
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Show { .. } => "show",
        Commands::Toggle { .. } => "toggle",
        Commands::Retry { .. } => "retry",
        Commands::Status { .. } => "status",
        Commands::Reset => "reset",
        Commands::Browse => "browse",
        Commands::Config => "config",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn describe_outcome(id: &str, outcome: &ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::NoOp => format!("Nothing to do for {}", id),
        ToggleOutcome::Collapsed => format!("Collapsed {}", id),
        ToggleOutcome::Cancelled => format!("Cancelled loading of {}", id),
        ToggleOutcome::Expanded { children } => {
            format!("Expanded {} ({} children)", id, children)
        }
        ToggleOutcome::Empty => format!("{} is empty", id),
        ToggleOutcome::Failed { reason } => format!("Failed to load {}: {}", id, reason),
        ToggleOutcome::Discarded => format!("Result for {} arrived too late and was dropped", id),
    }
}

/// CLI context: a controller plus the configuration it was built from
pub struct CliContext {
    controller: Arc<TreeController>,
    config: LazytreeConfig,
    color: bool,
}

impl CliContext {
    /// Load configuration and open the sled store
    pub fn new(store_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::from_config(config, store_path)
    }

    /// Build from an already loaded configuration
    pub fn from_config(config: LazytreeConfig, store_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let path = config.storage.resolve_path(store_path)?;
        let repository = SledStateRepository::open(&path, config.storage.key.clone())?;
        info!(store = %path.display(), key = %repository.key(), "Opened tree store");
        let provider = Arc::new(MockChildProvider::new(config.provider.clone()));
        Ok(Self::with_parts(Arc::new(repository), provider, config))
    }

    /// Assemble from explicit collaborators
    pub fn with_parts(
        repository: Arc<dyn StateRepository>,
        provider: Arc<dyn ChildProvider>,
        config: LazytreeConfig,
    ) -> Self {
        let store = TreeStore::open(repository);
        let controller = Arc::new(TreeController::new(store, provider));
        let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self {
            controller,
            config,
            color,
        }
    }

    /// Force colored output on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn controller(&self) -> &TreeController {
        &self.controller
    }

    pub fn config(&self) -> &LazytreeConfig {
        &self.config
    }

    /// Run one command and return its printable output
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Show { format } => self.handle_show(parse_format(format)?),
            Commands::Toggle { id, format } => {
                let format = parse_format(format)?;
                let outcome = self.controller.toggle(id).await?;
                self.report_outcome(id, &outcome, format)
            }
            Commands::Retry { id, format } => {
                let format = parse_format(format)?;
                let outcome = self.controller.retry(id).await?;
                self.report_outcome(id, &outcome, format)
            }
            Commands::Status { format } => self.handle_status(parse_format(format)?),
            Commands::Reset => {
                self.controller.reset()?;
                Ok(format!("Tree reset\n\n{}", self.render_text()))
            }
            Commands::Browse => self.handle_browse().await,
            Commands::Config => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to serialize configuration: {}", e))
            }),
        }
    }

    fn render_text(&self) -> String {
        let (roots, expanded) = self.controller.view();
        format_rows(&render::render_rows(&roots, &expanded), self.color)
    }

    fn handle_show(&self, format: OutputFormat) -> Result<String, ApiError> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                let (roots, expanded) = self.controller.view();
                let rows = render::render_rows(&roots, &expanded);
                to_json(&json!({ "rows": rows, "expanded": expanded }))
            }
        }
    }

    fn handle_status(&self, format: OutputFormat) -> Result<String, ApiError> {
        let (roots, expanded) = self.controller.view();
        let entries = render::status_entries(&roots, &expanded);
        match format {
            OutputFormat::Text => Ok(format_status_table(&entries)),
            OutputFormat::Json => to_json(&json!({
                "total": entries.len(),
                "expanded": expanded,
                "nodes": entries,
            })),
        }
    }

    fn report_outcome(
        &self,
        id: &str,
        outcome: &ToggleOutcome,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        match format {
            OutputFormat::Text => Ok(format!(
                "{}\n\n{}",
                describe_outcome(id, outcome),
                self.render_text()
            )),
            OutputFormat::Json => {
                let (roots, expanded) = self.controller.view();
                let rows = render::render_rows(&roots, &expanded);
                to_json(&json!({
                    "id": id,
                    "result": outcome,
                    "rows": rows,
                    "expanded": expanded,
                }))
            }
        }
    }

    /// Select-and-toggle loop until the user quits
    async fn handle_browse(&self) -> Result<String, ApiError> {
        use dialoguer::Select;

        let mut toggles = 0usize;
        let mut cursor = 0usize;
        loop {
            let (roots, expanded) = self.controller.view();
            let rows = render::render_rows(&roots, &expanded);
            let mut items: Vec<String> = rows
                .iter()
                .map(|row| render::format::format_row(row, self.color))
                .collect();
            items.push("[quit]".to_string());

            let selection = Select::new()
                .with_prompt("Toggle node")
                .items(&items)
                .default(cursor.min(items.len() - 1))
                .interact_opt()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            let index = match selection {
                Some(index) if index < rows.len() => index,
                _ => break,
            };
            cursor = index;
            let id = rows[index].id.clone();
            let outcome = self.controller.toggle(&id).await?;
            if matches!(outcome, ToggleOutcome::Failed { .. }) {
                eprintln!("{}", describe_outcome(&id, &outcome));
            }
            toggles += 1;
        }
        Ok(format!("{} toggles applied\n\n{}", toggles, self.render_text()))
    }
}

fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize output: {}", e)))
}
