use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_REPEATS: usize = 10;
const DEFAULT_LOG_JSONL: &str = "bench/out/{run_id}/log.jsonl";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root tournament configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TournamentConfig {
    pub run_id: String,
    /// Games played by every pair of agents.
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    /// Seed of the tournament RNG (seat order, per-game seeds).
    #[serde(default)]
    pub seed: Option<u64>,
    /// When set, every game is dealt from this seed.
    #[serde(default)]
    pub game_seed: Option<u64>,
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TournamentConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TournamentConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        if self.repeats == 0 {
            return Err(ValidationError::InvalidField {
                field: "repeats".to_string(),
                message: "repeats must be greater than zero".to_string(),
            });
        }
        self.engine.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_agents(&mut self.agents)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            summary_json: self
                .outputs
                .summary_json
                .as_deref()
                .map(|template| resolve_template(&self.run_id, template)),
            log_jsonl: resolve_template(&self.run_id, &self.outputs.log_jsonl),
        }
    }
}

fn default_repeats() -> usize {
    DEFAULT_REPEATS
}

/// Definition of a tournament participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Heuristic,
    Random,
    /// Run by the engine itself; params are forwarded untouched.
    Hosted,
}

/// External game engine process.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(command) = &self.command
            && command.trim().is_empty()
        {
            return Err(ValidationError::InvalidField {
                field: "engine.command".to_string(),
                message: "command must not be empty".to_string(),
            });
        }

        if self.timeout_ms == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "engine.timeout_ms".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default)]
    pub summary_json: Option<String>,
    #[serde(default = "default_log_jsonl")]
    pub log_jsonl: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            summary_json: None,
            log_jsonl: default_log_jsonl(),
        }
    }
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let mut entries = vec![("outputs.log_jsonl", self.log_jsonl.as_str())];
        if let Some(summary) = self.summary_json.as_deref() {
            entries.push(("outputs.summary_json", summary));
        }

        for (label, value) in entries {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn default_log_jsonl() -> String {
    DEFAULT_LOG_JSONL.to_string()
}

/// Logging configuration defaults to human-readable logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.len() < 2 {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: "at least two agents are required for a round robin".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        if agent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "agents.name".to_string(),
                message: "agent name must not be empty".to_string(),
            });
        }

        if !agent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].name", agent.name),
                message: "agent name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        if agent.params.is_null() {
            agent.params = serde_yaml::Value::Mapping(Default::default());
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub summary_json: Option<PathBuf>,
    pub log_jsonl: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "is_vs_rdeep"
seed: 42
game_seed: 45
agents:
  - name: "IS_project_bot"
    kind: "heuristic"
  - name: "RdeepBot"
    kind: "hosted"
    params:
      num_samples: 2
      depth: 2
engine:
  command: "python3"
  args: ["-m", "schnapsen_bridge"]
outputs:
  summary_json: "bench/out/{run_id}/summary.json"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: TournamentConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.repeats, DEFAULT_REPEATS);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.game_seed, Some(45));
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert!(cfg.agents[0].params.is_mapping());

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.summary_json,
            Some(PathBuf::from("bench/out/is_vs_rdeep/summary.json"))
        );
        assert_eq!(outputs.log_jsonl, PathBuf::from("bench/out/is_vs_rdeep/log.jsonl"));
    }

    #[test]
    fn rejects_single_agent() {
        let yaml = BASIC_YAML.replace(
            "  - name: \"RdeepBot\"\n    kind: \"hosted\"\n    params:\n      num_samples: 2\n      depth: 2\n",
            "",
        );
        let mut cfg: TournamentConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("one agent cannot play a round robin");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents"
        ));
    }

    #[test]
    fn rejects_duplicate_agents() {
        let yaml = BASIC_YAML.replace("RdeepBot", "IS_project_bot");
        let mut cfg: TournamentConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate agents should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "agents"
        ));
    }

    #[test]
    fn rejects_zero_repeats() {
        let yaml = BASIC_YAML.replace("seed: 42\n", "seed: 42\nrepeats: 0\n");
        let mut cfg: TournamentConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero repeats");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "repeats"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("is_vs_rdeep", "is vs rdeep");
        let mut cfg: TournamentConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_blank_engine_command() {
        let yaml = BASIC_YAML.replace("command: \"python3\"", "command: \"  \"");
        let mut cfg: TournamentConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("blank command");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "engine.command"
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TournamentConfig::from_path("does/not/exist.yaml").expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), Path::new("does/not/exist.yaml"));
    }
}
