use std::path::PathBuf;

/// Environment variable naming the project snapshot file.
pub const SNAPSHOT_VAR: &str = "REPORT_COUNTS_SNAPSHOT";

/// Environment variable holding an optional `<dragged>:<target>` reorder.
pub const REORDER_VAR: &str = "REORDER";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{REORDER_VAR} must look like `<dragged_id>:<target_id>`, got '{0}'")]
    InvalidReorder(String),
}

/// One drag session to replay: drag `dragged_id` onto `target_id` and drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub dragged_id: String,
    pub target_id: String,
}

impl ReorderRequest {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidReorder(raw.to_string());
        let (dragged, target) = raw.split_once(':').ok_or_else(invalid)?;
        let (dragged, target) = (dragged.trim(), target.trim());
        if dragged.is_empty() || target.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            dragged_id: dragged.to_string(),
            target_id: target.to_string(),
        })
    }
}

/// Command-line tool configuration loaded from environment variables.
///
/// | Env Var                  | Required | Default |
/// |--------------------------|----------|---------|
/// | `REPORT_COUNTS_SNAPSHOT` | yes      | --      |
/// | `REORDER`                | no       | --      |
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub snapshot_path: PathBuf,
    pub reorder: Option<ReorderRequest>,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Blank values count as unset.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let snapshot_path = get(SNAPSHOT_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(SNAPSHOT_VAR))?;

        let reorder = get(REORDER_VAR)
            .map(|raw| ReorderRequest::parse(&raw))
            .transpose()?;

        Ok(Self {
            snapshot_path,
            reorder,
        })
    }
}
