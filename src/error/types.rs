use thiserror::Error;

/// Unified result type for the maplattice crate.
pub type Result<T> = std::result::Result<T, LatticeError>;

/// Errors surfaced by the lattice composition pipeline.
///
/// Configuration errors (`InvalidColumnCount`, `PanelIndexOutOfRange`,
/// `InvalidSyncSpec`, `DuplicatePanelId`) are reported synchronously before
/// any view output is produced. Partial-mount failures at bootstrap time are
/// not errors at all; they degrade per-command inside the bootstrap run.
#[derive(Debug, Error)]
pub enum LatticeError {
    #[error("column count must be a positive integer")]
    InvalidColumnCount,
    #[error("panel index {index} out of range for {panel_count} panels")]
    PanelIndexOutOfRange { index: usize, panel_count: usize },
    #[error("invalid sync specification: {0}")]
    InvalidSyncSpec(String),
    #[error("duplicate panel id `{0}`")]
    DuplicatePanelId(String),
    #[error("widget host error: {0}")]
    Host(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
