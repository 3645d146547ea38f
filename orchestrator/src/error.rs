use std::{fmt, io};

use engine::KernelErr;

use crate::dataset::DatasetError;

/// All errors that can occur in the orchestrator.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before training starts.
    InvalidConfig(String),
    /// The engine rejected the topology, the parameters or a batch.
    Kernel(KernelErr),
    /// The dataset could not be loaded or doesn't have the expected shape.
    Dataset(DatasetError),
    /// The configuration file is not valid JSON, or the output could not be serialized.
    Json(serde_json::Error),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Kernel(e) => write!(f, "engine error: {e}"),
            Self::Dataset(e) => write!(f, "dataset error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Kernel(e) => Some(e),
            Self::Dataset(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<KernelErr> for OrchestratorError {
    fn from(e: KernelErr) -> Self {
        Self::Kernel(e)
    }
}

impl From<engine::ConfigErr> for OrchestratorError {
    fn from(e: engine::ConfigErr) -> Self {
        Self::Kernel(e.into())
    }
}

impl From<DatasetError> for OrchestratorError {
    fn from(e: DatasetError) -> Self {
        Self::Dataset(e)
    }
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<io::Error> for OrchestratorError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
