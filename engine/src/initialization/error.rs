use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type of the `RandParamGen` constructors.
pub type Result<T> = std::result::Result<T, RandErr>;

/// Error returned by the `RandParamGen` constructors, each distribution has its own
/// constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum RandErr {
    Distribution(String),
    NotAParamLayer { layer: usize },
}

impl From<NormalError> for RandErr {
    fn from(value: NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<UniformError> for RandErr {
    fn from(value: UniformError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl Display for RandErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandErr::Distribution(e) => f.write_str(e),
            RandErr::NotAParamLayer { layer } => {
                write!(f, "layer {layer} owns no parameters to initialize")
            }
        }
    }
}

impl Error for RandErr {}
