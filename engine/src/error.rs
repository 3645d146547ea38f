use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire engine.
pub type Result<T> = std::result::Result<T, KernelErr>;

/// Fatal errors in the network's static description, caught before any dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErr {
    TooFewLayers {
        got: usize,
    },
    TooManyLayers {
        got: usize,
        max: usize,
    },
    EmptyLayer {
        layer: usize,
    },
    LayerTooWide {
        layer: usize,
        got: usize,
        max: usize,
    },
    ActFnCountMismatch {
        got: usize,
        expected: usize,
    },
    ParamsLengthMismatch {
        got: usize,
        expected: usize,
    },
    InvalidLearningRate {
        got: f32,
    },
}

/// Fatal errors in the shape of a single batch, the batch is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchErr {
    Empty,
    TooLarge {
        got: usize,
        max: usize,
    },
    InputLengthMismatch {
        pass: usize,
        got: usize,
        expected: usize,
    },
    ExpectedLengthMismatch {
        pass: usize,
        got: usize,
        expected: usize,
    },
}

/// The engine's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelErr {
    Config(ConfigErr),
    Batch(BatchErr),
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::TooFewLayers { got } => {
                write!(f, "the topology needs at least 2 layers, got {got}")
            }
            ConfigErr::TooManyLayers { got, max } => {
                write!(f, "the topology has {got} layers but the engine supports at most {max}")
            }
            ConfigErr::EmptyLayer { layer } => write!(f, "layer {layer} has no neurons"),
            ConfigErr::LayerTooWide { layer, got, max } => write!(
                f,
                "layer {layer} has {got} neurons but the engine supports at most {max} per layer"
            ),
            ConfigErr::ActFnCountMismatch { got, expected } => write!(
                f,
                "expected one activation function per non-input layer ({expected}), got {got}"
            ),
            ConfigErr::ParamsLengthMismatch { got, expected } => write!(
                f,
                "the parameter buffer has {got} values but the topology needs {expected}"
            ),
            ConfigErr::InvalidLearningRate { got } => {
                write!(f, "the learning rate must be finite and not negative, got {got}")
            }
        }
    }
}

impl Display for BatchErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchErr::Empty => f.write_str("the batch has no samples"),
            BatchErr::TooLarge { got, max } => {
                write!(f, "the batch has {got} samples but at most {max} are supported")
            }
            BatchErr::InputLengthMismatch {
                pass,
                got,
                expected,
            } => write!(
                f,
                "input of pass {pass} has {got} values, the input layer has {expected} neurons"
            ),
            BatchErr::ExpectedLengthMismatch {
                pass,
                got,
                expected,
            } => write!(
                f,
                "expected output of pass {pass} has {got} values, the output layer has {expected} neurons"
            ),
        }
    }
}

impl Display for KernelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelErr::Config(e) => write!(f, "configuration error: {e}"),
            KernelErr::Batch(e) => write!(f, "batch error: {e}"),
        }
    }
}

impl Error for ConfigErr {}

impl Error for BatchErr {}

impl Error for KernelErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            KernelErr::Config(e) => Some(e),
            KernelErr::Batch(e) => Some(e),
        }
    }
}

impl From<ConfigErr> for KernelErr {
    fn from(value: ConfigErr) -> Self {
        Self::Config(value)
    }
}

impl From<BatchErr> for KernelErr {
    fn from(value: BatchErr) -> Self {
        Self::Batch(value)
    }
}
