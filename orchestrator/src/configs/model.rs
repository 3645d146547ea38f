use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnConfig {
    Sigmoid,
    Relu,
    LeakyRelu,
    NormalizedTanh,
}

/// How the parameter block of a layer gets initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamGenConfig {
    /// Every float set to `value`, biases set to `bias` when given.
    Const {
        value: f32,
        #[serde(default)]
        bias: Option<f32>,
    },
    Uniform { low: f32, high: f32 },
    UniformInclusive { low: f32, high: f32 },
    #[default]
    XavierUniform,
    LecunUniform,
    Normal { mean: f32, std_dev: f32 },
    Kaiming,
    Xavier,
    Lecun,
}

/// A fully connected, parameter-owning layer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LayerConfig {
    pub size: usize,
    pub act_fn: ActFnConfig,
    #[serde(default)]
    pub init: ParamGenConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    pub input_size: usize,
    pub layers: Vec<LayerConfig>,
    /// Explicit initial parameters, replacing every layer's `init`.
    #[serde(default)]
    pub params: Option<Vec<f32>>,
}
