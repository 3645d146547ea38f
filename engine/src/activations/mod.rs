mod act_fn;
mod leaky_relu;
mod normalized_tanh;
mod relu;
mod sigmoid;

pub use act_fn::ActFn;
pub use leaky_relu::LeakyRelu;
pub use normalized_tanh::NormalizedTanh;
pub use relu::Relu;
pub use sigmoid::Sigmoid;
