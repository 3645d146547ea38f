mod cache;
mod gradients;
mod params;
mod shared;

pub use cache::ActivationCache;
pub use gradients::GradientBuffer;
pub use params::ParameterStore;
pub use shared::SharedBuf;
