use super::{LeakyRelu, NormalizedTanh, Relu, Sigmoid};

/// The activation function of a non-input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Relu(Relu),
    LeakyRelu(LeakyRelu),
    NormalizedTanh(NormalizedTanh),
}

impl ActFn {
    pub fn sigmoid() -> Self {
        Self::Sigmoid(Sigmoid)
    }

    pub fn relu() -> Self {
        Self::Relu(Relu)
    }

    pub fn leaky_relu() -> Self {
        Self::LeakyRelu(LeakyRelu)
    }

    pub fn normalized_tanh() -> Self {
        Self::NormalizedTanh(NormalizedTanh)
    }

    /// Applies the function to a pre-activation value.
    pub fn f(&self, z: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.f(z),
            Self::Relu(a) => a.f(z),
            Self::LeakyRelu(a) => a.f(z),
            Self::NormalizedTanh(a) => a.f(z),
        }
    }

    /// The derivative of `f` evaluated at the pre-activation value `z`.
    pub fn df(&self, z: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.df(z),
            Self::Relu(a) => a.df(z),
            Self::LeakyRelu(a) => a.df(z),
            Self::NormalizedTanh(a) => a.df(z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn central_difference(act_fn: ActFn, z: f32) -> f32 {
        const H: f32 = 1e-2;
        (act_fn.f(z + H) - act_fn.f(z - H)) / (2. * H)
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let act_fns = [
            ActFn::sigmoid(),
            ActFn::relu(),
            ActFn::leaky_relu(),
            ActFn::normalized_tanh(),
        ];

        for act_fn in act_fns {
            for z in [-2.3, -0.7, 0.4, 1.9] {
                let expected = central_difference(act_fn, z);
                let got = act_fn.df(z);
                assert!(
                    (expected - got).abs() < 1e-3,
                    "{act_fn:?} at {z}: got {got}, expected {expected}"
                );
            }
        }
    }
}
