const SLOPE: f32 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeakyRelu;

impl LeakyRelu {
    pub fn f(&self, z: f32) -> f32 {
        (SLOPE * z).max(z)
    }

    pub fn df(&self, z: f32) -> f32 {
        if z > 0. { 1. } else { SLOPE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaks_negatives() {
        assert_eq!(LeakyRelu.f(2.), 2.);
        assert!((LeakyRelu.f(-2.) + 0.2).abs() < 1e-7);
    }

    #[test]
    fn derivative_matches_slope() {
        assert_eq!(LeakyRelu.df(3.), 1.);
        assert_eq!(LeakyRelu.df(-3.), SLOPE);
    }
}
