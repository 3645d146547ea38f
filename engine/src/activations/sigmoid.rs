#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn f(&self, z: f32) -> f32 {
        1. / (1. + (-z).exp())
    }

    /// `s(z) * (1 - s(z))`.
    pub fn df(&self, z: f32) -> f32 {
        let s = self.f(z);
        s * (1. - s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint() {
        assert_eq!(Sigmoid.f(0.), 0.5);
        assert_eq!(Sigmoid.df(0.), 0.25);
    }

    #[test]
    fn saturates() {
        assert!(Sigmoid.f(40.) > 0.999);
        assert!(Sigmoid.f(-40.) < 1e-6);
        assert!(Sigmoid.df(40.) < 1e-6);
    }
}
