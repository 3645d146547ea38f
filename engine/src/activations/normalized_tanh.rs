/// `tanh` rescaled into `(0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizedTanh;

impl NormalizedTanh {
    pub fn f(&self, z: f32) -> f32 {
        (z.tanh() + 1.) / 2.
    }

    pub fn df(&self, z: f32) -> f32 {
        let t = z.tanh();
        (1. - t * t) / 2.
    }
}
