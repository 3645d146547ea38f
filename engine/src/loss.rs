/// Mean squared error, the loss whose derivative the backward kernel seeds the output layer
/// with (up to the constant factor).
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns the mean of `(y_pred - y)^2`, `0` for empty slices.
    pub fn loss(&self, y_pred: &[f32], y: &[f32]) -> f32 {
        if y_pred.is_empty() {
            return 0.;
        }

        let sum: f32 = y_pred.iter().zip(y).map(|(a, b)| (a - b).powi(2)).sum();
        sum / y_pred.len() as f32
    }

    /// Returns the mean over every pass and every output.
    ///
    /// # Arguments
    /// * `batch` - The `(prediction, expected)` pairs of each pass.
    pub fn batch_loss<'a, I>(&self, batch: I) -> f32
    where
        I: IntoIterator<Item = (&'a [f32], &'a [f32])>,
    {
        let (sum, count) = batch.into_iter().fold((0., 0), |(sum, count), (y_pred, y)| {
            (sum + self.loss(y_pred, y) * y_pred.len() as f32, count + y_pred.len())
        });

        if count == 0 { 0. } else { sum / count as f32 }
    }
}
