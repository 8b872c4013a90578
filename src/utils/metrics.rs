use crate::error::{RecError, Result};
use crate::utils::{mean_absolute_difference, mean_squared_difference};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Agreement between predicted and actual ratings over one batch.
///
/// A metric that is undefined for the batch is `None` rather than an error,
/// so one degenerate statistic never hides the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub correlation: Option<f64>,
    pub mean_absolute_error: Option<f64>,
    pub root_mean_squared_error: Option<f64>,
}

impl AccuracyMetrics {
    /// Fails only when the two sides differ in length or hold non-finite values.
    pub fn compute(predicted: &[f64], actual: &[f64]) -> Result<Self> {
        check_lengths(predicted, actual, 0)?;

        let correlation = match pearson_correlation(predicted, actual) {
            Ok(r) => Some(r),
            Err(err @ (RecError::InsufficientData { .. } | RecError::ZeroVariance { .. })) => {
                warn!("Correlation is undefined for this batch: {}", err);
                None
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            correlation,
            mean_absolute_error: mean_absolute_error(predicted, actual).ok(),
            root_mean_squared_error: root_mean_squared_error(predicted, actual).ok(),
        })
    }
}

fn check_lengths(predicted: &[f64], actual: &[f64], min_len: usize) -> Result<()> {
    if predicted.len() != actual.len() {
        return Err(RecError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }

    if predicted.len() < min_len {
        return Err(RecError::InsufficientData { len: predicted.len() });
    }

    Ok(())
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Deviations from the mean, scaled into [-1, 1].
///
/// The raw values are divided by their largest magnitude before the mean is
/// taken and the deviations by theirs afterwards, so neither the mean nor the
/// later dot products can overflow or underflow. Pearson r is invariant under
/// both scalings.
fn normalized_deviations(values: &[f64], which: &'static str) -> Result<DVector<f64>> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(RecError::NonFiniteValue { which });
    }
    if is_constant(values) {
        return Err(RecError::ZeroVariance { which });
    }

    let raw = DVector::from_column_slice(values);
    let scaled = &raw / raw.amax();
    let centered = scaled.add_scalar(-scaled.mean());

    let spread = centered.amax();
    if spread == 0.0 {
        return Err(RecError::ZeroVariance { which });
    }

    Ok(centered / spread)
}

/// Pearson product-moment correlation coefficient of two equal-length
/// sequences.
///
/// Fails with [`RecError::ZeroVariance`] when either side is constant, since
/// the coefficient divides by both standard deviations, and with
/// [`RecError::NonFiniteValue`] on NaN or infinite input. Any finite
/// magnitude is handled. The result is symmetric in its arguments and
/// `pearson_correlation(x, x)` is exactly 1.0.
pub fn pearson_correlation(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual, 2)?;

    let x = normalized_deviations(predicted, "predicted")?;
    let y = normalized_deviations(actual, "actual")?;

    let covariance = x.dot(&y);
    let scale = (x.dot(&x) * y.dot(&y)).sqrt();

    Ok((covariance / scale).clamp(-1.0, 1.0))
}

pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual, 1)?;
    mean_absolute_difference(predicted.iter().copied().zip(actual.iter().copied()))
        .ok_or(RecError::InsufficientData { len: 0 })
}

pub fn root_mean_squared_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual, 1)?;
    mean_squared_difference(predicted.iter().copied().zip(actual.iter().copied()))
        .map(f64::sqrt)
        .ok_or(RecError::InsufficientData { len: 0 })
}
