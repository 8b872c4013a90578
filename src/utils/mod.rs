pub mod metrics;
pub mod validation;

/// Arithmetic mean, summed left to right. `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count = 0usize;

    for value in values {
        sum += value;
        count += 1;
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of `|a - b|` over the pairs. `None` for an empty input.
pub fn mean_absolute_difference<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    mean(pairs.into_iter().map(|(a, b)| (a - b).abs()))
}

/// Mean of `(a - b)^2` over the pairs. `None` for an empty input.
pub fn mean_squared_difference<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    mean(pairs.into_iter().map(|(a, b)| (a - b).powi(2)))
}
