/// `k!` as a float; exact up to `k = 22`, which is far beyond any grid bound.
pub fn factorial(k: u32) -> f64 {
    (2..=k).fold(1.0, |product, i| product * f64::from(i))
}

/// Probability of exactly `k` goals given a scoring rate `lambda`.
/// A non-positive rate puts all mass on zero goals.
#[inline]
pub fn probability(lambda: f64, k: u32) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    #[allow(clippy::cast_possible_wrap)]
    let exponent = k as i32;
    lambda.powi(exponent) * f64::exp(-lambda) / factorial(k)
}
