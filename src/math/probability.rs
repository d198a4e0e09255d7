/// Error function approximation using Abramowitz and Stegun method
///
/// Absolute error stays below 1.5e-7, which is well inside the resolution
/// needed for reporting significance of autocorrelation z-scores.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254_829_592_f64;
    let a2 = -0.284_496_736_f64;
    let a3 = 1.421_413_741_f64;
    let a4 = -1.453_152_027_f64;
    let a5 = 1.061_405_429_f64;
    let p = 0.327_591_1_f64;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / p.mul_add(x, 1.0);
    let y = (((((a5.mul_add(t, a4)).mul_add(t, a3)).mul_add(t, a2)).mul_add(t, a1)) * t)
        .mul_add(-(-x * x).exp(), 1.0);

    sign * y
}

/// Cumulative distribution function of the standard normal distribution
pub fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Two-tailed p-value of a standard normal z-score
///
/// Clamped to [0, 1] to absorb the approximation error of [`erf`].
pub fn two_tailed_p_value(z: f64) -> f64 {
    (2.0 * (1.0 - standard_normal_cdf(z.abs()))).clamp(0.0, 1.0)
}
