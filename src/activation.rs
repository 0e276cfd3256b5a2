//! Sigmoid activation used by both layers of the network.

/// Logistic function `1 / (1 + e^-x)`.
///
/// Branches on the sign of `x` so `exp` is only ever called with a non-positive
/// argument and can not overflow.
pub fn sigmoid(x : f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the sigmoid expressed through its output.
///
/// `y` must already be `sigmoid(x)`, not the raw weighted sum.
pub fn sigmoid_derivative(y : f64) -> f64 {
    y * (1.0 - y)
}
