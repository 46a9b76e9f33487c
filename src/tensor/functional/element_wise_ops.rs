use crate::tensor::numeric::*;
use crate::tensor::Tensor;

#[inline]
fn logistic<T: Numeric>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

pub fn sigmoid<T: Numeric>(input: &Tensor<T>) -> Vec<T> {
    input.values().iter().map(|&x| logistic(x)).collect()
}

/// `dA += dC * y * (1 - y)`, using the cached forward output `y`.
pub fn sigmoid_backward<T: Numeric>(output: &Tensor<T>) -> Vec<T> {
    output
        .values()
        .iter()
        .zip(output.grads())
        .map(|(&y, &g)| g * y * (T::one() - y))
        .collect()
}

/// Element `(r, c)` feeds output rows `2r` (its negative part) and `2r + 1`
/// (its positive part) in column `c`.
pub fn everett<T: Numeric>(input: &Tensor<T>) -> Vec<T> {
    let cols = input.cols();
    let mut array = vec![T::zero(); 2 * input.capacity()];
    for (i, &x) in input.values().iter().enumerate() {
        let (row, col) = (i / cols, i % cols);
        array[2 * row * cols + col] = x.min(T::zero());
        array[(2 * row + 1) * cols + col] = x.max(T::zero());
    }
    array
}

/// Each output half routes its gradient back only where it is non-zero, so a
/// zero input receives nothing from either half.
pub fn everett_backward<T: Numeric>(input: &Tensor<T>, output: &Tensor<T>) -> Vec<T> {
    let cols = input.cols();
    let (values, grads) = (output.values(), output.grads());
    let mut array = vec![T::zero(); input.capacity()];
    for (i, slot) in array.iter_mut().enumerate() {
        let (row, col) = (i / cols, i % cols);
        for half in [2 * row * cols + col, (2 * row + 1) * cols + col] {
            if values[half] != T::zero() {
                *slot += grads[half];
            }
        }
    }
    array
}

pub fn quadratic<T: Numeric>(left: &Tensor<T>, right: &Tensor<T>) -> Vec<T> {
    left.values()
        .iter()
        .zip(right.values())
        .map(|(&a, &b)| (a - b) * (a - b))
        .collect()
}

/// Returns `(dA, dB)` with `dA = 2(a - b) dC` and `dB = -dA`.
pub fn quadratic_backward<T: Numeric>(
    left: &Tensor<T>,
    right: &Tensor<T>,
    output: &Tensor<T>,
) -> (Vec<T>, Vec<T>) {
    let two = T::one() + T::one();
    let d_left: Vec<T> = left
        .values()
        .iter()
        .zip(right.values())
        .zip(output.grads())
        .map(|((&a, &b), &g)| two * (a - b) * g)
        .collect();
    let d_right = d_left.iter().map(|&d| -d).collect();
    (d_left, d_right)
}
