use crate::tensor::numeric::*;
use crate::tensor::Tensor;

/// `c[i][j] = sum_k a[i][k] * b[k][j]`
pub fn matmul<T: Numeric>(left: &Tensor<T>, right: &Tensor<T>) -> Vec<T> {
    let (rows, inner, cols) = (left.rows(), left.cols(), right.cols());
    let (a, b) = (left.values(), right.values());
    let mut array = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let mut val = T::zero();
            for k in 0..inner {
                val += a[i * inner + k] * b[k * cols + j];
            }
            array.push(val);
        }
    }
    array
}

/// Returns `(dA, dB)` with `dA = dC * B^t` and `dB = A^t * dC`.
pub fn matmul_backward<T: Numeric>(
    left: &Tensor<T>,
    right: &Tensor<T>,
    output: &Tensor<T>,
) -> (Vec<T>, Vec<T>) {
    let (rows, inner, cols) = (left.rows(), left.cols(), right.cols());
    let (a, b, grad) = (left.values(), right.values(), output.grads());
    let mut d_left = vec![T::zero(); rows * inner];
    let mut d_right = vec![T::zero(); inner * cols];
    for i in 0..rows {
        for j in 0..cols {
            let g = grad[i * cols + j];
            for k in 0..inner {
                d_left[i * inner + k] += g * b[k * cols + j];
                d_right[k * cols + j] += a[i * inner + k] * g;
            }
        }
    }
    (d_left, d_right)
}

pub fn transpose<T: Numeric>(input: &Tensor<T>) -> Vec<T> {
    let (rows, cols) = (input.rows(), input.cols());
    let values = input.values();
    let mut array = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for i in 0..rows {
            array.push(values[i * cols + j]);
        }
    }
    array
}

/// The gradient of a transpose is the transpose of the gradient.
pub fn transpose_backward<T: Numeric>(output: &Tensor<T>) -> Vec<T> {
    let (rows, cols) = (output.rows(), output.cols());
    let grads = output.grads();
    let mut array = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for i in 0..rows {
            array.push(grads[i * cols + j]);
        }
    }
    array
}

pub fn add<T: Numeric>(left: &Tensor<T>, right: &Tensor<T>, output: &Tensor<T>) -> Vec<T> {
    let (a, b) = (left.values(), right.values());
    let mut array = Vec::with_capacity(output.capacity());
    for i in 0..output.rows() {
        for j in 0..output.cols() {
            array.push(
                a[left.shape().broadcast_index(i, j)] + b[right.shape().broadcast_index(i, j)],
            );
        }
    }
    array
}

/// The gradient passes through unchanged; a broadcast operand sums it over
/// the axes it was stretched along.
pub fn add_backward<T: Numeric>(
    left: &Tensor<T>,
    right: &Tensor<T>,
    output: &Tensor<T>,
) -> (Vec<T>, Vec<T>) {
    let mut d_left = vec![T::zero(); left.capacity()];
    let mut d_right = vec![T::zero(); right.capacity()];
    let grads = output.grads();
    for i in 0..output.rows() {
        for j in 0..output.cols() {
            let g = grads[i * output.cols() + j];
            d_left[left.shape().broadcast_index(i, j)] += g;
            d_right[right.shape().broadcast_index(i, j)] += g;
        }
    }
    (d_left, d_right)
}
