use crate::tensor::numeric::*;
use crate::tensor::Tensor;

pub fn sum<T: Numeric>(input: &Tensor<T>) -> Vec<T> {
    vec![input.values().iter().copied().sum()]
}

pub fn sum_backward<T: Numeric>(input: &Tensor<T>, output: &Tensor<T>) -> Vec<T> {
    vec![output.grads()[0]; input.capacity()]
}

pub fn avg<T: Numeric>(input: &Tensor<T>) -> Vec<T> {
    let total: T = input.values().iter().copied().sum();
    vec![total / count(input)]
}

pub fn avg_backward<T: Numeric>(input: &Tensor<T>, output: &Tensor<T>) -> Vec<T> {
    vec![output.grads()[0] / count(input); input.capacity()]
}

fn count<T: Numeric>(input: &Tensor<T>) -> T {
    T::lit(input.capacity() as f64)
}

#[test]
fn test_sum_and_avg() {
    let input = Tensor::from_vec(2, 2, vec![1.0, 2.0, 3.0, 6.0]).unwrap();
    assert_eq!(sum(&input), vec![12.0]);
    assert_eq!(avg(&input), vec![3.0]);

    let mut output = Tensor::from_vec(1, 1, vec![12.0]).unwrap();
    output.grads_mut()[0] = 2.0;
    assert_eq!(sum_backward(&input, &output), vec![2.0; 4]);
    assert_eq!(avg_backward(&input, &output), vec![0.5; 4]);
}
