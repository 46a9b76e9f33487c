//! The reference dataset: two binary inputs and their XOR.
use crate::error::Result;
use crate::tensor::{Numeric, Tensor};

pub const XOR: [[f32; 3]; 4] = [[0., 0., 0.], [1., 0., 1.], [0., 1., 1.], [1., 1., 0.]];

/// An `(input, target)` pair fed to the per-example loop.
pub type Example<T> = (Vec<T>, Vec<T>);

fn lift<T: Numeric>(values: &[f32]) -> Vec<T> {
    values.iter().map(|&v| T::lit(v as f64)).collect()
}

/// Splits every row into its two inputs and its label.
pub fn xor_examples<T: Numeric>() -> Vec<Example<T>> {
    XOR.iter()
        .map(|row| (lift(&row[..2]), lift(&row[2..])))
        .collect()
}

/// Stacks the rows as columns: the input is `3 x 4`, and the target is `6 x 4`
/// with every column holding its row twice over.
pub fn autoencoder_batch<T: Numeric>() -> Result<(Tensor<T>, Tensor<T>)> {
    let (width, count) = (XOR[0].len(), XOR.len());
    let mut input = Tensor::new(width, count);
    let mut target = Tensor::new(2 * width, count);
    for feature in 0..width {
        for row in XOR.iter() {
            input.push(T::lit(row[feature] as f64))?;
        }
    }
    for feature in 0..2 * width {
        for row in XOR.iter() {
            target.push(T::lit(row[feature % width] as f64))?;
        }
    }
    Ok((input, target))
}

#[test]
fn test_xor_examples() {
    let examples = xor_examples::<f32>();
    assert_eq!(examples.len(), 4);
    assert_eq!(examples[1], (vec![1.0, 0.0], vec![1.0]));
    assert_eq!(examples[3], (vec![1.0, 1.0], vec![0.0]));
}

#[test]
fn test_autoencoder_batch_stacks_columns() {
    let (input, target) = autoencoder_batch::<f32>().unwrap();
    assert_eq!((input.rows(), input.cols()), (3, 4));
    assert_eq!((target.rows(), target.cols()), (6, 4));
    for (col, row) in XOR.iter().enumerate() {
        for feature in 0..3 {
            assert_eq!(input[(feature, col)], row[feature]);
            assert_eq!(target[(feature, col)], row[feature]);
            assert_eq!(target[(feature + 3, col)], row[feature]);
        }
    }
}
