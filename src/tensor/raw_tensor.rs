use std::fmt;
use std::ops::Index;

use rand::distributions::Distribution;
use rand::Rng;

use super::numeric::*;
use super::types::Shape;
use crate::error::{OrthoError, Result};

/// The core `struct` in this library: a dense row-major matrix holding both
/// its values and the gradient accumulated into it by the last backward pass.
///
/// A freshly allocated tensor reserves `rows * cols` values but holds none;
/// callers populate it with [`Tensor::set`] or [`Tensor::push`]. The gradient
/// buffer always holds `rows * cols` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T = f32>
where
    T: Numeric,
{
    pub(in crate::tensor) shape: Shape,
    pub(in crate::tensor) values: Vec<T>,
    pub(in crate::tensor) grads: Vec<T>,
}

impl<T> Tensor<T>
where
    T: Numeric,
{
    pub fn new(rows: usize, cols: usize) -> Tensor<T> {
        let shape = Shape::new(rows, cols);
        Tensor {
            shape,
            values: Vec::with_capacity(shape.count()),
            grads: vec![T::zero(); shape.count()],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, values: Vec<T>) -> Result<Tensor<T>> {
        let mut tensor = Tensor::new(rows, cols);
        if values.len() != tensor.capacity() {
            return Err(OrthoError::LengthMismatch {
                shape: tensor.shape,
                expected: tensor.capacity(),
                actual: values.len(),
            });
        }
        tensor.values = values;
        Ok(tensor)
    }

    pub fn filled(rows: usize, cols: usize, filler: T) -> Tensor<T> {
        let mut tensor = Tensor::new(rows, cols);
        tensor.values.resize(tensor.capacity(), filler);
        tensor
    }

    /// 1 on the diagonal, 0 elsewhere.
    pub fn identity(rows: usize, cols: usize) -> Tensor<T> {
        let mut tensor = Tensor::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                tensor
                    .values
                    .push(if row == col { T::one() } else { T::zero() });
            }
        }
        tensor
    }

    pub fn random<R, D>(rows: usize, cols: usize, rng: &mut R, distribution: &D) -> Tensor<T>
    where
        R: Rng + ?Sized,
        D: Distribution<T>,
    {
        let mut tensor = Tensor::new(rows, cols);
        let capacity = tensor.capacity();
        tensor
            .values
            .extend(distribution.sample_iter(rng).take(capacity));
        tensor
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn capacity(&self) -> usize {
        self.shape.count()
    }

    pub fn is_populated(&self) -> bool {
        self.values.len() == self.capacity()
    }

    /// Appends one value, failing once the tensor is full.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.is_populated() {
            return Err(OrthoError::CapacityExceeded { shape: self.shape });
        }
        self.values.push(value);
        Ok(())
    }

    /// Overwrites the value buffer in place.
    pub fn set(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.capacity() {
            return Err(OrthoError::LengthMismatch {
                shape: self.shape,
                expected: self.capacity(),
                actual: values.len(),
            });
        }
        self.values.clear();
        self.values.extend_from_slice(values);
        Ok(())
    }

    /// Clears the gradient buffer.
    pub fn zero(&mut self) {
        self.grads.iter_mut().for_each(|g| *g = T::zero());
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn grads(&self) -> &[T] {
        &self.grads
    }

    pub fn grads_mut(&mut self) -> &mut [T] {
        &mut self.grads
    }

    /// Splits the tensor into its writable values and its current gradient.
    pub fn values_and_grads_mut(&mut self) -> (&mut [T], &[T]) {
        (&mut self.values, &self.grads)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.values.get(row * self.cols() + col)
    }

    pub fn grad(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.grads.get(row * self.cols() + col)
    }

    /// The single value of a 1x1 tensor.
    pub fn elem(&self) -> Option<T> {
        if !self.shape.is_scalar() {
            return None;
        }
        self.values.first().copied()
    }

    /// Replaces the value buffer with the result of a forward kernel.
    pub(in crate::tensor) fn store(&mut self, values: Vec<T>) {
        debug_assert_eq!(values.len(), self.capacity());
        self.values = values;
    }

    pub(in crate::tensor) fn accumulate(&mut self, contribution: &[T]) {
        debug_assert_eq!(contribution.len(), self.grads.len());
        for (g, &c) in self.grads.iter_mut().zip(contribution) {
            *g += c;
        }
    }
}

impl<T> Index<(usize, usize)> for Tensor<T>
where
    T: Numeric,
{
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.values[row * self.cols() + col]
    }
}

impl<T> fmt::Display for Tensor<T>
where
    T: Numeric,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cols() == 0 {
            return write!(f, "[]");
        }
        for (i, row) in self.values.chunks(self.cols()).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v:.6}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty_with_zero_grads() {
        let tensor: Tensor = Tensor::new(2, 3);
        assert!(!tensor.is_populated());
        assert!(tensor.values().is_empty());
        assert_eq!(tensor.grads(), &[0.0; 6]);
    }

    #[test]
    fn test_push_up_to_capacity() {
        let mut tensor: Tensor = Tensor::new(1, 2);
        tensor.push(1.0).unwrap();
        tensor.push(2.0).unwrap();
        assert!(tensor.is_populated());
        assert!(matches!(
            tensor.push(3.0),
            Err(OrthoError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_set_requires_full_length() {
        let mut tensor: Tensor = Tensor::new(2, 2);
        assert!(matches!(
            tensor.set(&[1.0, 2.0]),
            Err(OrthoError::LengthMismatch {
                expected: 4,
                actual: 2,
                ..
            })
        ));
        tensor.set(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        tensor.set(&[5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(tensor.values(), &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(tensor[(1, 0)], 7.0);
    }

    #[test]
    fn test_zero_keeps_capacity() {
        let mut tensor: Tensor = Tensor::filled(2, 2, 1.0);
        tensor.grads_mut().copy_from_slice(&[1.0, -1.0, 2.0, 0.5]);
        tensor.zero();
        assert_eq!(tensor.grads(), &[0.0; 4]);
        assert_eq!(tensor.values(), &[1.0; 4]);
    }

    #[test]
    fn test_identity() {
        let identity: Tensor = Tensor::identity(3, 3);
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(identity.get(row, col), Some(&expected));
            }
        }
        assert_eq!(identity.get(3, 0), None);
    }

    #[test]
    fn test_random_fills_capacity() {
        use rand::SeedableRng;
        use rand_distr::Uniform;

        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let tensor: Tensor = Tensor::random(3, 2, &mut rng, &Uniform::new(-1.0, 1.0));
        assert!(tensor.is_populated());
        assert!(tensor.values().iter().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn test_display() {
        let tensor = Tensor::from_vec(2, 2, vec![1.0f32, 0.0, 0.0, 1.0]).unwrap();
        format!("Matrix: \n{}", tensor);
        assert_eq!(
            tensor.to_string(),
            "[1.000000, 0.000000]\n[0.000000, 1.000000]"
        );
    }
}
