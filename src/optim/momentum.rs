//! Heavy-ball momentum with global gradient-norm clipping.
//!
//! Per element: `delta = alpha * delta - eta * grad * scale; value += delta`,
//! where `scale` is `1 / norm` when the norm of every parameter gradient
//! taken together exceeds 1, and 1 otherwise.
use itertools::{izip, Itertools};
use log::trace;

use crate::error::{OrthoError, Result};
use crate::tensor::{Graph, NodeId, Numeric};

#[derive(Debug, Clone, PartialEq)]
pub struct Momentum<T: Numeric> {
    alpha: T,
    eta: T,
    deltas: Vec<Vec<T>>,
}

impl<T: Numeric> Momentum<T> {
    /// `alpha` is the momentum coefficient and `eta` the learning rate.
    pub fn new(alpha: T, eta: T) -> Self {
        Momentum {
            alpha,
            eta,
            deltas: Vec::new(),
        }
    }

    pub fn alpha(&self) -> T {
        self.alpha
    }

    pub fn eta(&self) -> T {
        self.eta
    }

    /// The previous update of every parameter, in parameter order. Empty
    /// until the first step.
    pub fn deltas(&self) -> &[Vec<T>] {
        &self.deltas
    }

    /// `sqrt` of the sum of every squared gradient element across `params`.
    pub fn global_norm(graph: &Graph<T>, params: &[NodeId]) -> Result<T> {
        let mut norm = T::zero();
        for &p in params {
            for &d in graph.tensor(p)?.grads() {
                norm += d * d;
            }
        }
        Ok(norm.sqrt())
    }

    /// Applies one update from the gradients currently held by `params` and
    /// returns the unclipped gradient norm.
    pub fn step(&mut self, graph: &mut Graph<T>, params: &[NodeId]) -> Result<T> {
        if self.deltas.is_empty() {
            self.deltas = params
                .iter()
                .map(|&p| Ok(vec![T::zero(); graph.tensor(p)?.capacity()]))
                .collect::<Result<_>>()?;
        } else if self.deltas.len() != params.len() {
            return Err(OrthoError::ParameterMismatch {
                expected: self.deltas.len(),
                actual: params.len(),
            });
        }

        let norm = Self::global_norm(graph, params)?;
        let scaling = if norm > T::one() {
            trace!("clipping gradient norm {norm}");
            T::one() / norm
        } else {
            T::one()
        };

        let (alpha, eta) = (self.alpha, self.eta);
        for (deltas, &p) in self.deltas.iter_mut().zip_eq(params) {
            let (values, grads) = graph.tensor_mut(p)?.values_and_grads_mut();
            for (delta, value, &d) in izip!(deltas.iter_mut(), values.iter_mut(), grads) {
                *delta = alpha * *delta - eta * d * scaling;
                *value += *delta;
            }
        }
        Ok(norm)
    }
}
