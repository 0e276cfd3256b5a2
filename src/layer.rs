use std::ops::AddAssign;

use nalgebra::{DMatrix, DVector};
use rand::Rng;

#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};

use crate::activation::sigmoid;
use crate::config::Initialization;

/// A fully connected sigmoid layer.
///
/// `weights` has the shape (neurons, previous neurons), so feeding is a plain
/// matrix-vector product.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub struct Layer {
    pub weights : DMatrix<f64>,
    pub biases : DVector<f64>,
}

impl Layer {

    pub fn zeros(neurons : usize, prev_neurons : usize) -> Self {
        Self {
            weights: DMatrix::zeros(neurons, prev_neurons),
            biases: DVector::zeros(neurons),
        }
    }

    /// Draws every weight from `init`. Biases are left untouched.
    pub fn randomize<R : Rng + ?Sized>(&mut self, init : Initialization, rng : &mut R) {
        let fan_in = self.inputs();
        self.weights = self.weights.map(|_| init.sample(fan_in, rng));
    }

    pub fn neurons(&self) -> usize {
        self.weights.nrows()
    }

    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.weights.shape()
    }

    /// Weighted sum plus bias, passed through the sigmoid
    pub fn feed(&self, input_vector : &DVector<f64>) -> DVector<f64> {
        let mut output : DVector<f64> = &self.weights * input_vector;
        output.add_assign(&self.biases);
        output.map(sigmoid)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.weights.iter().chain(self.biases.iter()).all(|v| v.is_finite())
    }

}
