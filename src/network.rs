use nalgebra::{DMatrix, DVector};
use rand::Rng;
use tracing::{debug, info};

use crate::activation::sigmoid_derivative;
use crate::config::{validate_learning_rate, NetworkConfig};
use crate::dataset::Sample;
use crate::error::{Error, Result};
use crate::layer::Layer;

/// Parameter changes computed from a single training pair, before the learning rate is applied
struct Gradients {
    hidden_weights : DMatrix<f64>,
    hidden_biases : DVector<f64>,
    output_weights : DMatrix<f64>,
    output_biases : DVector<f64>,
    squared_error : f64,
}

/// Feed-forward network with one sigmoid hidden layer and a sigmoid output layer.
///
/// The hidden layer weights are stored as a (hidden, input) matrix and the output
/// layer weights as an (output, hidden) matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    input_size : usize,
    hidden_size : usize,
    output_size : usize,
    learning_rate : f64,
    biases : bool,
    hidden : Layer,
    output : Layer,
}

impl Network {

    /// Create a network with biases and weights drawn uniformly from [-0.05, 0.05)
    pub fn new<R : Rng + ?Sized>(
        input_size : usize,
        hidden_size : usize,
        output_size : usize,
        learning_rate : f64,
        rng : &mut R,
    ) -> Result<Self> {
        NetworkConfig::new(input_size, hidden_size, output_size, learning_rate).build(rng)
    }

    pub(crate) fn from_config<R : Rng + ?Sized>(config : &NetworkConfig, rng : &mut R) -> Self {
        let mut hidden = Layer::zeros(config.hidden_size, config.input_size);
        let mut output = Layer::zeros(config.output_size, config.hidden_size);
        hidden.randomize(config.init, rng);
        output.randomize(config.init, rng);
        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            output_size: config.output_size,
            learning_rate: config.learning_rate,
            biases: config.biases,
            hidden,
            output,
        }
    }

    /// Assemble a network from already trained layers.
    ///
    /// Sizes are taken from the layers, which must agree with each other; nothing is allocated.
    pub fn from_layers(learning_rate : f64, biases : bool, hidden : Layer, output : Layer) -> Result<Self> {
        let config = NetworkConfig::new(hidden.inputs(), hidden.neurons(), output.neurons(), learning_rate)
            .with_biases(biases);
        config.validate()?;
        check_layers(&config, &hidden, &output)?;
        Ok(Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            output_size: config.output_size,
            learning_rate,
            biases,
            hidden,
            output,
        })
    }

    pub fn into_layers(self) -> (Layer, Layer) {
        (self.hidden, self.output)
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate : f64) -> Result<()> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn has_biases(&self) -> bool {
        self.biases
    }

    pub fn hidden_layer(&self) -> &Layer {
        &self.hidden
    }

    pub fn output_layer(&self) -> &Layer {
        &self.output
    }

    /// Replace both layers with the given ones.
    ///
    /// Nothing is modified unless every matrix matches the current shapes and holds only finite values.
    /// Without biases both bias vectors must be all zero.
    pub fn restore(&mut self, hidden : Layer, output : Layer) -> Result<()> {
        let config = NetworkConfig::new(self.input_size, self.hidden_size, self.output_size, self.learning_rate)
            .with_biases(self.biases);
        check_layers(&config, &hidden, &output)?;
        self.hidden = hidden;
        self.output = output;
        Ok(())
    }

    fn check_input(&self, input : &[f64]) -> Result<()> {
        if input.len() != self.input_size {
            return Err(Error::dimension("input", self.input_size, input.len()));
        }
        Ok(())
    }

    fn check_target(&self, target : &[f64]) -> Result<()> {
        if target.len() != self.output_size {
            return Err(Error::dimension("target", self.output_size, target.len()));
        }
        Ok(())
    }

    /// Returns the hidden layer output and the final output
    fn forward(&self, input_vector : &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        let hidden_output = self.hidden.feed(input_vector);
        let final_output = self.output.feed(&hidden_output);
        (hidden_output, final_output)
    }

    /// Feed input to the network and get the resulting output (the prediction)
    pub fn predict(&self, input : &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let (_, output) = self.forward(&DVector::from_column_slice(input));
        Ok(output.data.as_vec().clone())
    }

    fn backpropagate(&self, input : &[f64], target : &[f64]) -> Gradients {
        let input_vector = DVector::from_column_slice(input);
        let target_vector = DVector::from_column_slice(target);
        let (hidden_output, final_output) = self.forward(&input_vector);

        // Signed residual, the sign gives the direction of the update
        let output_errors = target_vector - &final_output;
        let squared_error = output_errors.map(|v| v * v).sum();
        let output_delta = output_errors.component_mul(&final_output.map(sigmoid_derivative));
        let output_weights = &output_delta * hidden_output.transpose();

        // Raw output errors go back through the pre-update output weights,
        // the hidden derivative is applied once afterwards
        let hidden_errors = self.output.weights.tr_mul(&output_errors);
        let hidden_delta = hidden_errors.component_mul(&hidden_output.map(sigmoid_derivative));
        let hidden_weights = &hidden_delta * input_vector.transpose();

        Gradients {
            hidden_weights,
            hidden_biases: hidden_delta,
            output_weights,
            output_biases: output_delta,
            squared_error,
        }
    }

    fn apply(&mut self, gradients : Gradients) {
        if self.learning_rate == 0.0 {
            return;
        }
        let rate = self.learning_rate;
        self.output.weights += gradients.output_weights * rate;
        self.hidden.weights += gradients.hidden_weights * rate;
        if self.biases {
            self.output.biases += gradients.output_biases * rate;
            self.hidden.biases += gradients.hidden_biases * rate;
        }
    }

    /// One step of backpropagation on a single training pair.
    ///
    /// All changes are computed from the current parameters before any of them is updated.
    /// Returns the squared error of the prediction made before the update.
    pub fn train(&mut self, input : &[f64], target : &[f64]) -> Result<f64> {
        self.check_input(input)?;
        self.check_target(target)?;
        let gradients = self.backpropagate(input, target);
        let squared_error = gradients.squared_error;
        self.apply(gradients);
        Ok(squared_error)
    }

    fn check_samples(&self, samples : &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for sample in samples {
            self.check_input(&sample.input)?;
            self.check_target(&sample.target)?;
        }
        Ok(())
    }

    /// Mean over all samples of the summed squared output error
    pub fn loss(&self, samples : &[Sample]) -> Result<f64> {
        self.check_samples(samples)?;
        let mut total = 0.0;
        for sample in samples {
            let (_, output) = self.forward(&DVector::from_column_slice(&sample.input));
            total += (DVector::from_column_slice(&sample.target) - output).map(|v| v * v).sum();
        }
        Ok(total / samples.len() as f64)
    }

    /// Train on every sample in order, once per epoch.
    ///
    /// Every sample is checked before the first update. Returns the mean squared error
    /// seen during the last epoch, or the current loss when `epochs` is 0. Progress is logged every `log_every` epochs (0 disables it).
    pub fn fit(&mut self, samples : &[Sample], epochs : usize, log_every : usize) -> Result<f64> {
        self.check_samples(samples)?;
        if epochs == 0 {
            return self.loss(samples);
        }
        let mut loss = 0.0;
        for epoch in 0..epochs {
            let mut epoch_error = 0.0;
            for sample in samples {
                let gradients = self.backpropagate(&sample.input, &sample.target);
                epoch_error += gradients.squared_error;
                self.apply(gradients);
            }
            loss = epoch_error / samples.len() as f64;
            if log_every != 0 && epoch % log_every == 0 {
                debug!(epoch = epoch + 1, epochs, loss, "fit progress");
            }
        }
        info!(epochs, samples = samples.len(), loss, "fit finished");
        Ok(loss)
    }

}

fn check_layers(config : &NetworkConfig, hidden : &Layer, output : &Layer) -> Result<()> {
    check_shape("hidden weights", (config.hidden_size, config.input_size), hidden.shape())?;
    check_shape("hidden biases", (config.hidden_size, 1), hidden.biases.shape())?;
    check_shape("output weights", (config.output_size, config.hidden_size), output.shape())?;
    check_shape("output biases", (config.output_size, 1), output.biases.shape())?;
    if !hidden.is_finite() {
        return Err(Error::NonFinite("hidden layer"));
    }
    if !output.is_finite() {
        return Err(Error::NonFinite("output layer"));
    }
    if !config.biases && hidden.biases.iter().chain(output.biases.iter()).any(|b| *b != 0.0) {
        return Err(Error::InvalidConfig("biases are disabled but the bias vectors are not zero".to_string()));
    }
    Ok(())
}

fn check_shape(what : &'static str, expected : (usize, usize), found : (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(Error::ShapeMismatch { what, expected, found });
    }
    Ok(())
}
