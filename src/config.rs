use rand::Rng;

#[cfg(feature = "save")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::Network;

/// How the initial weights are drawn. Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub enum Initialization {
    /// Uniform in `[-w, w)` regardless of layer size
    FixedBand(f64),
    /// Uniform in `[-1/sqrt(fan_in), 1/sqrt(fan_in))`
    FanIn,
}

impl Initialization {

    /// Half width of the sampling range for a layer fed by `fan_in` values
    pub fn half_width(&self, fan_in : usize) -> f64 {
        match self {
            Initialization::FixedBand(w) => *w,
            Initialization::FanIn => 1.0 / (fan_in as f64).sqrt(),
        }
    }

    pub fn sample<R : Rng + ?Sized>(&self, fan_in : usize, rng : &mut R) -> f64 {
        let w = self.half_width(fan_in);
        if w == 0.0 {
            return 0.0;
        }
        rng.gen_range(-w..w)
    }

}

impl Default for Initialization {
    fn default() -> Self {
        Initialization::FixedBand(0.05)
    }
}

/// Everything needed to build a fresh network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "save", derive(Serialize, Deserialize))]
pub struct NetworkConfig {
    pub input_size : usize,
    pub hidden_size : usize,
    pub output_size : usize,
    pub learning_rate : f64,
    pub init : Initialization,
    pub biases : bool,
}

impl NetworkConfig {

    pub fn new(input_size : usize, hidden_size : usize, output_size : usize, learning_rate : f64) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            init: Initialization::default(),
            biases: true,
        }
    }

    pub fn with_init(mut self, init : Initialization) -> Self {
        self.init = init;
        self
    }

    /// Disabling biases keeps `B1`/`B2` at zero for the lifetime of the network
    pub fn with_biases(mut self, biases : bool) -> Self {
        self.biases = biases;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, size) in [("input", self.input_size), ("hidden", self.hidden_size), ("output", self.output_size)] {
            if size == 0 {
                return Err(Error::InvalidConfig(format!("{} size must be at least 1", name)));
            }
        }
        validate_learning_rate(self.learning_rate)?;
        if let Initialization::FixedBand(w) = self.init {
            // The sampled range spans 2w, which has to stay finite as well
            if !(2.0 * w).is_finite() || w < 0.0 {
                return Err(Error::InvalidConfig(format!("initialization band must be finite and non-negative, got {}", w)));
            }
        }
        Ok(())
    }

    /// Validate and build a network with weights drawn from `rng`
    pub fn build<R : Rng + ?Sized>(&self, rng : &mut R) -> Result<Network> {
        self.validate()?;
        Ok(Network::from_config(self, rng))
    }

}

pub(crate) fn validate_learning_rate(learning_rate : f64) -> Result<()> {
    if !learning_rate.is_finite() || learning_rate < 0.0 {
        return Err(Error::InvalidConfig(format!("learning rate must be finite and non-negative, got {}", learning_rate)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(NetworkConfig::new(0, 3, 1, 0.5).validate().is_err());
        assert!(NetworkConfig::new(2, 0, 1, 0.5).validate().is_err());
        assert!(NetworkConfig::new(2, 3, 0, 0.5).validate().is_err());
        assert!(NetworkConfig::new(1, 1, 1, 0.5).validate().is_ok());
    }

    #[test]
    fn test_learning_rate_bounds() {
        assert!(NetworkConfig::new(2, 3, 1, 0.0).validate().is_ok());
        assert!(matches!(NetworkConfig::new(2, 3, 1, -0.1).validate(), Err(Error::InvalidConfig(_))));
        assert!(NetworkConfig::new(2, 3, 1, f64::NAN).validate().is_err());
        assert!(NetworkConfig::new(2, 3, 1, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_band_bounds() {
        let config = |w : f64| NetworkConfig::new(2, 3, 1, 0.5).with_init(Initialization::FixedBand(w));
        let mut rng = StdRng::seed_from_u64(1);
        for w in [1e308, f64::MAX, f64::INFINITY, f64::NAN, -0.1] {
            assert!(matches!(config(w).validate(), Err(Error::InvalidConfig(_))));
            assert!(matches!(config(w).build(&mut rng), Err(Error::InvalidConfig(_))));
        }
        assert!(config(1e307).build(&mut rng).is_ok());
        assert!(config(0.0).build(&mut rng).is_ok());
    }

    #[test]
    fn test_fan_in_half_width() {
        assert_eq!(Initialization::FanIn.half_width(4), 0.5);
        assert_eq!(Initialization::FixedBand(0.05).half_width(100), 0.05);
    }

    #[test]
    fn test_samples_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(42);
        for init in [Initialization::FixedBand(0.05), Initialization::FanIn] {
            let w = init.half_width(9);
            for _ in 0..1000 {
                let v = init.sample(9, &mut rng);
                assert!(v >= -w && v < w);
            }
        }
        assert_eq!(Initialization::FixedBand(0.0).sample(3, &mut rng), 0.0);
    }
}
