//! A feed-forward network with a single sigmoid hidden layer, trained one sample
//! at a time with backpropagation.
//!
//! ```rust,ignore
//! use rand::SeedableRng;
//! use shallow_net::{xor_dataset, Network};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut network = Network::new(2, 5, 1, 0.5, &mut rng)?;
//! network.fit(&xor_dataset(), 10_000, 1_000)?;
//! println!("{:?}", network.predict(&[1.0, 0.0])?);
//! ```

pub mod activation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layer;
pub mod network;
#[cfg(feature = "save")]
pub mod persist;
pub mod shared;

pub use activation::{sigmoid, sigmoid_derivative};
pub use config::{Initialization, NetworkConfig};
pub use dataset::{parse_dataset, read_dataset, xor_dataset, Sample};
pub use error::{Error, Result};
pub use layer::Layer;
pub use network::Network;
pub use shared::SharedNetwork;

/// Formats an output vector with four decimals per value, separated by spaces
pub fn format_output(output : &[f64]) -> String {
    output.iter().map(|v| format!("{:.4}", v)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_output() {
        assert_eq!(format_output(&[0.5, 0.123456, 1.0]), "0.5000 0.1235 1.0000");
        assert_eq!(format_output(&[]), "");
    }
}
