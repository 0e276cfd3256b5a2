use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::network::Network;

/// A network that can be trained and queried from several threads.
///
/// `train` holds the write lock for the whole step, so no reader ever sees a
/// network with only some of its parameters updated. `predict` only takes the
/// read lock and may run concurrently with other predictions.
#[derive(Debug, Clone)]
pub struct SharedNetwork {
    inner : Arc<RwLock<Network>>,
}

impl SharedNetwork {

    pub fn new(network : Network) -> Self {
        Self { inner: Arc::new(RwLock::new(network)) }
    }

    pub fn train(&self, input : &[f64], target : &[f64]) -> Result<f64> {
        let mut network = self.inner.write().map_err(|_| Error::Poisoned)?;
        network.train(input, target)
    }

    pub fn predict(&self, input : &[f64]) -> Result<Vec<f64>> {
        let network = self.inner.read().map_err(|_| Error::Poisoned)?;
        network.predict(input)
    }

    /// Copy of the current parameters
    pub fn snapshot(&self) -> Result<Network> {
        let network = self.inner.read().map_err(|_| Error::Poisoned)?;
        Ok(network.clone())
    }

    /// Unwraps the network if this is the last handle, otherwise clones it
    pub fn into_inner(self) -> Result<Network> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => lock.into_inner().map_err(|_| Error::Poisoned),
            Err(shared) => {
                let network = shared.read().map_err(|_| Error::Poisoned)?;
                Ok(network.clone())
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::thread;

    #[test]
    fn test_concurrent_training_at_zero_rate_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(21);
        let shared = SharedNetwork::new(Network::new(2, 3, 1, 0.0, &mut rng).unwrap());
        let before = shared.snapshot().unwrap();

        let handles : Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        shared.train(&[t as f64, 1.0], &[1.0]).unwrap();
                        let out = shared.predict(&[0.0, 1.0]).unwrap();
                        assert!(out[0] > 0.0 && out[0] < 1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.into_inner().unwrap(), before);
    }

    #[test]
    fn test_readers_only_see_whole_training_steps() {
        const STEPS : usize = 60;
        let mut rng = StdRng::seed_from_u64(23);
        let initial = Network::new(2, 4, 2, 0.5, &mut rng).unwrap();

        // Every state a single writer can leave behind, in order
        let mut states = vec![initial.clone()];
        let mut replay = initial.clone();
        for _ in 0..STEPS {
            replay.train(&[1.0, 0.5], &[1.0, 0.0]).unwrap();
            states.push(replay.clone());
        }
        assert_ne!(states[0], states[STEPS]);
        let states = Arc::new(states);

        let shared = SharedNetwork::new(initial);
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..STEPS {
                    shared.train(&[1.0, 0.5], &[1.0, 0.0]).unwrap();
                }
            })
        };
        let readers : Vec<_> = (0..3)
            .map(|_| {
                let shared = shared.clone();
                let states = Arc::clone(&states);
                thread::spawn(move || {
                    for _ in 0..STEPS {
                        let seen = shared.snapshot().unwrap();
                        assert!(states.iter().any(|state| *state == seen));
                        let out = shared.predict(&[0.0, 1.0]).unwrap();
                        assert!(out.iter().all(|v| *v > 0.0 && *v < 1.0));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(shared.into_inner().unwrap(), states[STEPS]);
    }

    #[test]
    fn test_errors_pass_through() {
        let mut rng = StdRng::seed_from_u64(22);
        let shared = SharedNetwork::new(Network::new(2, 3, 1, 0.5, &mut rng).unwrap());
        assert!(matches!(shared.predict(&[1.0]), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(shared.train(&[1.0, 0.0], &[]), Err(Error::DimensionMismatch { .. })));
    }
}
