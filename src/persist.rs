//! Whole-network model files.
//!
//! A model file is a bincode encoded snapshot holding the sizes, the learning rate,
//! the bias flag and both layers. Floats are stored bit for bit, so a loaded network
//! predicts exactly like the one that was saved.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::network::Network;

const MAGIC : [u8; 4] = *b"SHNT";
const FORMAT_VERSION : u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    magic : [u8; 4],
    version : u32,
    input_size : u64,
    hidden_size : u64,
    output_size : u64,
    learning_rate : f64,
    biases : bool,
    hidden : &'a Layer,
    output : &'a Layer,
}

/// Owned counterpart of `SnapshotRef`, fields must stay in the same order
#[derive(Deserialize)]
struct Snapshot {
    magic : [u8; 4],
    version : u32,
    input_size : u64,
    hidden_size : u64,
    output_size : u64,
    learning_rate : f64,
    biases : bool,
    hidden : Layer,
    output : Layer,
}

impl<'a> SnapshotRef<'a> {
    fn of(network : &'a Network) -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            input_size: network.input_size() as u64,
            hidden_size: network.hidden_size() as u64,
            output_size: network.output_size() as u64,
            learning_rate: network.learning_rate(),
            biases: network.has_biases(),
            hidden: network.hidden_layer(),
            output: network.output_layer(),
        }
    }
}

impl Snapshot {

    fn into_network(self) -> Result<Network> {
        if self.magic != MAGIC {
            return Err(Error::Format(format!("bad magic {:?}", self.magic)));
        }
        if self.version != FORMAT_VERSION {
            return Err(Error::Format(format!("version {} is not supported, expected {}", self.version, FORMAT_VERSION)));
        }
        // Declared sizes are authoritative, the layers have to fit them before anything is built
        check_declared("hidden weights", (self.hidden_size, self.input_size), self.hidden.shape())?;
        check_declared("hidden biases", (self.hidden_size, 1), self.hidden.biases.shape())?;
        check_declared("output weights", (self.output_size, self.hidden_size), self.output.shape())?;
        check_declared("output biases", (self.output_size, 1), self.output.biases.shape())?;
        Network::from_layers(self.learning_rate, self.biases, self.hidden, self.output)
    }

}

fn check_declared(what : &'static str, declared : (u64, u64), found : (usize, usize)) -> Result<()> {
    if declared != (found.0 as u64, found.1 as u64) {
        return Err(Error::ShapeMismatch {
            what,
            expected: (declared.0 as usize, declared.1 as usize),
            found,
        });
    }
    Ok(())
}

pub fn to_bytes(network : &Network) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&SnapshotRef::of(network))?)
}

pub fn from_bytes(bytes : &[u8]) -> Result<Network> {
    let snapshot : Snapshot = bincode::deserialize(bytes)?;
    snapshot.into_network()
}

pub fn write_to<W : Write>(network : &Network, writer : W) -> Result<()> {
    bincode::serialize_into(writer, &SnapshotRef::of(network))?;
    Ok(())
}

pub fn read_from<R : Read>(reader : R) -> Result<Network> {
    let snapshot : Snapshot = bincode::deserialize_from(reader)?;
    snapshot.into_network()
}

/// Writes the model file at `path`, replacing any existing file
pub fn save<P : AsRef<Path>>(network : &Network, path : P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(network, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), "saved network");
    Ok(())
}

/// Reads a model file. Either the whole network is returned or an error, never a partial network.
pub fn load<P : AsRef<Path>>(path : P) -> Result<Network> {
    let path = path.as_ref();
    let network = read_from(BufReader::new(File::open(path)?))?;
    debug!(
        path = %path.display(),
        input = network.input_size(),
        hidden = network.hidden_size(),
        output = network.output_size(),
        "loaded network"
    );
    Ok(network)
}

/// Replaces the weights and biases of `network` with the ones stored at `path`.
///
/// The stored layers must have exactly the shapes of `network`; the learning rate
/// and bias flag of `network` are kept.
pub fn load_into<P : AsRef<Path>>(network : &mut Network, path : P) -> Result<()> {
    let (hidden, output) = load(path)?.into_layers();
    network.restore(hidden, output)
}

impl Network {

    pub fn save<P : AsRef<Path>>(&self, path : P) -> Result<()> {
        save(self, path)
    }

    pub fn load<P : AsRef<Path>>(path : P) -> Result<Network> {
        load(path)
    }

}
