use rand::rngs::StdRng;
use rand::SeedableRng;
use shallow_net::{format_output, xor_dataset, Network};

fn main() -> shallow_net::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Create network structure
    let mut rng = StdRng::seed_from_u64(7);
    let mut network = Network::new(2, 5, 1, 0.5, &mut rng)?;
    let samples = xor_dataset();
    // Print output before trained
    for sample in &samples {
        println!("{:?} -> {}", sample.input, format_output(&network.predict(&sample.input)?));
    }
    // Train network
    network.fit(&samples, 10_000, 1_000)?;
    // Print output after trained
    for sample in &samples {
        println!("{:?} -> {}", sample.input, format_output(&network.predict(&sample.input)?));
    }
    // Save the model so it does not have to be trained again
    network.save("xor.model")?;
    Ok(())
}
