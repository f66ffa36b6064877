//! Opens the neuron viewer.
//!
//! Usage: `cargo run --example neuron_demo [options.json]`

use neuroscope::{generate_neuron, show, Options, Result};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading options from {path}");
            Options::from_json_file(path)?
        }
        None => Options::default(),
    };

    let model = generate_neuron(&options)?;
    show(model, &options)
}
