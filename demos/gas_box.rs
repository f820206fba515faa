//! Headless two-wall gas run with live metrics.
//!
//! Drives the gas engine for ten simulated seconds, prints the metrics
//! record once per second, then asks the explanation service (or its
//! offline advisory fallback) to narrate the final state.
//!
//! Run with: cargo run --example gas_box

use fluxsim::prelude::*;

fn main() {
    env_logger::init();

    let params = SimulationParams::default()
        .with_particle_count(2_000)
        .with_heat(0.4);

    let mut sim = Simulation::new()
        .with_params(params)
        .with_active(ActiveSim::Gas)
        .with_seed(42);

    let mut surface = NullSurface;
    for tick in 0..600 {
        sim.tick(&mut surface);

        if tick % 60 == 59 {
            let data = sim.latest_data();
            println!(
                "t={:>3}s  state={:<16} entropy={:>8.4}  hot-slice={:>8.3}",
                (tick + 1) / 60,
                data.system_state.to_string(),
                data.entropy_production,
                data.temperature_gradient.last().copied().unwrap_or(0.0),
            );
        }
    }

    let client = match ExplainClient::new(ExplainConfig::from_env()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("could not build explanation client: {e}");
            return;
        }
    };

    println!();
    match client.request_explanation(&sim.params(), sim.latest_data()) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("{e}"),
    }
}
