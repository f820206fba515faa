//! Gray-Scott pattern formation, rendered as terminal ASCII.
//!
//! Steps a seeded grid through a few hundred frames and prints a
//! downsampled view of the v channel so you can watch the pattern
//! emerge without a GPU.
//!
//! Run with: cargo run --example pattern_lab

use fluxsim::prelude::*;

const VIEW: usize = 48;
const SHADES: &[u8] = b" .:-=+*#%@";

fn main() {
    env_logger::init();

    let mut sim = Simulation::new()
        .with_grid_size(192)
        .with_reaction_params(
            ReactionDiffusionParams::default()
                .with_feed(0.055)
                .with_kill(0.062)
                .with_substeps(8),
        )
        .with_active(ActiveSim::GrayScott)
        .with_seed(42);

    let mut surface = NullSurface;
    for frame in 0..240 {
        sim.tick(&mut surface);

        if frame % 60 == 59 {
            let grid = sim.gray_scott().grid();
            let (mean, variance) = grid.v_stats();
            println!("frame {:>3}: v mean={mean:.4} variance={variance:.5}", frame + 1);
            print_view(grid);
        }
    }
}

fn print_view(grid: &Grid) {
    let step = grid.width() / VIEW;
    for vy in 0..VIEW / 2 {
        let mut line = String::with_capacity(VIEW);
        for vx in 0..VIEW {
            // Terminal cells are tall; sample two rows per printed line
            let v = grid.cell(vx * step, vy * 2 * step).v;
            let shade = ((v * (SHADES.len() - 1) as f32) as usize).min(SHADES.len() - 1);
            line.push(SHADES[shade] as char);
        }
        println!("{line}");
    }
}
