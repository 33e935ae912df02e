//! Headless emitter simulation

use anyhow::{Context, Result};
use ember_particles::{
    Drawable, InstanceBatch, ParticleSystem, ParticleSystemConfig, RenderStates,
};
use ember_runtime::{GameClock, RuntimeSystem};
use serde::Serialize;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub dt: f64,
    pub seed: u32,
    pub burst: Option<u32>,
    pub radius: f32,
    pub every: u32,
    pub json: bool,
}

/// What a run produced, printed at the end
#[derive(Debug, Serialize, PartialEq)]
pub struct SimulationSummary {
    pub frames: u32,
    pub simulated_seconds: f64,
    pub spawned: u64,
    pub alive: usize,
    pub peak_alive: usize,
    /// Instances packed on the last frame
    pub instances_drawn: usize,
    /// Draw calls an instanced renderer would issue on the last frame
    pub draw_ranges: usize,
    pub instance_bytes: usize,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    // the simulation steps in f32
    if !((args.dt as f32).is_finite() && args.dt >= 0.0) {
        anyhow::bail!("--dt must be a non-negative number of seconds, got {}", args.dt);
    }

    let mut config = match &args.config {
        Some(path) => ParticleSystemConfig::load(path)
            .with_context(|| format!("loading emitter '{path}'"))?,
        None => ParticleSystemConfig::default(),
    };
    if let Some(count) = args.burst {
        config.burst_count = count;
        config.burst_radius = args.radius;
    }

    let summary = simulate(&config, &args, |frame, system, batch| {
        if !args.json && args.every > 0 && frame % args.every == 0 {
            println!(
                "frame {frame:>5}: {:>6} alive, {:>6} spawned, {:>3} range(s)",
                system.particle_count(),
                system.spawned(),
                batch.ranges().len()
            );
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Simulated {} frame(s) ({:.3}s): {} spawned, {} alive, peak {}",
            summary.frames,
            summary.simulated_seconds,
            summary.spawned,
            summary.alive,
            summary.peak_alive
        );
        println!(
            "Last frame: {} instance(s) in {} draw range(s), {} bytes",
            summary.instances_drawn, summary.draw_ranges, summary.instance_bytes
        );
    }
    Ok(())
}

/// Step the emitter frame by frame, drawing into an instance batch after
/// every update the way a host renderer would.
fn simulate(
    config: &ParticleSystemConfig,
    args: &SimulateArgs,
    mut on_frame: impl FnMut(u32, &ParticleSystem, &InstanceBatch),
) -> Result<SimulationSummary> {
    let mut system = ParticleSystem::with_seed(args.seed);
    system.apply_config(config);
    system.initialize()?;

    if config.burst_count > 0 {
        system.set_explosion(config.burst_count as usize, config.burst_radius);
    }

    let states = RenderStates::default().with_blend_mode(config.blend_mode);
    let mut clock = GameClock::new();
    let mut batch = InstanceBatch::new();
    let mut peak_alive = system.particle_count();

    for frame in 1..=args.frames {
        clock.advance(args.dt);
        RuntimeSystem::update(&mut system, clock.delta_time)?;

        batch.clear();
        system.draw(&mut batch, &states);
        peak_alive = peak_alive.max(system.particle_count());
        on_frame(frame, &system, &batch);
    }

    let summary = SimulationSummary {
        frames: args.frames,
        simulated_seconds: clock.total_time,
        spawned: system.spawned(),
        alive: system.particle_count(),
        peak_alive,
        instances_drawn: batch.len(),
        draw_ranges: batch.ranges().len(),
        instance_bytes: batch.as_bytes().len(),
    };
    system.shutdown()?;
    log::debug!("[simulate] {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(frames: u32, dt: f64) -> SimulateArgs {
        SimulateArgs {
            config: None,
            frames,
            dt,
            seed: 7,
            burst: None,
            radius: 0.0,
            every: 0,
            json: true,
        }
    }

    #[test]
    fn steady_emitter_counts() {
        let config = ParticleSystemConfig::from_toml_str(
            "velocity = 100\nrespawn_rate = 2\nlifetime = 0\nemitted = true",
        )
        .unwrap();

        let mut alive_per_frame = Vec::new();
        let summary = simulate(&config, &args(6, 0.5), |_, system, batch| {
            assert_eq!(batch.len(), system.particle_count());
            alive_per_frame.push(system.particle_count());
        })
        .unwrap();

        assert_eq!(alive_per_frame, vec![0, 1, 2, 2, 2, 2]);
        assert_eq!(summary.spawned, 5);
        assert_eq!(summary.peak_alive, 2);
        assert_eq!(summary.instance_bytes, 2 * 48);
        assert!((summary.simulated_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn burst_runs_out() {
        let config = ParticleSystemConfig {
            burst_count: 12,
            burst_radius: 4.0,
            velocity: 50.0,
            ..Default::default()
        };

        let summary = simulate(&config, &args(4, 0.5), |_, _, _| {}).unwrap();
        assert_eq!(summary.spawned, 12);
        assert_eq!(summary.peak_alive, 12);
        // lifetime 1.0: two updates, one grace frame, gone on the third
        assert_eq!(summary.alive, 0);
        assert_eq!(summary.draw_ranges, 0);
    }

    #[test]
    fn demo_emitters_load_and_run() {
        let demos = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos");
        for name in ["fountain.toml", "burst.toml"] {
            let config = ParticleSystemConfig::load(format!("{demos}/{name}")).unwrap();
            let summary = simulate(&config, &args(30, 1.0 / 30.0), |_, _, _| {}).unwrap();
            assert!(summary.spawned > 0, "{name} spawned nothing");
        }
    }

    #[test]
    fn rejects_negative_dt() {
        assert!(run(args(1, -0.5)).is_err());
    }

    #[test]
    fn rejects_dt_beyond_f32_range() {
        assert!(run(args(1, 1e300)).is_err());
        assert!(run(args(1, f64::NAN)).is_err());
    }

    #[test]
    fn oversized_step_still_finishes() {
        let config = ParticleSystemConfig::from_toml_str("respawn_rate = 60\nemitted = true")
            .unwrap();
        let summary = simulate(&config, &args(1, 1.0e6), |_, _, _| {}).unwrap();
        assert_eq!(
            summary.spawned,
            ember_particles::system::MAX_SPAWNS_PER_UPDATE as u64
        );
    }

    #[test]
    fn summary_serializes() {
        let summary = simulate(&ParticleSystemConfig::default(), &args(1, 0.1), |_, _, _| {})
            .unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["frames"], 1);
        assert_eq!(json["alive"], 0);
    }
}
