//! # Voxel World Demo
//!
//! A headless driver for the streaming world engine: builds a world,
//! walks an observer across it, carves a hole near the spawn, and logs
//! what the pipeline delivers along the way.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release [settings.json]
//! RUST_LOG=debug cargo run --release
//! ```

use std::path::Path;

use cgmath::Point3;
use log::{error, info};

use voxel_world::engine_state::settings::WorldSettings;
use voxel_world::engine_state::voxels::block;
use voxel_world::engine_state::WorldEngine;

/// Upper bound on pump iterations while waiting for the pipeline to
/// drain, so a stuck pipeline ends the demo instead of hanging it.
const DRAIN_LIMIT: usize = 100_000;

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match WorldSettings::load_from_file(Path::new(&path)) {
            Ok(settings) => settings,
            Err(err) => {
                error!("{}", err);
                std::process::exit(1);
            }
        },
        None => WorldSettings {
            worker_threads: 2,
            view_radius: 3,
            ..WorldSettings::default()
        },
    };

    let mut engine = match WorldEngine::new(settings) {
        Ok(engine) => engine,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let mut observer = engine.spawn_position();
    let mut active_meshes = 0usize;
    let mut shelved_meshes = 0usize;

    let mut collect = |engine: &mut WorldEngine| {
        for submission in engine.take_mesh_submissions() {
            if submission.active {
                active_meshes += 1;
            } else {
                shelved_meshes += 1;
            }
        }
    };

    // Let the window around the spawn finish before moving.
    drain(&mut engine);
    collect(&mut engine);
    info!("Spawn window ready: {}", engine.status_line());

    // Carve a small opening at the spawn surface so remeshing has work
    // to do, and mark its floor with a wood block.
    let surface = {
        let world = engine.world.get();
        world
            .generator
            .terrain_height_at(observer.x as i32, observer.z as i32)
    };
    let anchor = Point3::new(observer.x as i32, surface, observer.z as i32);
    for dx in -1..=1 {
        for dy in 0..=1 {
            for dz in -1..=1 {
                engine.set_voxel(anchor + cgmath::Vector3::new(dx, dy, dz), block::AIR);
            }
        }
    }
    if let Some(wood) = block::id_by_name("wood") {
        engine.set_voxel(anchor + cgmath::Vector3::new(0, -1, 0), wood);
    }
    drain(&mut engine);
    collect(&mut engine);

    // Walk east across a few chunk borders, pumping as we go.
    for step in 0..600 {
        observer.x += 0.8;
        engine.update_observer(observer);
        engine.pump();
        collect(&mut engine);
        if step % 150 == 0 {
            info!("{}", engine.status_line());
        }
    }
    drain(&mut engine);
    collect(&mut engine);

    info!(
        "Walk finished: {} active meshes delivered, {} shelved; {}",
        active_meshes,
        shelved_meshes,
        engine.status_line()
    );
    engine.shutdown();
}

/// Pumps until the pipeline has nothing left in flight.
fn drain(engine: &mut WorldEngine) {
    for _ in 0..DRAIN_LIMIT {
        if !engine.has_pending_work() {
            return;
        }
        engine.pump();
    }
    error!("Pipeline failed to drain within {} pumps", DRAIN_LIMIT);
}
