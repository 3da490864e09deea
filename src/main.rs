//! Fluid MST headless runner
//!
//! Runs the simulation without a renderer, then builds a tree per tag and
//! plays back a path on the larger one. Prints a JSON summary.
//!
//! Usage: `fluid-mst [CONFIG_JSON] [FRAMES]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // On the web the host page drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use fluid_mst::{FluidSim, ManualScheduler, SimConfig, Tag, total_weight};
    use serde_json::json;

    const DEFAULT_FRAMES: u64 = 600;

    pub fn run() -> fluid_mst::Result<()> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(json) => SimConfig::from_json(&json)?,
            None => SimConfig {
                seed: Some(1),
                ..Default::default()
            },
        };
        let frames = match args.next() {
            Some(n) => n.parse::<u64>().map_err(|e| {
                fluid_mst::Error::InvalidConfig(format!("frame count {n:?}: {e}"))
            })?,
            None => DEFAULT_FRAMES,
        };

        log::info!("Fluid MST (native) starting...");
        let mut sim = FluidSim::new(config, ManualScheduler::new())?;
        sim.start();
        while sim.frames() < frames {
            let Some(token) = sim.scheduler_mut().take_due() else {
                break;
            };
            sim.on_frame(token);
        }
        sim.stop();

        let mut trees = Vec::new();
        for tag in [Tag::Green, Tag::Red] {
            let nodes = sim.store().count_tag(tag);
            let edges = sim.build_mst_for(tag).to_vec();
            trees.push(json!({
                "tag": tag.as_str(),
                "nodes": nodes,
                "edges": edges.len(),
                "weight": total_weight(&edges, sim.particles()),
            }));
        }

        // Walk the larger tree end to end
        let tag = if sim.store().count_tag(Tag::Red) > sim.store().count_tag(Tag::Green) {
            Tag::Red
        } else {
            Tag::Green
        };
        let ids = sim.store().ids_with_tag(tag);
        sim.build_mst_for(tag);
        let path = match (ids.first(), ids.last()) {
            (Some(&from), Some(&to)) => sim.find_path(from, to),
            _ => None,
        };
        let playback_frames = path
            .as_ref()
            .and_then(|p| match (p.first(), p.last()) {
                (Some(&from), Some(&to)) => sim.request_path(from, to),
                _ => None,
            })
            .map(|animator| animator.count())
            .unwrap_or(0);

        let summary = json!({
            "frames": sim.frames(),
            "particles": sim.particles().len(),
            "kinetic_energy": sim.store().kinetic_energy(),
            "confined": sim.is_confined(),
            "trees": trees,
            "path": {
                "tag": tag.as_str(),
                "hops": path.as_ref().map(|p| p.len().saturating_sub(1)),
                "playback_frames": playback_frames,
            },
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
