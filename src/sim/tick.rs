//! Frame-driven simulation controller
//!
//! The host owns the clock. `FluidSim` asks it for one callback per frame
//! through a `FrameScheduler`, and on each callback runs
//! `time_step_multiplier` integrate + collide passes before asking again.
//! Stopping cancels the outstanding request, and any callback carrying an
//! outdated token is ignored.

use std::collections::VecDeque;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::resolve;
use super::integrate::step;
use super::state::{Particle, ParticleId, ParticleStore, Rect, Tag};
use crate::consts::FRICTION;
use crate::error::{Error, Result};
use crate::graph::{Edge, PathAnimator, build_mst, shortest_path};
use crate::settings::{PointRadius, SimConfig};

/// Identifies one outstanding frame request
pub type FrameToken = u64;

/// Host-side frame timing source
pub trait FrameScheduler {
    /// Request one call to `FluidSim::on_frame` with the returned token
    fn schedule_next_tick(&mut self) -> FrameToken;
    /// Withdraw a request that has not fired yet
    fn cancel_scheduled(&mut self, token: FrameToken);
}

/// Scheduler for headless hosts and tests: requests queue up until the host
/// pops them with `take_due`
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_token: FrameToken,
    pending: VecDeque<FrameToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request, if any
    pub fn take_due(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self) -> FrameToken {
        self.next_token += 1;
        self.pending.push_back(self.next_token);
        self.next_token
    }

    fn cancel_scheduled(&mut self, token: FrameToken) {
        self.pending.retain(|&t| t != token);
    }
}

/// Result of a click on the canvas
#[derive(Debug, Clone)]
pub enum SelectOutcome {
    /// No particle under the point
    Missed,
    /// First endpoint picked; waiting for the second
    Selected(ParticleId),
    /// Second endpoint picked and a tree path joins them
    Path {
        path: Vec<ParticleId>,
        animator: PathAnimator,
    },
    /// Second endpoint picked but the current tree does not join them
    NoPath { from: ParticleId, to: ParticleId },
}

/// Complete simulation context
#[derive(Debug)]
pub struct FluidSim<S: FrameScheduler> {
    config: SimConfig,
    store: ParticleStore,
    rng: Pcg32,
    scheduler: S,
    running: bool,
    confined: bool,
    /// Token of the frame request currently outstanding
    pending: Option<FrameToken>,
    /// Frames advanced since the last start
    frames: u64,
    mst_edges: Vec<Edge>,
    selection: Vec<ParticleId>,
}

impl<S: FrameScheduler> FluidSim<S> {
    /// Create an idle simulation; particles appear on `start`
    pub fn new(config: SimConfig, scheduler: S) -> Result<Self> {
        config.validate()?;
        let rng = Pcg32::seed_from_u64(config.seed.unwrap_or(0));
        let confined = config.confined;
        Ok(Self {
            config,
            store: ParticleStore::new(),
            rng,
            scheduler,
            running: false,
            confined,
            pending: None,
            frames: 0,
            mst_edges: Vec::new(),
            selection: Vec::new(),
        })
    }

    // === Commands ===

    /// Reset all state from the configuration and start ticking
    pub fn start(&mut self) {
        self.cancel_pending();

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        self.rng = Pcg32::seed_from_u64(seed);
        self.store = ParticleStore::initialize(
            self.config.particle_count,
            &self.config.box_region(),
            self.config.speed_scale,
            self.config.point_radius.as_f64(),
            &mut self.rng,
        );
        self.confined = self.config.confined;
        self.frames = 0;
        self.mst_edges.clear();
        self.selection.clear();

        self.running = true;
        self.pending = Some(self.scheduler.schedule_next_tick());
        log::info!(
            "Simulation started: {} particles, seed {}",
            self.store.len(),
            seed
        );
    }

    /// Stop ticking; particles stay where they are for graph queries
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.cancel_pending();
        log::info!("Simulation stopped after {} frames", self.frames);
    }

    pub fn toggle_running(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Flip between box walls and canvas walls; returns the new state
    pub fn toggle_confinement(&mut self) -> bool {
        self.confined = !self.confined;
        log::info!("Confinement {}", if self.confined { "on" } else { "off" });
        self.confined
    }

    /// Host callback for a fired frame request
    ///
    /// Returns false, doing nothing, when `token` is not the outstanding
    /// request (stale or cancelled).
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.pending != Some(token) {
            log::debug!("Ignoring stale frame {}", token);
            return false;
        }
        self.pending = None;
        self.advance();
        if self.running {
            self.pending = Some(self.scheduler.schedule_next_tick());
        }
        true
    }

    /// Replace the live particles, e.g. with a hand-built scene
    ///
    /// Clears the stored tree and any pending selection, since their ids
    /// referred to the old store.
    pub fn replace_particles(&mut self, particles: Vec<Particle>) {
        self.store = ParticleStore::from_particles(particles);
        self.mst_edges.clear();
        self.selection.clear();
    }

    /// Build and keep the MST over every particle carrying `tag`
    pub fn build_mst_for(&mut self, tag: Tag) -> &[Edge] {
        let ids = self.store.ids_with_tag(tag);
        self.mst_edges = build_mst(self.store.as_slice(), &ids);
        log::info!(
            "Built {} MST: {} nodes, {} edges",
            tag.as_str(),
            ids.len(),
            self.mst_edges.len()
        );
        &self.mst_edges
    }

    /// Path between two particles over the stored tree, ready for playback
    pub fn request_path(&self, from: ParticleId, to: ParticleId) -> Option<PathAnimator> {
        let path = self.find_path(from, to)?;
        PathAnimator::from_path(&self.store, &path).ok()
    }

    /// Pick the particle under `point`; the second pick resolves a path
    pub fn select_at(&mut self, point: DVec2) -> SelectOutcome {
        let Some(id) = self.store.pick(point) else {
            return SelectOutcome::Missed;
        };
        self.selection.push(id);
        if self.selection.len() < 2 {
            return SelectOutcome::Selected(id);
        }

        let (from, to) = (self.selection[0], self.selection[1]);
        self.selection.clear();
        match self.find_path(from, to) {
            Some(path) => match PathAnimator::from_path(&self.store, &path) {
                Ok(animator) => SelectOutcome::Path { path, animator },
                Err(e) => {
                    log::warn!("Path {} -> {} is stale: {}", from, to, e);
                    SelectOutcome::NoPath { from, to }
                }
            },
            None => SelectOutcome::NoPath { from, to },
        }
    }

    // === Configuration ===

    /// Particles spawned on the next start
    pub fn set_particle_count(&mut self, count: i64) -> Result<()> {
        let count = usize::try_from(count).map_err(|_| {
            log::warn!("Rejected particle count {}", count);
            Error::InvalidConfig(format!("particle count must be >= 0, got {count}"))
        })?;
        self.config.particle_count = count;
        Ok(())
    }

    /// Velocity spread used on the next start
    pub fn set_speed_scale(&mut self, scale: i64) {
        self.config.speed_scale = scale as f64;
    }

    /// Passes per frame, effective from the next frame
    pub fn set_time_step_multiplier(&mut self, multiplier: i64) -> Result<()> {
        let multiplier = u32::try_from(multiplier)
            .ok()
            .filter(|&m| m >= 1)
            .ok_or_else(|| {
                log::warn!("Rejected time step multiplier {}", multiplier);
                Error::InvalidConfig(format!(
                    "time step multiplier must be >= 1, got {multiplier}"
                ))
            })?;
        self.config.time_step_multiplier = multiplier;
        Ok(())
    }

    /// New radius for all live and future particles
    pub fn set_point_radius(&mut self, radius: u8) -> Result<()> {
        let radius = PointRadius::try_from(radius)?;
        self.apply_point_radius(radius);
        Ok(())
    }

    /// Switch between the two point sizes; returns the new size
    pub fn toggle_point_radius(&mut self) -> PointRadius {
        let radius = self.config.point_radius.toggled();
        self.apply_point_radius(radius);
        radius
    }

    // === Queries ===

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    pub fn snapshot(&self) -> Vec<Particle> {
        self.store.snapshot()
    }

    pub fn mst_edges(&self) -> &[Edge] {
        &self.mst_edges
    }

    /// Path between two particles over the stored tree
    pub fn find_path(&self, from: ParticleId, to: ParticleId) -> Option<Vec<ParticleId>> {
        shortest_path(&self.mst_edges, from, to)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_confined(&self) -> bool {
        self.confined
    }

    pub fn bounds(&self) -> Rect {
        self.config.bounds()
    }

    /// The box outline to draw, while confinement is on
    pub fn confinement_box(&self) -> Option<Rect> {
        self.confined.then(|| self.config.box_region())
    }

    pub fn selected(&self) -> &[ParticleId] {
        &self.selection
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // === Internals ===

    fn advance(&mut self) {
        let bounds = self.config.bounds();
        let box_region = self.config.box_region();
        let mut collisions = 0;
        for _ in 0..self.config.time_step_multiplier {
            let particles = self.store.as_mut_slice();
            step(particles, &bounds, self.confined, &box_region, FRICTION);
            collisions += resolve(particles);
        }
        self.frames += 1;
        log::trace!("Frame {}: {} collisions", self.frames, collisions);
    }

    fn apply_point_radius(&mut self, radius: PointRadius) {
        self.config.point_radius = radius;
        self.store.set_radius(radius.as_f64());
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_scheduled(token);
        }
    }
}
