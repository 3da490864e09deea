//! Path playback
//!
//! Walks a multi-segment path one frame at a time. Each segment takes
//! `PATH_SEGMENT_STEPS` frames; the host draws a line from the segment start
//! to the current position with the given opacity.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::PATH_SEGMENT_STEPS;
use crate::error::Result;
use crate::sim::{ParticleId, ParticleStore};

/// One frame of path playback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathFrame {
    /// Index of the segment being drawn
    pub segment: usize,
    /// Segment start
    pub from: DVec2,
    /// Segment end
    pub to: DVec2,
    /// Interpolated point between `from` and `to`
    pub position: DVec2,
    /// Line opacity, fading from 1 toward 0 across the segment
    pub opacity: f64,
}

/// Finite frame generator over a path
///
/// Waypoints are captured on construction. Once exhausted it stays
/// exhausted.
#[derive(Debug, Clone)]
pub struct PathAnimator {
    waypoints: Vec<DVec2>,
    step: usize,
}

impl PathAnimator {
    pub fn new(waypoints: Vec<DVec2>) -> Self {
        Self { waypoints, step: 0 }
    }

    /// Capture the current positions of `path` from `store`
    pub fn from_path(store: &ParticleStore, path: &[ParticleId]) -> Result<Self> {
        let waypoints = path
            .iter()
            .map(|&id| store.particle(id).map(|p| p.pos))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(waypoints))
    }

    /// Frames in a full playback; zero for paths shorter than two nodes
    pub fn total_steps(&self) -> usize {
        self.waypoints.len().saturating_sub(1) * PATH_SEGMENT_STEPS
    }

    pub fn has_next(&self) -> bool {
        self.step < self.total_steps()
    }

    pub fn remaining(&self) -> usize {
        self.total_steps() - self.step.min(self.total_steps())
    }

    pub fn waypoints(&self) -> &[DVec2] {
        &self.waypoints
    }
}

impl Iterator for PathAnimator {
    type Item = PathFrame;

    fn next(&mut self) -> Option<PathFrame> {
        if !self.has_next() {
            return None;
        }
        let segment = self.step / PATH_SEGMENT_STEPS;
        let t = (self.step % PATH_SEGMENT_STEPS) as f64 / PATH_SEGMENT_STEPS as f64;
        let from = self.waypoints[segment];
        let to = self.waypoints[segment + 1];
        self.step += 1;
        Some(PathFrame {
            segment,
            from,
            to,
            position: from + (to - from) * t,
            opacity: 1.0 - t,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for PathAnimator {}
