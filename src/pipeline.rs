//! The magic wand erase pipeline: grow, smooth, composite.

use crate::buffer::{BufferRef, PixelBuffer};
use crate::composite::composite;
use crate::error::EditResult;
use crate::selection::{grow, smooth};
use crate::settings::SelectionParams;

/// Run the full pipeline against `base` without modifying it.
pub fn erase_region(
    base: &PixelBuffer,
    seed_x: u32,
    seed_y: u32,
    params: &SelectionParams,
) -> EditResult<PixelBuffer> {
    let params = params.clamped();
    let mask = grow(base, seed_x, seed_y, params.tolerance)?;
    let mask = smooth(&mask, params.smoothness);
    log::debug!(
        "Wand at ({}, {}) selected {} pixels (tolerance {}, smoothness {})",
        seed_x,
        seed_y,
        mask.count(),
        params.tolerance,
        params.smoothness
    );
    composite(base, &mask, params.opacity)
}

/// A self-contained live-update run, tagged with the generation that
/// requested it so stale results can be recognised.
#[derive(Debug, Clone)]
pub struct PipelineJob {
    pub generation: u64,
    pub base: BufferRef,
    pub seed: (u32, u32),
    pub params: SelectionParams,
}

/// Result of a [`PipelineJob`]
#[derive(Debug)]
pub struct PipelineOutput {
    pub generation: u64,
    pub result: EditResult<PixelBuffer>,
}

impl PipelineJob {
    pub fn run(&self) -> PipelineOutput {
        PipelineOutput {
            generation: self.generation,
            result: erase_region(&self.base, self.seed.0, self.seed.1, &self.params),
        }
    }
}
