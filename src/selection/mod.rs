//! Region selection for the magic wand.
//!
//! - **Magic wand**: tolerance-bounded 4-connected flood fill from a seed pixel
//! - **Smoothing**: separable box blur over the mask, thresholded back to binary
//!
//! Both produce a [`Mask`], which the compositor then applies to a buffer.

pub mod magic_wand;
pub mod mask;
pub mod smooth;

pub use magic_wand::{grow, max_distance};
pub use mask::Mask;
pub use smooth::{smooth, smoothing_radius};
