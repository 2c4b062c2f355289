//! The adaptive frame-fitting engine.
//!
//! Given a source's dimensions (after any bar crop) this module chooses the
//! output width within the allowed band, decides between bounded aspect
//! distortion and crop-after-uniform-scale, and composes the ordered filter
//! chain handed to the encoder.

pub mod filter;
pub mod scaling;
pub mod target;

pub use filter::{compose, FilterChain, FilterOp};
pub use scaling::{plan_scaling, ScalingMode, ScalingPlan};
pub use target::select_target;
