//! Per-pixel color transforms applied to straight RGBA8 buffers.

pub mod pixel;
