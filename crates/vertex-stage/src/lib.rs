//! # Vertex Stage — Skinning and Point Sizing for the Pure-Color Pass
//!
//! A CPU implementation of the vertex program used to draw untextured,
//! unlit geometry (picking and solid-color passes). For every vertex it:
//!
//! 1. blends up to four bone transforms into an eye-space position
//!    ([`skinning`]), or applies the rigid model-view matrix;
//! 2. projects that position to clip space;
//! 3. sizes the vertex as a point sprite, attenuated by eye distance
//!    ([`point`]).
//!
//! The same inputs are packed for the GPU by [`uniforms`] and
//! [`vertex::SkinnedVertex`], so CPU and GPU results can be compared directly.
//!
//! Start with `use vertex_stage::prelude::*` and build a
//! [`VertexStage`](stage::VertexStage), or load one with
//! [`BatchConfig`](config::BatchConfig).

pub mod config;
pub mod error;
pub mod math;
pub mod point;
pub mod prelude;
pub mod skinning;
pub mod stage;
pub mod uniforms;
pub mod vertex;
