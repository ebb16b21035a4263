// src/bench/placement/mod.rs
//! Placement of instances for a generation request.

pub mod grid;
