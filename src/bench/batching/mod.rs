//! Bounded mesh batching.
//! The planner packs grid instances into batches that fit 16-bit indices;
//! `combine` bakes one planned batch into a single Mesh so a whole batch costs
//! one draw call.

pub mod combine;
pub mod planner;

pub use combine::combine_instances;
pub use planner::plan_batches;
