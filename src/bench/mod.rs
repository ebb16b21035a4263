pub mod batching;
pub mod core;
pub mod material;
pub mod placement;
pub mod plugin;
pub mod session;
pub mod settings;

pub use plugin::BenchPlugin;
