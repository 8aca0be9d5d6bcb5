// One sampler per metric category. Each owns only its own counter state.

pub mod disk;
pub mod gpu;
pub mod memory;
pub mod network;
