//! Render pipeline construction.

mod descriptor;
mod state;

pub use descriptor::PipelineDescriptor;
pub use state::PipelineState;
