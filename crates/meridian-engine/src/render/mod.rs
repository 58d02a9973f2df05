//! Frame submission.
//!
//! A frame is: acquire a drawable, record one render pass that clears and
//! issues a single indexed draw, submit, present.

mod ctx;
mod frame;
mod target;

pub use ctx::RenderCtx;
pub use frame::submit_frame;
pub use target::DrawableSource;
