//! Long-lived render state.
//!
//! A scene owns the mesh and pipeline built once at startup; frames borrow
//! them and only create the per-frame encoder and drawable.

mod sphere;

pub use sphere::SphereScene;
