//! Color values used for clearing and for constant shader output.

pub mod color;

pub use color::Color;
