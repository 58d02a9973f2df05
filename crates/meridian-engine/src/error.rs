use thiserror::Error;

/// Errors produced while setting up or submitting GPU work.
///
/// Every stage of the renderer returns this type to its caller. Whether an
/// error terminates the program is decided by the host, see [`RenderError::is_fatal`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// No compatible adapter/device could be found.
    #[error("no compatible GPU device: {0}")]
    DeviceUnavailable(String),

    /// A long-lived GPU object (queue, buffer, texture, pipeline) could not be created.
    #[error("failed to create {what}: {reason}")]
    ResourceCreation { what: &'static str, reason: String },

    /// Shader source failed to parse or validate.
    #[error("shader compilation failed:\n{message}")]
    ShaderCompilation { message: String },

    /// A shader library has no entry point with the requested name.
    #[error("shader function `{name}` not found")]
    FunctionNotFound { name: String },

    /// A shader function was bound to the wrong pipeline stage.
    #[error("shader function `{name}` is not a {expected} function")]
    StageMismatch { name: String, expected: &'static str },

    /// Pipeline vertex layout or output format disagrees with the data it draws.
    #[error("pipeline layout mismatch: {0}")]
    LayoutMismatch(String),

    /// A per-frame resource (drawable, encoder) could not be obtained.
    #[error("frame resource unavailable: {0}")]
    FrameResourceUnavailable(String),

    /// The mesh does not contain the geometry a draw call needs.
    #[error("geometry absent: {0}")]
    GeometryAbsent(String),

    /// Geometry generator parameters were rejected.
    #[error("invalid geometry parameters: {0}")]
    InvalidGeometry(String),
}

impl RenderError {
    /// Returns `false` only for conditions that may clear up on a later frame.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::FrameResourceUnavailable(_))
    }

    pub(crate) fn resource(what: &'static str, reason: impl ToString) -> Self {
        RenderError::ResourceCreation {
            what,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
