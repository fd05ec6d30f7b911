/// Convenience result alias used across the crate.
pub type RaceResult<T> = Result<T, RaceError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for data preparation, rendering and encoding.
pub enum RaceError {
    /// Invalid options or structurally invalid inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input data that cannot be loaded or interpreted.
    #[error("data error: {0}")]
    Data(String),

    /// Failures while rasterizing frames.
    #[error("render error: {0}")]
    Render(String),

    /// Failures while encoding frames into the output video.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RaceError {
    /// Build a [`RaceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RaceError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`RaceError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RaceError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
