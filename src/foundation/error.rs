/// Convenience result type used across wipeframe.
pub type WipeframeResult<T> = Result<T, WipeframeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WipeframeError {
    /// Invalid user-provided input or render parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while compositing or scheduling frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors from the encoding sink during capture or finalization.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WipeframeError {
    /// Build a [`WipeframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WipeframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WipeframeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
