/// Convenience result type used across meme-canvas.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by the compositor, image sources, and the search proxy.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Invalid caller-provided data (colors, sizes, empty queries, missing image).
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image could not be loaded or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failures while drawing onto or reading back from a surface.
    #[error("render error: {0}")]
    Render(String),

    /// Failures talking to the photo search proxy or its upstream.
    #[error("search error: {0}")]
    Search(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MemeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MemeError::Search`] value.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Build a [`MemeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Message without the category prefix, suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Decode(m)
            | Self::Render(m)
            | Self::Search(m)
            | Self::Serde(m) => m.clone(),
            Self::Other(e) => format!("{e:#}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
