/// Convenience result type used across certstamp.
pub type CertstampResult<T> = Result<T, CertstampError>;

/// Top-level error taxonomy used by the rendering and export pipeline.
///
/// `Decode`, `Precondition` and `Archive` abort the operation they occur in. `Render` and
/// `Encode` are scoped to a single batch entry: the batch records them and moves on.
#[derive(thiserror::Error, Debug)]
pub enum CertstampError {
    /// Template image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Template has zero width or height.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// Operation invoked without its required inputs (no template, empty name list).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A raster surface could not be serialized to the requested format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid user-provided style or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font resolution or rasterization failed for one render.
    #[error("render error: {0}")]
    Render(String),

    /// The archive builder rejected a file or failed to finalize.
    #[error("archive error: {0}")]
    Archive(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CertstampError {
    /// Build a [`CertstampError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CertstampError::InvalidTemplate`] value.
    pub fn invalid_template(msg: impl Into<String>) -> Self {
        Self::InvalidTemplate(msg.into())
    }

    /// Build a [`CertstampError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`CertstampError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CertstampError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CertstampError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CertstampError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`CertstampError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors a batch records against one entry and continues past.
    pub fn is_entry_scoped(&self) -> bool {
        matches!(self, Self::Render(_) | Self::Encode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
