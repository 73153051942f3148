use thiserror::Error;

/// Errors produced while generating or writing a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    /// Width or height is not usable for a 24-bit bitmap.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: i64,
        height: i64,
        reason: &'static str,
    },

    /// The destination could not be created, written, flushed or moved into place.
    #[error("I/O failure while {step}: {source}")]
    Io {
        step: String,
        #[source]
        source: std::io::Error,
    },
}

impl TextureError {
    /// Adapter for `map_err` that tags an I/O error with the step that failed.
    pub fn io(step: impl Into<String>) -> impl FnOnce(std::io::Error) -> Self {
        let step = step.into();
        move |source| Self::Io { step, source }
    }
}
