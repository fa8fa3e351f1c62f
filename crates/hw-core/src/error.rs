use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid rows/cols or width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A `WIDTHxHEIGHT` string that could not be parsed.
    #[error("Taille de canvas illisible : {0} (attendu : LARGEURxHAUTEUR)")]
    CanvasSize(String),
}
