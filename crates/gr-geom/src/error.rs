//! `gr-geom`-local error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    #[error("projection error: {0}")]
    Projection(String),

    #[error("geometry cleaning error: {0}")]
    Clean(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GeomResult<T> = Result<T, GeomError>;
