use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geotag::GeoTag;

/// A resolved position in signed decimal degrees, WGS84-like.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Why a report could not be placed on the map. These abort the submission
/// before any hazard is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no GPS data found; enable location or upload a geo-tagged photo")]
    NoLocationAvailable,
    #[error("invalid lat/lng provided")]
    InvalidCoordinate,
}

/// Resolves the authoritative coordinate for a report: the photo's geotag
/// when present, otherwise the client-supplied fallback pair.
///
/// Malformed or absent metadata is not an error by itself; it just routes
/// the report onto the fallback path.
pub fn resolve(
    image: &[u8],
    fallback_lat: Option<&str>,
    fallback_lng: Option<&str>,
) -> Result<Coordinate, ResolveError> {
    if let Some(tag) = GeoTag::from_bytes(image) {
        let (lat, lng) = tag.decimal_degrees();
        log::debug!("geotag resolved to ({lat}, {lng})");
        return Ok(Coordinate { lat, lng });
    }

    match (fallback_lat, fallback_lng) {
        (Some(lat), Some(lng)) => {
            let lat = lat.trim().parse::<f64>();
            let lng = lng.trim().parse::<f64>();
            match (lat, lng) {
                (Ok(lat), Ok(lng)) => {
                    log::debug!("no geotag, using client fallback ({lat}, {lng})");
                    Ok(Coordinate { lat, lng })
                }
                _ => Err(ResolveError::InvalidCoordinate),
            }
        }
        _ => Err(ResolveError::NoLocationAvailable),
    }
}
