use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use raster_life_core::{GeoPoint, GeoReference, GridSize, RasterPayload, Srid};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "life";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded raster payload.
pub(crate) const SNAPSHOT_HEADER: &str = "life:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a raster payload into a single-line string representation.
pub(crate) fn encode(payload: &RasterPayload) -> String {
    let serializable = SerializableRaster {
        origin_x: payload.geo.origin().x(),
        origin_y: payload.geo.origin().y(),
        cell_width: payload.geo.cell_width(),
        cell_height: payload.geo.cell_height(),
        srid: payload.geo.srid().get(),
        values: payload.values.clone(),
    };
    let json = serde_json::to_vec(&serializable).expect("raster serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
        payload.size.columns(),
        payload.size.rows()
    )
}

/// Decodes a raster payload from its single-line string representation.
pub(crate) fn decode(value: &str) -> Result<RasterPayload, RasterDecodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RasterDecodeError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(RasterDecodeError::MissingPrefix)?;
    let version = parts.next().ok_or(RasterDecodeError::MissingVersion)?;
    let dimensions = parts.next().ok_or(RasterDecodeError::MissingDimensions)?;
    let payload = parts.next().ok_or(RasterDecodeError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(RasterDecodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(RasterDecodeError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(RasterDecodeError::InvalidEncoding)?;
    let decoded: SerializableRaster =
        serde_json::from_slice(&bytes).map_err(RasterDecodeError::InvalidPayload)?;

    let size = GridSize::new(columns, rows);
    if decoded.values.len() != size.cell_count() {
        return Err(RasterDecodeError::ValueCountMismatch {
            expected: size.cell_count(),
            found: decoded.values.len(),
        });
    }

    Ok(RasterPayload {
        values: decoded.values,
        size,
        geo: GeoReference::new(
            GeoPoint::new(decoded.origin_x, decoded.origin_y),
            decoded.cell_width,
            decoded.cell_height,
            Srid::new(decoded.srid),
        ),
    })
}

fn parse_dimensions(value: &str) -> Result<(u32, u32), RasterDecodeError> {
    let mut parts = value.split('x');
    let columns = parts
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(|| RasterDecodeError::InvalidDimensions(value.to_owned()))?;
    let rows = parts
        .next()
        .and_then(|part| part.parse::<u32>().ok())
        .ok_or_else(|| RasterDecodeError::InvalidDimensions(value.to_owned()))?;
    if parts.next().is_some() {
        return Err(RasterDecodeError::InvalidDimensions(value.to_owned()));
    }
    Ok((columns, rows))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableRaster {
    origin_x: f64,
    origin_y: f64,
    cell_width: f64,
    cell_height: f64,
    srid: u32,
    values: Vec<f64>,
}

/// Errors that can occur while decoding stored raster lines.
#[derive(Debug)]
pub(crate) enum RasterDecodeError {
    /// The stored file was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded raster.
    MissingPrefix,
    /// The encoded raster did not contain a version segment.
    MissingVersion,
    /// The encoded raster did not include grid dimensions.
    MissingDimensions,
    /// The encoded raster did not include the payload segment.
    MissingPayload,
    /// The encoded raster used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded raster used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded raster.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The value array does not match the declared grid dimensions.
    ValueCountMismatch {
        /// Number of values the declared dimensions require.
        expected: usize,
        /// Number of values actually present.
        found: usize,
    },
}

impl fmt::Display for RasterDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "stored raster was empty"),
            Self::MissingPrefix => write!(f, "raster line is missing the prefix"),
            Self::MissingVersion => write!(f, "raster line is missing the version"),
            Self::MissingDimensions => write!(f, "raster line is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "raster line is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "raster prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "raster version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode raster payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse raster payload: {error}")
            }
            Self::ValueCountMismatch { expected, found } => {
                write!(f, "raster holds {found} values, dimensions require {expected}")
            }
        }
    }
}

impl Error for RasterDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
