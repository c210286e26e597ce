#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pathx_level::Level;

const TRANSFER_DOMAIN: &str = "pathx";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "pathx:v1";
/// Delimiter used to separate the prefix, graph dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the level into a single-line string suitable for clipboard
/// transfer between editors.
///
/// The graph dimensions (intersection and road counts) travel outside the
/// payload so a recipient can size up a level before decoding it.
pub(crate) fn encode(level: &Level) -> Result<String, LevelTransferError> {
    level
        .validate()
        .map_err(|_| LevelTransferError::InvalidLevel)?;
    let json =
        serde_json::to_vec(level).expect("level serialization to JSON never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        level.intersections().len(),
        level.roads().len(),
    ))
}

/// Decodes a level from the provided transfer string.
pub(crate) fn decode(value: &str) -> Result<Level, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (intersections, roads) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let level: Level =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    if level.intersections().len() != intersections || level.roads().len() != roads {
        return Err(LevelTransferError::DimensionMismatch {
            declared: (intersections, roads),
            actual: (level.intersections().len(), level.roads().len()),
        });
    }
    level
        .validate()
        .map_err(|_| LevelTransferError::InvalidLevel)?;

    Ok(level)
}

/// Errors that can occur while decoding level transfer strings.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded level.
    MissingPrefix,
    /// The encoded level did not contain a version segment.
    MissingVersion,
    /// The encoded level did not include graph dimensions.
    MissingDimensions,
    /// The encoded level did not include the payload segment.
    MissingPayload,
    /// The encoded level used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded level used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The graph dimensions could not be parsed from the encoded level.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The declared dimensions disagree with the decoded graph.
    DimensionMismatch {
        /// Intersection and road counts from the header.
        declared: (usize, usize),
        /// Intersection and road counts found in the payload.
        actual: (usize, usize),
    },
    /// The decoded level failed cross-reference validation.
    InvalidLevel,
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer payload was empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing the prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing the version"),
            Self::MissingDimensions => {
                write!(f, "transfer string is missing the graph dimensions")
            }
            Self::MissingPayload => write!(f, "transfer string is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "transfer prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "transfer version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse graph dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode transfer payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse transfer payload: {error}")
            }
            Self::DimensionMismatch { declared, actual } => write!(
                f,
                "declared {}x{} graph but payload holds {}x{}",
                declared.0, declared.1, actual.0, actual.1,
            ),
            Self::InvalidLevel => write!(f, "decoded level failed validation"),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(usize, usize), LevelTransferError> {
    let (intersections, roads) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let intersections = intersections
        .trim()
        .parse::<usize>()
        .map_err(|_| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let roads = roads
        .trim()
        .parse::<usize>()
        .map_err(|_| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;

    Ok((intersections, roads))
}
