use std::{error::Error, fmt, str::FromStr};

use serde::Deserialize;

/// Delimiter separating the variant, x and y fields of a placement string.
const FIELD_DELIMITER: char = ':';

/// Defender the adapter places before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub(crate) struct PlacementOrder {
    /// Catalog identifier of the defender variant.
    pub(crate) variant: u32,
    /// World-space x coordinate.
    pub(crate) x: f32,
    /// World-space y coordinate.
    pub(crate) y: f32,
}

impl FromStr for PlacementOrder {
    type Err = PlacementParseError;

    /// Parses the `variant:x:y` form accepted by `--place`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PlacementParseError::Empty);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let variant = parts.next().ok_or(PlacementParseError::Empty)?;
        let x = parts.next().ok_or(PlacementParseError::MissingX)?;
        let y = parts.next().ok_or(PlacementParseError::MissingY)?;
        if parts.next().is_some() {
            return Err(PlacementParseError::TrailingFields(trimmed.to_owned()));
        }

        let variant = variant
            .trim()
            .parse::<u32>()
            .map_err(|_| PlacementParseError::InvalidVariant(variant.to_owned()))?;

        Ok(Self {
            variant,
            x: parse_coordinate(x)?,
            y: parse_coordinate(y)?,
        })
    }
}

/// Errors that can occur while parsing placement strings.
#[derive(Debug, PartialEq)]
pub(crate) enum PlacementParseError {
    /// The provided string was empty or contained only whitespace.
    Empty,
    /// The string did not contain an x coordinate.
    MissingX,
    /// The string did not contain a y coordinate.
    MissingY,
    /// The string carried more than three fields.
    TrailingFields(String),
    /// The variant field is not an unsigned integer.
    InvalidVariant(String),
    /// A coordinate field is not a finite number.
    InvalidCoordinate(String),
}

impl fmt::Display for PlacementParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "placement was empty"),
            Self::MissingX => write!(f, "placement is missing the x coordinate"),
            Self::MissingY => write!(f, "placement is missing the y coordinate"),
            Self::TrailingFields(value) => {
                write!(f, "placement '{value}' has more than three fields")
            }
            Self::InvalidVariant(variant) => {
                write!(f, "could not parse defender variant '{variant}'")
            }
            Self::InvalidCoordinate(coordinate) => {
                write!(f, "could not parse coordinate '{coordinate}'")
            }
        }
    }
}

impl Error for PlacementParseError {}

fn parse_coordinate(value: &str) -> Result<f32, PlacementParseError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| PlacementParseError::InvalidCoordinate(value.to_owned()))
}
