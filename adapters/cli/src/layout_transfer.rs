use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use roomsim_core::RoomLayout;

const TRANSFER_DOMAIN: &str = "room";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const TRANSFER_HEADER: &str = "room:v1";
/// Delimiter used to separate the prefix, room dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a layout into a single-line string suitable for pasting between tools.
pub(crate) fn encode(layout: &RoomLayout) -> Result<String, LayoutTransferError> {
    let json = serde_json::to_vec(layout).map_err(LayoutTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        layout.columns, layout.rows
    ))
}

/// Reports whether the text looks like a transfer string rather than JSON.
pub(crate) fn is_transfer_string(value: &str) -> bool {
    value
        .trim_start()
        .starts_with(&format!("{TRANSFER_DOMAIN}{FIELD_DELIMITER}"))
}

/// Decodes a layout from its transfer string.
pub(crate) fn decode(value: &str) -> Result<RoomLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let layout: RoomLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    if (layout.columns, layout.rows) != (columns, rows) {
        return Err(LayoutTransferError::DimensionMismatch {
            header: (columns, rows),
            payload: (layout.columns, layout.rows),
        });
    }
    Ok(layout)
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The room dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The room dimensions could not be parsed.
    InvalidDimensions(String),
    /// The header dimensions disagree with the layout inside the payload.
    DimensionMismatch {
        /// Columns and rows announced by the header.
        header: (u32, u32),
        /// Columns and rows stored in the payload.
        payload: (u32, u32),
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The layout could not be serialised.
    Serialize(serde_json::Error),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the room dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse room dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { header, payload } => write!(
                f,
                "header announces a {}x{} room but the payload holds {}x{}",
                header.0, header.1, payload.0, payload.1
            ),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse layout payload: {error}")
            }
            Self::Serialize(error) => write!(f, "could not serialise layout: {error}"),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) | Self::Serialize(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsim_core::{EngineConfig, Square};
    use roomsim_world::{edit, Room};

    fn sample_layout() -> RoomLayout {
        let mut room = Room::new(EngineConfig {
            columns: 6,
            rows: 4,
            ..EngineConfig::new()
        });
        let _ = edit::set_scroll_text_at_square(&mut room, Square::new(2, 1), "left: tar")
            .expect("empty square");
        room.to_layout()
    }

    #[test]
    fn transfer_strings_carry_the_whole_layout() {
        let layout = sample_layout();

        let encoded = encode(&layout).expect("layout serialises");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:6x4:")));
        assert!(is_transfer_string(&encoded));

        let decoded = decode(&encoded).expect("transfer string decodes");
        assert_eq!(decoded, layout);
    }

    #[test]
    fn rejects_foreign_prefixes() {
        let error = decode("maze:v1:6x4:e30").expect_err("prefix is not ours");
        assert!(matches!(error, LayoutTransferError::InvalidPrefix(prefix) if prefix == "maze"));
        assert!(!is_transfer_string("{\"columns\": 6}"));
    }

    #[test]
    fn rejects_headers_that_disagree_with_the_payload() {
        let encoded = encode(&sample_layout()).expect("layout serialises");
        let forged = encoded.replacen(":6x4:", ":7x4:", 1);

        let error = decode(&forged).expect_err("header was edited");
        assert!(matches!(
            error,
            LayoutTransferError::DimensionMismatch {
                header: (7, 4),
                payload: (6, 4),
            }
        ));
    }

    #[test]
    fn rejects_zero_sized_rooms() {
        let error = decode("room:v1:0x4:e30").expect_err("zero columns");
        assert!(matches!(error, LayoutTransferError::InvalidDimensions(_)));
    }
}
