use arena_core::ArenaConfig;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CODE_DOMAIN: &str = "arena";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded payload.
pub(crate) const CODE_HEADER: &str = "arena:v1";
const FIELD_DELIMITER: char = ':';

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    seed: u64,
    config: ArenaConfig,
}

/// Errors raised while encoding or decoding layout codes.
#[derive(Debug, Error)]
pub(crate) enum LayoutCodeError {
    /// The provided string was empty or whitespace.
    #[error("layout code was empty")]
    Empty,
    /// A colon separated field was missing.
    #[error("layout code is missing the {0}")]
    MissingField(&'static str),
    /// The code belongs to another domain.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The code uses an unknown format version.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The `<width>x<depth>` field could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The dimensions field disagrees with the embedded configuration.
    #[error("code declares a {declared} grid but its configuration is {embedded}")]
    DimensionMismatch {
        /// Dimensions written in the code header.
        declared: String,
        /// Dimensions found in the payload.
        embedded: String,
    },
    /// The payload was not valid base64.
    #[error("could not decode layout payload: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The payload JSON could not be produced or parsed.
    #[error("could not process layout payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encodes the configuration into a single-line replay code.
///
/// The seed is written alongside the configuration so the code always
/// regenerates the same arena, even when random seeding was requested.
pub(crate) fn encode(config: &ArenaConfig) -> Result<String, LayoutCodeError> {
    let mut pinned = config.clone();
    pinned.use_random_seed = false;
    let payload = Payload {
        seed: pinned.seed,
        config: pinned,
    };
    let json = serde_json::to_vec(&payload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{CODE_HEADER}:{}x{}:{encoded}",
        config.grid.width, config.grid.depth
    ))
}

/// Decodes a replay code back into a pinned configuration.
pub(crate) fn decode(value: &str) -> Result<ArenaConfig, LayoutCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutCodeError::Empty);
    }

    let mut parts = trimmed.splitn(4, FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutCodeError::MissingField("prefix"))?;
    let version = parts
        .next()
        .ok_or(LayoutCodeError::MissingField("version"))?;
    let dimensions = parts
        .next()
        .ok_or(LayoutCodeError::MissingField("grid dimensions"))?;
    let payload = parts
        .next()
        .ok_or(LayoutCodeError::MissingField("payload"))?;

    if domain != CODE_DOMAIN {
        return Err(LayoutCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != CODE_VERSION {
        return Err(LayoutCodeError::UnsupportedVersion(version.to_owned()));
    }

    let (width, depth) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let decoded: Payload = serde_json::from_slice(&bytes)?;

    let mut config = decoded.config;
    if config.grid.width != width || config.grid.depth != depth {
        return Err(LayoutCodeError::DimensionMismatch {
            declared: format!("{width}x{depth}"),
            embedded: format!("{}x{}", config.grid.width, config.grid.depth),
        });
    }
    config.seed = decoded.seed;
    config.use_random_seed = false;
    Ok(config)
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutCodeError> {
    let invalid = || LayoutCodeError::InvalidDimensions(dimensions.to_owned());
    let (width, depth) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let depth = depth.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || depth == 0 {
        return Err(invalid());
    }

    Ok((width, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_system_bootstrap::Bootstrap;

    #[test]
    fn code_carries_header_and_dimensions() {
        let mut config = ArenaConfig::default();
        config.grid.width = 64;
        config.grid.depth = 80;

        let code = encode(&config).expect("config encodes");

        assert!(code.starts_with(&format!("{CODE_HEADER}:64x80:")));
    }

    #[test]
    fn decoded_code_regenerates_the_same_arena() {
        let original = Bootstrap.generate(&ArenaConfig {
            use_random_seed: true,
            ..ArenaConfig::default()
        });

        let code = encode(original.config()).expect("config encodes");
        let config = decode(&code).expect("code decodes");
        let replayed = Bootstrap.generate(&config);

        assert_eq!(replayed.seed(), original.seed());
        assert_eq!(replayed, original);
    }

    #[test]
    fn random_seed_flag_is_cleared() {
        let config = ArenaConfig {
            seed: 99,
            use_random_seed: true,
            ..ArenaConfig::default()
        };

        let decoded = decode(&encode(&config).expect("config encodes")).expect("code decodes");

        assert!(!decoded.use_random_seed);
        assert_eq!(decoded.seed, 99);
    }

    #[test]
    fn rejects_foreign_prefix() {
        let error = decode("dungeon:v1:12x8:e30").expect_err("prefix is foreign");

        assert!(matches!(error, LayoutCodeError::InvalidPrefix(prefix) if prefix == "dungeon"));
    }

    #[test]
    fn rejects_unknown_version() {
        let error = decode("arena:v9:12x8:e30").expect_err("version is unknown");

        assert!(matches!(error, LayoutCodeError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let error = decode("arena:v1:0x8:e30").expect_err("width is zero");

        assert!(matches!(error, LayoutCodeError::InvalidDimensions(_)));
    }

    #[test]
    fn rejects_truncated_code() {
        assert!(matches!(decode("   "), Err(LayoutCodeError::Empty)));
        assert!(matches!(
            decode("arena:v1"),
            Err(LayoutCodeError::MissingField("grid dimensions"))
        ));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let code = encode(&ArenaConfig::default()).expect("config encodes");
        let tampered = code.replacen(":96x96:", ":64x96:", 1);

        let error = decode(&tampered).expect_err("header disagrees with payload");

        assert!(matches!(error, LayoutCodeError::DimensionMismatch { .. }));
    }
}
