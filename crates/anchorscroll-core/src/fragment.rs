#![forbid(unsafe_code)]

//! `href` classification and fragment decoding.
//!
//! Decoding follows `decodeURIComponent`: every `%` must start a two-digit
//! hex escape and the decoded bytes must be valid UTF-8. Anything else is a
//! [`FragmentDecodeError`], and [`TargetId::resolve`] falls back to the raw
//! text so a malformed link still gets a lookup.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::config::AnchorScrollConfig;

/// Why a fragment could not be percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentDecodeError {
    /// `%` not followed by two hex digits.
    #[error("malformed percent escape at byte {offset}")]
    MalformedEscape { offset: usize },
    /// Escapes decode to bytes that are not UTF-8.
    #[error("percent escapes do not decode to valid UTF-8")]
    InvalidUtf8,
}

/// Classification of a raw `href` attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefClass<'a> {
    /// Empty, `#`, `#!`, or another configured placeholder.
    Placeholder,
    /// Does not start with `#`.
    NotFragment,
    /// Text after the leading `#`, still encoded.
    Fragment(&'a str),
}

impl<'a> HrefClass<'a> {
    /// Classify `href` against the configured placeholders.
    #[must_use]
    pub fn classify(href: &'a str, config: &AnchorScrollConfig) -> Self {
        if config.is_placeholder(href) {
            return Self::Placeholder;
        }
        match href.strip_prefix('#') {
            Some(raw) => Self::Fragment(raw),
            None => Self::NotFragment,
        }
    }
}

/// Decode `raw` with `decodeURIComponent` semantics.
pub fn decode_fragment(raw: &str) -> Result<String, FragmentDecodeError> {
    let bytes = raw.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let well_formed = bytes
                .get(idx + 1..idx + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return Err(FragmentDecodeError::MalformedEscape { offset: idx });
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| FragmentDecodeError::InvalidUtf8)
}

/// Result of the decode attempt recorded alongside a [`TargetId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecodeOutcome {
    Decoded,
    FellBackToRaw { error: FragmentDecodeError },
}

/// Identifier extracted from an anchor's fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetId {
    /// Text after `#` exactly as written in the `href`.
    pub raw: String,
    /// Identifier used for the element lookup and the new URL fragment.
    pub resolved: String,
    pub decode: DecodeOutcome,
}

impl TargetId {
    /// Decode `raw`, keeping it verbatim when decoding fails.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        match decode_fragment(raw) {
            Ok(decoded) => Self {
                raw: raw.to_string(),
                resolved: decoded,
                decode: DecodeOutcome::Decoded,
            },
            Err(error) => Self {
                raw: raw.to_string(),
                resolved: raw.to_string(),
                decode: DecodeOutcome::FellBackToRaw { error },
            },
        }
    }

    /// Key for `getElementById` and the history fragment.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        &self.resolved
    }

    #[must_use]
    pub fn fell_back_to_raw(&self) -> bool {
        matches!(self.decode, DecodeOutcome::FellBackToRaw { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeOutcome, FragmentDecodeError, HrefClass, TargetId, decode_fragment};
    use crate::config::AnchorScrollConfig;
    use proptest::prelude::*;

    #[test]
    fn classify_separates_placeholders_fragments_and_others() {
        let config = AnchorScrollConfig::default();
        assert_eq!(HrefClass::classify("", &config), HrefClass::Placeholder);
        assert_eq!(HrefClass::classify("#", &config), HrefClass::Placeholder);
        assert_eq!(HrefClass::classify("#!", &config), HrefClass::Placeholder);
        assert_eq!(
            HrefClass::classify("#section1", &config),
            HrefClass::Fragment("section1")
        );
        assert_eq!(
            HrefClass::classify("/docs#section1", &config),
            HrefClass::NotFragment
        );
    }

    #[test]
    fn plain_text_decodes_to_itself() {
        assert_eq!(decode_fragment("section1").as_deref(), Ok("section1"));
        assert_eq!(decode_fragment("").as_deref(), Ok(""));
    }

    #[test]
    fn escapes_decode_like_decode_uri_component() {
        assert_eq!(decode_fragment("se%63tion1").as_deref(), Ok("section1"));
        assert_eq!(decode_fragment("a%20b").as_deref(), Ok("a b"));
        // Reserved characters are decoded too.
        assert_eq!(decode_fragment("a%2Fb%23c").as_deref(), Ok("a/b#c"));
        assert_eq!(decode_fragment("caf%C3%A9").as_deref(), Ok("café"));
        // `+` is not a space in URI components.
        assert_eq!(decode_fragment("a+b").as_deref(), Ok("a+b"));
    }

    #[test]
    fn malformed_escapes_are_rejected_with_offset() {
        assert_eq!(
            decode_fragment("se%ztion1"),
            Err(FragmentDecodeError::MalformedEscape { offset: 2 })
        );
        assert_eq!(
            decode_fragment("trailing%"),
            Err(FragmentDecodeError::MalformedEscape { offset: 8 })
        );
        assert_eq!(
            decode_fragment("short%4"),
            Err(FragmentDecodeError::MalformedEscape { offset: 5 })
        );
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(decode_fragment("%FF"), Err(FragmentDecodeError::InvalidUtf8));
        // Lone continuation byte.
        assert_eq!(decode_fragment("a%80b"), Err(FragmentDecodeError::InvalidUtf8));
        // Truncated two-byte sequence.
        assert_eq!(decode_fragment("%C3"), Err(FragmentDecodeError::InvalidUtf8));
    }

    #[test]
    fn resolve_falls_back_to_raw_on_malformed_input() {
        let id = TargetId::resolve("se%ztion1");
        assert_eq!(id.lookup_key(), "se%ztion1");
        assert!(id.fell_back_to_raw());
        assert_eq!(
            id.decode,
            DecodeOutcome::FellBackToRaw {
                error: FragmentDecodeError::MalformedEscape { offset: 2 }
            }
        );

        let id = TargetId::resolve("se%63tion1");
        assert_eq!(id.raw, "se%63tion1");
        assert_eq!(id.lookup_key(), "section1");
        assert!(!id.fell_back_to_raw());
    }

    fn encode_component(input: &str) -> String {
        use std::fmt::Write as _;
        let mut out = String::with_capacity(input.len() * 3);
        for byte in input.bytes() {
            let _ = write!(out, "%{byte:02X}");
        }
        out
    }

    proptest! {
        #[test]
        fn decode_never_panics(raw in ".{0,48}") {
            let _ = decode_fragment(&raw);
            let id = TargetId::resolve(&raw);
            prop_assert!(id.fell_back_to_raw() || decode_fragment(&raw).is_ok());
        }

        #[test]
        fn fully_encoded_strings_decode_back(original in "\\PC{0,24}") {
            let encoded = encode_component(&original);
            prop_assert_eq!(decode_fragment(&encoded), Ok(original));
        }
    }
}
