use std::fmt;

use percent_encoding::percent_decode_str;
use tracing::debug;

/// Longest return path (in characters, after decoding) that will be accepted.
pub const MAX_RETURN_URL_LEN: usize = 2048;

/// Reasons percent-decoding can fail.
///
/// These never reach callers of [`sanitize_return_url`]: a value that cannot
/// be decoded is validated in its raw form instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed percent escape at byte {position}")]
    MalformedEscape { position: usize },

    #[error("Decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Why a candidate was refused. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum Rejection {
    #[error("empty")]
    Empty,

    #[error("not a relative path")]
    NotRelative,

    #[error("protocol-relative")]
    ProtocolRelative,

    #[error("contains backslash or line break")]
    IllegalCharacter,

    #[error("longer than {} characters", MAX_RETURN_URL_LEN)]
    TooLong,
}

/// A relative path that passed return-URL validation.
///
/// Always begins with a single `/`, contains no `\`, `\r` or `\n`, and is at
/// most [`MAX_RETURN_URL_LEN`] characters long. The only way to build one is
/// [`ReturnPath::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReturnPath(String);

impl ReturnPath {
    /// Validate an untrusted candidate. `None` means "use a safe default".
    pub fn parse(candidate: Option<&str>) -> Option<Self> {
        let trimmed = candidate.map(trim).unwrap_or_default();
        if trimmed.is_empty() {
            debug!(reason = %Rejection::Empty, "Rejected return URL");
            return None;
        }

        let value = match decode(trimmed) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(error = %e, "Return URL not decodable, validating raw value");
                trimmed.to_string()
            }
        };

        match check_shape(&value) {
            Ok(()) => Some(Self(value)),
            Err(reason) => {
                debug!(%reason, candidate = trimmed, "Rejected return URL");
                None
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReturnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReturnPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sanitizes a caller-supplied return URL.
///
/// Returns the normalized relative path, or `None` when the value must not
/// be used as a redirect target. The caller decides what the fallback is.
///
/// # Examples
///
/// ```
/// use landing_edge::sanitize_return_url;
///
/// assert_eq!(sanitize_return_url(Some("/a%20b")).as_deref(), Some("/a b"));
/// assert_eq!(sanitize_return_url(Some("//evil.com/phish")), None);
/// assert_eq!(sanitize_return_url(None), None);
/// ```
pub fn sanitize_return_url(candidate: Option<&str>) -> Option<String> {
    ReturnPath::parse(candidate).map(ReturnPath::into_string)
}

/// Sanitizes `candidate`, falling back to `default` when it is rejected.
pub fn resolve_return_url(candidate: Option<&str>, default: &str) -> String {
    sanitize_return_url(candidate).unwrap_or_else(|| default.to_string())
}

/// Strip surrounding whitespace, including a stray byte-order mark.
fn trim(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Strict percent-decoding.
///
/// Unlike `percent_decode_str` on its own, a `%` that is not followed by two
/// hex digits is an error rather than a literal.
fn decode(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !well_formed {
                return Err(DecodeError::MalformedEscape { position: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

fn check_shape(value: &str) -> Result<(), Rejection> {
    if !value.starts_with('/') {
        return Err(Rejection::NotRelative);
    }

    if value.starts_with("//") {
        return Err(Rejection::ProtocolRelative);
    }

    if value.contains(['\\', '\r', '\n']) {
        return Err(Rejection::IllegalCharacter);
    }

    if value.chars().count() > MAX_RETURN_URL_LEN {
        return Err(Rejection::TooLong);
    }

    Ok(())
}
