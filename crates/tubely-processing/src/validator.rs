//! Declared content type validation against an immutable allow-list.

/// Validation errors for uploaded media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported media type: {media_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("Malformed content type: {0}")]
    MalformedMediaType(String),

    #[error("Missing content type")]
    MissingContentType,
}

const TSPECIALS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=',
];

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii() && !c.is_ascii_control() && c != ' ' && !TSPECIALS.contains(&c))
}

/// Split on `;` outside of quoted strings. `None` when a quote is left open.
fn split_params(s: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if quoted {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

/// A quoted-string whose only unescaped quote after the opening one is the last char.
fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('"') else {
        return false;
    };

    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return i + 1 == inner.len(),
            _ => {}
        }
    }
    false
}

/// Parse a declared content type into its lowercased `type/subtype`, dropping parameters.
///
/// `"Video/MP4; codecs=avc1"` becomes `"video/mp4"`. Parameters must be `name=value`
/// where the value is a token or a quoted string, which may itself contain `;`.
pub fn parse_media_type(declared: &str) -> Result<String, ValidationError> {
    let malformed = || ValidationError::MalformedMediaType(declared.to_string());

    let segments = split_params(declared).ok_or_else(malformed)?;
    let mut segments = segments.into_iter();
    let essence = segments.next().unwrap_or_default().trim();

    let (main, sub) = essence.split_once('/').ok_or_else(malformed)?;
    if !is_token(main) || !is_token(sub) {
        return Err(malformed());
    }

    for param in segments {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, value) = param.split_once('=').ok_or_else(malformed)?;
        let value = value.trim();
        if !is_token(name.trim()) || !(is_token(value) || is_quoted_string(value)) {
            return Err(malformed());
        }
    }

    Ok(essence.to_ascii_lowercase())
}

/// Accepts declared content types from a fixed set of media types.
#[derive(Debug, Clone)]
pub struct MediaTypeValidator {
    allowed: Vec<String>,
}

impl MediaTypeValidator {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Image types accepted for thumbnails.
    pub fn thumbnails() -> Self {
        Self::new(["image/jpeg", "image/png"])
    }

    /// Types accepted on the video upload path.
    pub fn videos() -> Self {
        Self::new(["video/mp4"])
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Validate a declared content type, returning the bare media type on success.
    ///
    /// Malformed values are reported as `UnsupportedMediaType` as well.
    pub fn validate(&self, declared: &str) -> Result<String, ValidationError> {
        let unsupported = || ValidationError::UnsupportedMediaType {
            media_type: declared.to_string(),
            allowed: self.allowed.clone(),
        };

        let media_type = parse_media_type(declared).map_err(|_| unsupported())?;

        if !self.allowed.iter().any(|t| t == &media_type) {
            return Err(unsupported());
        }

        Ok(media_type)
    }
}
