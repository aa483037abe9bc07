use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::domain::validation::ValidationError;
use crate::domain::value::{ApiKey, TemplateId, TemplateValue};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors returned while parsing a provider source string.
pub enum ConfigError {
    /// The source has no `?` or an empty address before it.
    #[error("invalid source")]
    InvalidSource,

    /// The query part is not valid `application/x-www-form-urlencoded` text.
    #[error("{reason}")]
    MalformedQuery { reason: String },

    /// A required query key is absent or empty.
    #[error("missing required field: {field}")]
    Missing { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Provider options parsed from `address?key=..&tpl_id=..&tpl_value=..`.
///
/// Invariant: every field is non-empty.
pub struct Options {
    address: String,
    key: ApiKey,
    tpl_id: TemplateId,
    tpl_value: TemplateValue,
}

impl Options {
    /// Build options from already-validated parts.
    pub fn new(
        address: impl Into<String>,
        key: ApiKey,
        tpl_id: TemplateId,
        tpl_value: TemplateValue,
    ) -> Result<Self, ConfigError> {
        let address = address.into();
        if address.is_empty() {
            return Err(ConfigError::InvalidSource);
        }
        Ok(Self {
            address,
            key,
            tpl_id,
            tpl_value,
        })
    }

    /// Parse a source string of the form `address?k1=v1&k2=v2&...`.
    ///
    /// Required keys are checked in the order `key`, `tpl_id`, `tpl_value`
    /// and the first missing one is reported. Unknown keys are ignored.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let (address, query) = match source.split_once('?') {
            Some((address, query)) if !address.is_empty() => (address, query),
            _ => return Err(ConfigError::InvalidSource),
        };

        let pairs = parse_query(query)?;

        Ok(Self {
            address: address.to_owned(),
            key: required(&pairs, ApiKey::FIELD, |v| ApiKey::new(v))?,
            tpl_id: required(&pairs, TemplateId::FIELD, |v| TemplateId::new(v))?,
            tpl_value: required(&pairs, TemplateValue::FIELD, |v| {
                TemplateValue::new(v)
            })?,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn key(&self) -> &ApiKey {
        &self.key
    }

    pub fn tpl_id(&self) -> &TemplateId {
        &self.tpl_id
    }

    pub fn tpl_value(&self) -> &TemplateValue {
        &self.tpl_value
    }
}

impl FromStr for Options {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Options {
    /// Formats the options back into a source string accepted by [`Options::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(ApiKey::FIELD, self.key.as_str())
            .append_pair(TemplateId::FIELD, self.tpl_id.as_str())
            .append_pair(TemplateValue::FIELD, self.tpl_value.as_str())
            .finish();
        write!(f, "{}?{}", self.address, query)
    }
}

fn required<T>(
    pairs: &[(String, String)],
    field: &'static str,
    ctor: fn(String) -> Result<T, ValidationError>,
) -> Result<T, ConfigError> {
    let value = pairs
        .iter()
        .find(|(k, _)| k == field)
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    ctor(value).map_err(|_| ConfigError::Missing { field })
}

/// Decode a query string, rejecting bad percent escapes and `;` separators.
fn parse_query(query: &str) -> Result<Vec<(String, String)>, ConfigError> {
    for segment in query.split('&') {
        if segment.contains(';') {
            return Err(ConfigError::MalformedQuery {
                reason: "invalid semicolon separator in query".to_owned(),
            });
        }
        check_escapes(segment)?;
    }

    Ok(form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

fn check_escapes(segment: &str) -> Result<(), ConfigError> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let valid = bytes.len() > i + 2
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit();
        if !valid {
            let end = (i + 3).min(bytes.len());
            let escape = String::from_utf8_lossy(&bytes[i..end]);
            return Err(ConfigError::MalformedQuery {
                reason: format!("invalid URL escape {escape:?}"),
            });
        }
        i += 3;
    }
    Ok(())
}
