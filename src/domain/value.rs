use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway API credential (`key` in the source string, `apikey` on the wire).
///
/// Invariant: non-empty. `Debug` never prints the credential.
pub struct ApiKey(String);

impl ApiKey {
    /// Query key used in the configuration source (`key`).
    pub const FIELD: &'static str = "key";
    /// Form field name used by the gateway (`apikey`).
    pub const WIRE_FIELD: &'static str = "apikey";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the credential.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway template identifier (`tpl_id`).
///
/// Invariant: non-empty.
pub struct TemplateId(String);

impl TemplateId {
    /// Field name shared by the source string and the wire form (`tpl_id`).
    pub const FIELD: &'static str = "tpl_id";

    /// Create a validated [`TemplateId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the template id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Template fill content (`tpl_value`) with a `%s` placeholder for the code.
///
/// Invariant: non-empty. The value is kept exactly as configured.
pub struct TemplateValue(String);

impl TemplateValue {
    /// Field name shared by the source string and the wire form (`tpl_value`).
    pub const FIELD: &'static str = "tpl_value";

    /// Create a validated [`TemplateValue`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the unrendered template.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fill the template's `%s` placeholders with the verification code.
    ///
    /// With one placeholder the code is substituted directly. With two or
    /// more, the first receives a literal `%s` and the second receives the
    /// code, the way the gateway templates were historically rendered.
    /// `%%` renders as a literal `%`; any further placeholder or other verb
    /// is copied verbatim.
    pub fn render(&self, code: &str) -> String {
        let args = if self.placeholder_count() >= 2 {
            vec!["%s", code]
        } else {
            vec![code]
        };
        let mut args = args.into_iter();

        let mut out = String::with_capacity(self.0.len() + code.len());
        let mut chars = self.0.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => out.push('%'),
                Some('s') => match args.next() {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str("%s"),
                },
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }

        out
    }

    fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            if c == '%' && chars.next() == Some('s') {
                count += 1;
            }
        }
        count
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// The client sends whatever string it is given; use this type when callers
/// want numbers normalized before dispatch.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Form field name used by the gateway (`mobile`).
    pub const FIELD: &'static str = "mobile";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.e164
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret-token").unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains("secret-token"));
        assert_eq!(key.as_str(), "secret-token");
    }

    #[test]
    fn empty_values_are_rejected_with_their_field() {
        assert_eq!(
            ApiKey::new("").unwrap_err(),
            ValidationError::Empty { field: "key" }
        );
        assert_eq!(
            TemplateId::new("").unwrap_err(),
            ValidationError::Empty { field: "tpl_id" }
        );
        assert_eq!(
            TemplateValue::new("").unwrap_err(),
            ValidationError::Empty { field: "tpl_value" }
        );
    }

    #[test]
    fn values_are_not_trimmed() {
        let value = TemplateValue::new(" #code#=%s ").unwrap();
        assert_eq!(value.as_str(), " #code#=%s ");
    }

    #[test]
    fn render_substitutes_first_placeholder() {
        let value = TemplateValue::new("#code#=%s").unwrap();
        assert_eq!(value.render("1234"), "#code#=1234");
    }

    #[test]
    fn render_with_two_placeholders_fills_the_second_with_the_code() {
        let value = TemplateValue::new("a %s b %s").unwrap();
        assert_eq!(value.render("1234"), "a %s b 1234");
    }

    #[test]
    fn render_copies_third_placeholder_verbatim() {
        let value = TemplateValue::new("%s-%s-%s").unwrap();
        assert_eq!(value.render("42"), "%s-42-%s");
    }

    #[test]
    fn render_escaped_percent_is_not_a_placeholder() {
        let value = TemplateValue::new("%%s then %s").unwrap();
        assert_eq!(value.render("5"), "%s then 5");
    }

    #[test]
    fn render_unescapes_percent_and_keeps_unknown_verbs() {
        let value = TemplateValue::new("100%% %d %s%").unwrap();
        assert_eq!(value.render("7"), "100% %d 7%");
    }

    #[test]
    fn render_without_placeholder_is_unchanged() {
        let value = TemplateValue::new("static text").unwrap();
        assert_eq!(value.render("9999"), "static text");
    }

    #[test]
    fn phone_number_normalizes_to_e164() {
        let p1 = PhoneNumber::parse(None, "+79251234567").unwrap();
        let p2 = PhoneNumber::parse(None, "+7 925 123-45-67").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p2.e164(), "+79251234567");
        assert_eq!(p2.raw(), "+7 925 123-45-67");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
        assert!(PhoneNumber::parse(None, "   ").is_err());
    }

    #[test]
    fn phone_number_uses_default_region() {
        let pn = PhoneNumber::parse(Some(country::Id::CN), "13800138000").unwrap();
        assert_eq!(pn.e164(), "+8613800138000");
    }
}
