//! Provider layer: the send-code capability and the static provider table.

use crate::client::{BoxFuture, Client, SendError};
use crate::domain::ConfigError;

/// Name this provider is registered under.
pub const PROVIDER_NAME: &str = "aliyun";

/// A pluggable backend that can deliver a verification code.
pub trait SmsProvider: Send + Sync {
    fn send_code<'a>(
        &'a self,
        phone_number: &'a str,
        code: &'a str,
    ) -> BoxFuture<'a, Result<(), SendError>>;
}

impl SmsProvider for Client {
    fn send_code<'a>(
        &'a self,
        phone_number: &'a str,
        code: &'a str,
    ) -> BoxFuture<'a, Result<(), SendError>> {
        Box::pin(Client::send_code(self, phone_number, code))
    }
}

/// Constructor stored in [`PROVIDERS`].
pub type Opener = fn(&str) -> Result<Box<dyn SmsProvider>, ConfigError>;

/// Providers available by name, in lookup order.
pub const PROVIDERS: &[(&str, Opener)] = &[(PROVIDER_NAME, open_boxed)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors returned by [`open_provider`].
pub enum OpenError {
    #[error("unknown sms provider: {name}")]
    UnknownProvider { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parse `source` and build a [`Client`] for it.
pub fn open(source: &str) -> Result<Client, ConfigError> {
    Client::from_source(source)
}

fn open_boxed(source: &str) -> Result<Box<dyn SmsProvider>, ConfigError> {
    Ok(Box::new(open(source)?))
}

/// Look up `name` in [`PROVIDERS`] and open it with `source`.
pub fn open_provider(name: &str, source: &str) -> Result<Box<dyn SmsProvider>, OpenError> {
    let (_, opener) = PROVIDERS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .ok_or_else(|| OpenError::UnknownProvider {
            name: name.to_owned(),
        })?;
    Ok(opener(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "http://x/y?key=k1&tpl_id=t1&tpl_value=v1";

    #[test]
    fn aliyun_is_registered() {
        assert!(PROVIDERS.iter().any(|(name, _)| *name == "aliyun"));
        assert!(open_provider("aliyun", SOURCE).is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = open_provider("twilio", SOURCE).err().unwrap();
        assert_eq!(
            err,
            OpenError::UnknownProvider {
                name: "twilio".to_owned()
            }
        );
        assert_eq!(err.to_string(), "unknown sms provider: twilio");
    }

    #[test]
    fn config_errors_abort_opening() {
        let err = open_provider("aliyun", "http://x?tpl_id=t1").err().unwrap();
        assert_eq!(err, OpenError::Config(ConfigError::Missing { field: "key" }));
        assert_eq!(err.to_string(), "missing required field: key");
    }

    #[test]
    fn open_keeps_parsed_options() {
        let client = open(SOURCE).unwrap();
        assert_eq!(client.options().address(), "http://x/y");
        assert_eq!(client.options().tpl_value().as_str(), "v1");
    }
}
