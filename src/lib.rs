//! Verification-code SMS provider for Yunpian-style HTTP gateways.
//!
//! The crate is split into a domain layer of strong types (the parsed
//! provider options), a transport layer for the wire format, and a small
//! client layer that performs the single form POST.
//!
//! ```rust,no_run
//! use yunpian_sms::{Client, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Options::parse(
//!         "https://sms.yunpian.com/v2/sms/tpl_single_send.json?key=...&tpl_id=1&tpl_value=%23code%23%3D%25s",
//!     )?;
//!     let client = Client::new(options);
//!     client.send_code("13800138000", "1234").await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod provider;
mod transport;

pub use client::{Client, ClientBuilder, SendError};
pub use domain::{
    ApiKey, ConfigError, Options, PhoneNumber, TemplateId, TemplateValue, ValidationError,
};
pub use provider::{OpenError, PROVIDER_NAME, PROVIDERS, SmsProvider, open, open_provider};
