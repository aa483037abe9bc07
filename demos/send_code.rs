use std::io;
use std::time::Duration;

use phonenumber::country;
use tracing_subscriber::EnvFilter;
use yunpian_sms::{Client, Options, PhoneNumber};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = required_env("SMS_SOURCE")?;
    let phone_raw = required_env("SMS_PHONE")?;
    let code = std::env::var("SMS_CODE").unwrap_or_else(|_| "123456".to_owned());
    let region = std::env::var("SMS_REGION")
        .ok()
        .map(|value| value.parse::<country::Id>())
        .transpose()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "SMS_REGION is not a known region"))?;

    let mut builder = Client::builder(Options::parse(&source)?);
    if let Ok(secs) = std::env::var("SMS_TIMEOUT_SECS") {
        builder = builder.timeout(Duration::from_secs(secs.parse()?));
    }
    let client = builder.build()?;

    let phone = PhoneNumber::parse(region, phone_raw)?;
    client.send_code(phone.e164(), &code).await?;
    println!("verification code sent to {}", phone.e164());

    Ok(())
}
