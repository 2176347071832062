use crate::client::ApiClient;
use crate::config::Context;
use crate::credentials::Credentials;
use crate::exit_codes;
use crate::output::{print_body, print_error, print_status};
use crate::types::ApiKey;
use anyhow::Result;
use tracing::debug;

/// Outcome of logging in from the CLI: either a key, or the exit code to stop with.
pub enum Login {
    Key(ApiKey),
    Failed(u8),
}

/// Exchange credentials for an API key, reporting a rejected login.
pub async fn login(client: &ApiClient, creds: &Credentials) -> Result<Login> {
    debug!(email = %creds.email, "requesting api key");
    let response = client.get_api_key(&creds.email, &creds.password).await?;

    match response.api_key() {
        Some(key) if response.is_success() => Ok(Login::Key(key)),
        _ => {
            print_status(&response);
            print_error(&format!("Login rejected for {}", creds.email));
            Ok(Login::Failed(exit_codes::HTTP_STATUS))
        }
    }
}

/// `petfriends key`: print the raw API key for the configured account.
pub async fn key(ctx: &Context, creds: &Credentials) -> Result<u8> {
    let client = ApiClient::new(ctx)?;
    let response = client.get_api_key(&creds.email, &creds.password).await?;

    print_status(&response);
    match response.api_key() {
        Some(key) if response.is_success() => {
            println!("{}", key.as_str());
        }
        _ => print_body(ctx, &response.body)?,
    }

    Ok(exit_codes::from_status(response.status))
}
