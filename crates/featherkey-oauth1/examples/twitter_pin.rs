//! Example: PIN-based OAuth 1.0a authorization with Twitter
//!
//! This example demonstrates how to:
//! 1. Configure a token exchange for Twitter
//! 2. Obtain a request token and open the authorization page
//! 3. Exchange the PIN shown by Twitter for an access token
//!
//! ## Prerequisites
//!
//! 1. Create an application in the Twitter developer portal and note its
//!    consumer key and secret.
//!
//! 2. Set environment variables:
//!    ```bash
//!    export TWITTER_CONSUMER_KEY="your-consumer-key"
//!    export TWITTER_CONSUMER_SECRET="your-consumer-secret"
//!    ```
//!
//! ## Running
//!
//! ```bash
//! cargo run --example twitter_pin
//! ```

use featherkey_oauth1::{PlatformAdaptor, TokenExchange};
use std::env;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let consumer_key = env::var("TWITTER_CONSUMER_KEY")?;
    let consumer_secret = env::var("TWITTER_CONSUMER_SECRET")?;

    println!("featherkey OAuth 1.0a Example - Twitter PIN flow");
    println!("================================================\n");

    // Step 1: Configure the exchange
    let exchange =
        TokenExchange::twitter(consumer_key, consumer_secret, PlatformAdaptor::system_browser())?;
    println!("Step 1: Provider: {}", exchange.endpoints().name);
    println!("  Request token URL: {}\n", exchange.endpoints().request_token_url);

    // Step 2: Request token + browser
    println!("Step 2: Requesting a request token...");
    let Some(request_token) = exchange.start_authentication().await? else {
        println!("\nTwitter did not issue a request token. Check your consumer key.");
        return Ok(());
    };
    println!(
        "  If no browser opened, visit:\n  {}\n",
        exchange.endpoints().authorization_url(&request_token.token)
    );

    // Step 3: PIN
    print!("Enter the PIN shown by Twitter: ");
    io::stdout().flush()?;
    let mut pin = String::new();
    io::stdin().read_line(&mut pin)?;

    let credential = exchange.confirm_pin(pin.trim(), &request_token.token).await?;
    if !credential.is_valid() {
        println!("\nPIN was not accepted.");
        return Ok(());
    }

    println!("\n✓ Authorized as @{} ({})", credential.screen_name, credential.user_id);
    println!("  Access token: {}", credential.token);
    println!("\nStore the token and secret securely for future use.");

    Ok(())
}
