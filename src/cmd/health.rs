//! `pokeproxy health` — check the health of a running instance.
//!
//! Sends `GET /api/health` to the given URL and displays the envelope
//! as formatted text or raw JSON.

use crate::api::response::ErrorEnvelope;
use crate::cli::HealthArgs;
use crate::client::ApiClient;
use crate::error::PokeProxyError;
use crate::health::HEALTH_PATH;

pub async fn execute(args: HealthArgs) -> Result<(), PokeProxyError> {
    let client = ApiClient::new(&args.url);
    let (status, body) = client.get(HEALTH_PATH).await?;

    if !status.is_success() {
        return Err(PokeProxyError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            println!("\u{2713} pokeproxy is healthy ({})", client.base_url());
            println!("  message:   {}", envelope.error.message);
            println!("  status:    {}", envelope.error.status_code);
            println!("  timestamp: {}", envelope.error.timestamp);
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}
