use std::sync::Arc;

use ndis_admin::api::{ListQuery, SortOrder};
use ndis_admin::config::ClientConfig;
use ndis_admin::http::ApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export NDIS_ADMIN_API_URL=https://api.example.com");
        std::process::exit(1);
    });

    let email = std::env::var("NDIS_ADMIN_EMAIL").unwrap_or_else(|_| {
        eprintln!("Error: NDIS_ADMIN_EMAIL not set");
        std::process::exit(1);
    });
    let password = std::env::var("NDIS_ADMIN_PASSWORD").unwrap_or_else(|_| {
        eprintln!("Error: NDIS_ADMIN_PASSWORD not set");
        std::process::exit(1);
    });
    let password = secrecy::SecretString::from(password);

    eprintln!("💳 ndis-admin v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.base_url);

    let client = Arc::new(ApiClient::new(config)?);

    let tokens = client.auth().login(&email, &password).await?;
    eprintln!("   Signed in as {} ({})\n", tokens.email, tokens.user_id);

    let query = ListQuery::default()
        .page(1)
        .limit(10)
        .sort("createdAt", SortOrder::Desc);

    let wallets = client.wallets().list(&query).await?;
    println!("Wallets ({} shown):", wallets.items.len());
    for wallet in &wallets.items {
        println!("  {:<24} {:>12}  {}", wallet.name, wallet.balance, wallet.id);
    }

    let transactions = client.transactions().list(&query).await?;
    println!("\nRecent transactions ({} shown):", transactions.items.len());
    for tx in &transactions.items {
        println!(
            "  {:>12}  {:?}  {}",
            tx.amount,
            tx.status,
            tx.description.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
