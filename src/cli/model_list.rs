//! Model listing functionality
//!
//! Prints the catalog the aggregation service offers, without starting the
//! full-screen interface.

use std::error::Error;

use crate::api::client::fetch_models;
use crate::auth::CredentialStore;

pub async fn list_models(endpoint: &str) -> Result<(), Box<dyn Error>> {
    let mut store = CredentialStore::new();
    let api_key = store.load()?.ok_or(
        "❌ No credential stored\n\n\
         Run 'askemall auth' to store your aggregation API key first.",
    )?;

    let client = reqwest::Client::new();
    let response = fetch_models(&client, endpoint, &api_key)
        .await
        .map_err(|e| e.to_string())?;

    println!("🤖 Available models at {endpoint}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    let mut models = response.models;
    models.sort_by(|a, b| a.id.cmp(&b.id));
    for model in &models {
        println!("  {}  ({})", model.name, model.id);
    }
    println!();
    println!("✓ {} models loaded", models.len());

    Ok(())
}
