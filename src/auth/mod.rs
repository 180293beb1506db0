use keyring::Entry;
use std::io::{self, Write};

const KEYRING_SERVICE: &str = "askemall";
const KEYRING_USER: &str = "api-key";

/// Persists the single aggregation-API credential in the system keyring.
///
/// The store keeps an in-process copy of the last value it saw so repeated
/// lookups during a session never re-hit the platform backend. Keyring access
/// can be disabled entirely (useful for tests), in which case the in-process
/// copy is the only storage.
pub struct CredentialStore {
    use_keyring: bool,
    cached: Option<String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::new_with_keyring(true)
    }

    /// Construct a store, optionally disabling keyring access (useful for tests).
    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self {
            use_keyring,
            cached: None,
        }
    }

    /// Read the persisted credential. A missing entry is not an error.
    pub fn load(&mut self) -> Result<Option<String>, Box<dyn std::error::Error>> {
        if !self.use_keyring {
            return Ok(self.cached.clone());
        }
        if let Some(cached) = &self.cached {
            return Ok(Some(cached.clone()));
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.get_password() {
            Ok(credential) => {
                self.cached = Some(credential.clone());
                Ok(Some(credential))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Overwrite the persisted credential. Called only after a catalog load
    /// succeeds with it, so a mistyped key never replaces a working one.
    pub fn store(&mut self, credential: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.cached = Some(credential.to_string());
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        entry.set_password(credential)?;
        Ok(())
    }

    /// Remove the persisted credential. A missing entry is not an error.
    pub fn clear(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.cached = None;
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn cached(&self) -> Option<&str> {
        self.cached.as_deref()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Interactive credential entry on the plain terminal, for the `auth`
/// subcommand.
pub fn interactive_auth() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CredentialStore::new();

    println!("🔐 Askemall Authentication Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    if store.load()?.is_some() {
        println!("A credential is already stored; entering a new one replaces it.");
        println!();
    }

    print!("Enter your aggregation API key: ");
    io::stdout().flush()?;

    let mut credential = String::new();
    io::stdin().read_line(&mut credential)?;
    let credential = credential.trim();

    if credential.is_empty() {
        return Err("Credential cannot be empty".into());
    }

    store.store(credential)?;
    println!("✓ Credential stored securely");
    Ok(())
}

/// Remove the stored credential, for the `deauth` subcommand.
pub fn deauth() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CredentialStore::new();
    store.clear()?;
    println!("✓ Stored credential removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_keyring_round_trips_through_cache() {
        let mut store = CredentialStore::new_with_keyring(false);
        assert!(store.load().unwrap().is_none());
        store.store("sk-test").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("sk-test"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
