use crate::errors::AppError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const LOGGED_IN_KEY: &str = "loggedIn";
pub const CART_KEY: &str = "ecoguardCart";
pub const DONATIONS_KEY: &str = "ecoguardDonations";

/// String-keyed JSON values, written to disk as a single object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalStore {
    entries: BTreeMap<String, Value>,
}

impl LocalStore {
    /// Returns `None` when the key is absent or its value does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("ignoring malformed store entry {key}: {err}");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value).map_err(AppError::internal)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/ecoguard.json"))
}

pub async fn load_store(path: &Path) -> LocalStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse store file: {err}");
                LocalStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStore::default(),
        Err(err) => {
            error!("failed to read store file: {err}");
            LocalStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &LocalStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::donation::DonationLedger;

    fn temp_store_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = env::temp_dir();
        path.push(format!("ecoguard_store_{tag}_{}_{nanos}.json", std::process::id()));
        path
    }

    #[test]
    fn get_returns_none_for_absent_or_malformed_values() {
        let mut store = LocalStore::default();
        assert_eq!(store.get::<Vec<CartItem>>(CART_KEY), None);

        store.set(CART_KEY, &"not a cart").unwrap();
        assert_eq!(store.get::<Vec<CartItem>>(CART_KEY), None);
    }

    #[test]
    fn ledger_values_use_browser_key_layout() {
        let mut store = LocalStore::default();
        store.set(LOGGED_IN_KEY, &"true").unwrap();
        store.set(DONATIONS_KEY, &DonationLedger::default()).unwrap();

        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["loggedIn"], "true");
        assert_eq!(json["ecoguardDonations"]["totalDonated"], 0.0);
    }

    #[tokio::test]
    async fn persisted_store_reloads_identically() {
        let path = temp_store_path("roundtrip");
        let cart = vec![CartItem {
            name: "Bamboo Toothbrush".to_string(),
            price: 12.5,
            image: "https://example.com/brush.jpg".to_string(),
            quantity: 3,
        }];
        let donations = DonationLedger {
            reforestation: 35.0,
            methane: 25.0,
            renewables: 20.0,
            education: 10.0,
            operations: 10.0,
            total_donated: 100.0,
        };

        let mut store = LocalStore::default();
        store.set(CART_KEY, &cart).unwrap();
        store.set(DONATIONS_KEY, &donations).unwrap();
        persist_store(&path, &store).await.unwrap();

        let reloaded = load_store(&path).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded, store);
        assert_eq!(reloaded.get::<Vec<CartItem>>(CART_KEY), Some(cart));
        assert_eq!(reloaded.get::<DonationLedger>(DONATIONS_KEY), Some(donations));
    }

    #[tokio::test]
    async fn unreadable_store_file_loads_as_empty() {
        let path = temp_store_path("garbage");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = load_store(&path).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(store, LocalStore::default());
        assert_eq!(load_store(&temp_store_path("missing")).await, LocalStore::default());
    }
}
