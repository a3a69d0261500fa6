use super::*;
use std::collections::HashMap;
use std::sync::Mutex;

struct MapStore {
    values: Mutex<HashMap<String, Value>>,
    fail: bool,
}

#[async_trait]
impl SettingsStore for MapStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        if self.fail {
            return Err(StoreError::Backend("offline".to_string()));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

#[tokio::test]
async fn test_get_or_returns_stored_value() {
    let store = MapStore {
        values: Mutex::new(HashMap::new()),
        fail: false,
    };
    store.set(keys::API_MODEL, Value::from("gpt-4o")).await.unwrap();
    let value = store.get_or(keys::API_MODEL, Value::from("gpt-3.5-turbo")).await;
    assert_eq!(value, "gpt-4o");
}

#[tokio::test]
async fn test_get_or_falls_back_when_unset() {
    let store = MapStore {
        values: Mutex::new(HashMap::new()),
        fail: false,
    };
    let value = store.get_or(keys::TAB_INACTIVE_THRESHOLD, Value::from(30)).await;
    assert_eq!(value, 30);
}

#[tokio::test]
async fn test_get_or_falls_back_on_error() {
    let store = MapStore {
        values: Mutex::new(HashMap::new()),
        fail: true,
    };
    let value = store.get_or(keys::TAB_KEEP_KEYWORDS, Value::from("")).await;
    assert_eq!(value, "");
}

#[test]
fn test_keys_unique() {
    let mut all = keys::ALL.to_vec();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), keys::ALL.len());
}
