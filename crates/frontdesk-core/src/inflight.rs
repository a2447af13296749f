use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Per-key "operation in progress" registry.
///
/// `try_begin` hands out at most one live guard per key; the key is released
/// when the guard drops, whichever way the operation ended.
#[derive(Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, key: &str) -> Option<InFlightGuard> {
        let mut keys = self.keys.lock().unwrap_or_else(|p| p.into_inner());
        if !keys.insert(key.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key: key.to_string(),
        })
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(key)
    }
}

pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut keys = self.keys.lock().unwrap_or_else(|p| p.into_inner());
        keys.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_until_release() {
        let inflight = InFlight::new();
        let first = inflight.try_begin("resolve:1").expect("first");
        assert!(inflight.try_begin("resolve:1").is_none());
        assert!(inflight.try_begin("resolve:2").is_some());
        assert!(inflight.is_active("resolve:1"));
        drop(first);
        assert!(!inflight.is_active("resolve:1"));
        assert!(inflight.try_begin("resolve:1").is_some());
    }
}
