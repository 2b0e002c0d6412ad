use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{NutritionError, NutritionLookup, NutritionResult};

#[derive(Default)]
struct MockState {
    products: RwLock<HashMap<String, Value>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

/// In-memory [`NutritionLookup`]; clones share state.
#[derive(Default, Clone)]
pub struct MockNutritionLookup {
    state: Arc<MockState>,
}

impl MockNutritionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(self, code: &str, nutriments: Value) -> Self {
        self.state
            .products
            .write()
            .insert(code.to_string(), nutriments);
        self
    }

    pub fn set_fail(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionLookup for MockNutritionLookup {
    async fn fetch(&self, code: &str) -> NutritionResult<Option<Value>> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);

        if self.state.fail.load(Ordering::SeqCst) {
            return Err(NutritionError::Other("mock lookup failure".to_string()));
        }
        Ok(self.state.products.read().get(code).cloned())
    }
}
