use std::sync::Arc;

use tinylink_core::MappingStore;
use tinylink_generator::Generator;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn MappingStore>,
    generator: Arc<dyn Generator>,
    base_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MappingStore>,
        generator: Arc<dyn Generator>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            base_url: public_base_url.into(),
        }
    }

    pub fn store(&self) -> &dyn MappingStore {
        self.store.as_ref()
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
