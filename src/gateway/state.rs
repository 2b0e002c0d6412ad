use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::FoodResolver;
use crate::nutrition::NutritionLookup;
use crate::semantic::SemanticBackend;
use crate::storage::EntryStore;

pub struct HandlerState<S, M>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    pub resolver: Arc<FoodResolver<S, M>>,

    /// `None` when enrichment is disabled.
    pub nutrition: Option<Arc<dyn NutritionLookup>>,

    pub storage_path: PathBuf,

    /// `"stub"` or `"real"`, reported by `/ready`.
    pub embedder_mode: &'static str,
}

impl<S, M> Clone for HandlerState<S, M>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            nutrition: self.nutrition.clone(),
            storage_path: self.storage_path.clone(),
            embedder_mode: self.embedder_mode,
        }
    }
}

impl<S, M> HandlerState<S, M>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    pub fn new(resolver: Arc<FoodResolver<S, M>>, storage_path: PathBuf) -> Self {
        Self {
            resolver,
            nutrition: None,
            storage_path,
            embedder_mode: "real",
        }
    }

    pub fn with_nutrition(mut self, nutrition: Arc<dyn NutritionLookup>) -> Self {
        self.nutrition = Some(nutrition);
        self
    }

    pub fn with_embedder_mode(mut self, stub: bool) -> Self {
        self.embedder_mode = if stub { "stub" } else { "real" };
        self
    }
}
