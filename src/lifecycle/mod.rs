//! Process startup: builds every long-lived component once from [`Config`].

pub mod error;


pub use error::{StartupError, StartupResult};

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::cache::{FoodResolver, ResolverConfig};
use crate::config::Config;
use crate::constants::validate_embedding_dim;
use crate::corpus::EmbeddingCorpus;
use crate::embedding::{EmbedderConfig, SentenceEmbedder};
use crate::nutrition::OpenFoodFactsClient;
use crate::semantic::SemanticResolver;
use crate::storage::DiskEntryStore;

/// Resolver type served by the binary.
pub type ServiceResolver = FoodResolver<DiskEntryStore, SemanticResolver>;

/// Loads the corpus, the embedder and the exact store, and wires the resolver.
///
/// Corpus misalignment and embedder/corpus dimension disagreement are fatal.
#[instrument(skip_all, fields(storage = %config.storage_path.display()))]
pub fn bootstrap(config: &Config) -> StartupResult<Arc<ServiceResolver>> {
    let corpus = Arc::new(EmbeddingCorpus::load(
        &config.corpus_vectors,
        &config.corpus_metadata,
    )?);

    let embedder = Arc::new(load_embedder(config, corpus.dim())?);
    validate_embedding_dim(embedder.embedding_dim(), corpus.dim())?;

    let semantic = SemanticResolver::new(embedder, Arc::clone(&corpus));

    let store = DiskEntryStore::open(config.storage_path.clone())?;
    let resolver = FoodResolver::open(
        store,
        semantic,
        ResolverConfig::with_threshold(config.fuzzy_threshold),
    )?;

    info!(
        corpus_rows = corpus.len(),
        cached = resolver.size(),
        "Startup complete"
    );
    Ok(Arc::new(resolver))
}

/// Loads the sentence model, or a stub sized to the corpus when no model is configured.
pub fn load_embedder(config: &Config, corpus_dim: usize) -> StartupResult<SentenceEmbedder> {
    let embedder_config = match &config.model_dir {
        Some(dir) => EmbedderConfig::new(dir.clone()),
        None => {
            warn!("No FORAGE_MODEL_DIR configured, running embedder in stub mode");
            EmbedderConfig::stub_with_dim(corpus_dim)
        }
    };

    Ok(SentenceEmbedder::load(embedder_config)?)
}

/// Builds the nutrition client unless enrichment is disabled.
pub fn build_nutrition_client(config: &Config) -> StartupResult<Option<OpenFoodFactsClient>> {
    match &config.nutrition_url {
        Some(url) => Ok(Some(OpenFoodFactsClient::new(
            url.clone(),
            &config.user_agent,
        )?)),
        None => {
            info!("Nutrition enrichment disabled");
            Ok(None)
        }
    }
}
