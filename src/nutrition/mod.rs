//! Optional nutrient enrichment from an external product database.
//!
//! [`OpenFoodFactsClient`] talks to the Open Food Facts v2 product API. Lookups are
//! best-effort: callers log failures and carry on without the data.

mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::{NutritionError, NutritionResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockNutritionLookup;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

pub const DEFAULT_NUTRITION_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_USER_AGENT: &str = concat!("forage/", env!("CARGO_PKG_VERSION"));
pub const NUTRITION_TIMEOUT: Duration = Duration::from_secs(5);

const PRODUCT_FIELDS: &str = "code,product_name,nutriments";

#[async_trait]
/// Fetches nutrient data for a product code.
pub trait NutritionLookup: Send + Sync {
    /// Returns the product's nutrient map, or `None` if the product is unknown.
    async fn fetch(&self, code: &str) -> NutritionResult<Option<Value>>;
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    nutriments: Option<Value>,
}

/// Open Food Facts v2 client.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    base_url: String,
    http: HttpClient,
}

impl OpenFoodFactsClient {
    /// Builds a client for `base_url`; the service requires a descriptive user agent.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> NutritionResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(NutritionError::InvalidConfig {
                reason: "base_url is empty".to_string(),
            });
        }

        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(NUTRITION_TIMEOUT)
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Product endpoint for `code`.
    pub fn product_url(&self, code: &str) -> String {
        format!(
            "{}/api/v2/product/{}.json?fields={}",
            self.base_url, code, PRODUCT_FIELDS
        )
    }
}

#[async_trait]
impl NutritionLookup for OpenFoodFactsClient {
    #[instrument(skip(self))]
    async fn fetch(&self, code: &str) -> NutritionResult<Option<Value>> {
        let code = code.trim();
        if code.is_empty() {
            return Err(NutritionError::EmptyCode);
        }

        let response = self.http.get(self.product_url(code)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Product not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(NutritionError::Status {
                code: code.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ProductResponse = response.json().await?;
        Ok(extract_nutriments(body))
    }
}

fn extract_nutriments(body: ProductResponse) -> Option<Value> {
    body.product
        .and_then(|p| p.nutriments)
        .filter(|n| n.as_object().is_some_and(|o| !o.is_empty()))
}
