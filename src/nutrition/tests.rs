use super::*;
use serde_json::json;

#[test]
fn test_product_url() {
    let client = OpenFoodFactsClient::new("https://example.org/", DEFAULT_USER_AGENT).unwrap();
    assert_eq!(client.base_url(), "https://example.org");
    assert_eq!(
        client.product_url("3017620422003"),
        "https://example.org/api/v2/product/3017620422003.json?fields=code,product_name,nutriments"
    );
}

#[test]
fn test_empty_base_url_rejected() {
    let err = OpenFoodFactsClient::new("", DEFAULT_USER_AGENT).unwrap_err();
    assert!(matches!(err, NutritionError::InvalidConfig { .. }));
}

#[test]
fn test_extract_nutriments() {
    let body: ProductResponse = serde_json::from_value(json!({
        "code": "3017620422003",
        "product": {
            "product_name": "Nutella",
            "nutriments": {"fat_100g": 30.9, "sugars_100g": 56.3}
        },
        "status": 1
    }))
    .unwrap();

    let nutriments = extract_nutriments(body).unwrap();
    assert_eq!(nutriments["fat_100g"], json!(30.9));
}

#[test]
fn test_extract_nutriments_missing_or_empty() {
    let missing: ProductResponse = serde_json::from_value(json!({"status": 0})).unwrap();
    assert!(extract_nutriments(missing).is_none());

    let empty: ProductResponse =
        serde_json::from_value(json!({"product": {"nutriments": {}}})).unwrap();
    assert!(extract_nutriments(empty).is_none());
}

#[tokio::test]
async fn test_fetch_empty_code() {
    let client = OpenFoodFactsClient::new(DEFAULT_NUTRITION_URL, DEFAULT_USER_AGENT).unwrap();
    let err = client.fetch("  ").await.unwrap_err();
    assert!(matches!(err, NutritionError::EmptyCode));
}

#[tokio::test]
async fn test_mock_lookup() {
    let mock = MockNutritionLookup::new().with_product("42", json!({"proteins_100g": 12.0}));

    assert_eq!(
        mock.fetch("42").await.unwrap(),
        Some(json!({"proteins_100g": 12.0}))
    );
    assert_eq!(mock.fetch("43").await.unwrap(), None);

    mock.set_fail(true);
    assert!(mock.fetch("42").await.is_err());
    assert_eq!(mock.calls(), 3);
}
