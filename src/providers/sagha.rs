//! USD/EGP rate scraped from a gold-price-live "sagha" page.

use super::util::{browser_client, parse_quote_text, with_retry};
use crate::core::cache::QuoteCache;
use crate::core::quotes::UsdRateProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

/// The page renders the headline rate in a `div.mb-5` whose inline style
/// carries a 120px font size; that styling is the only stable marker.
fn parse_headline_rate(html: &str) -> f64 {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("div.mb-5") else {
        return 0.0;
    };

    let headline = document.select(&selector).find(|element| {
        element
            .value()
            .attr("style")
            .is_some_and(|style| style.contains("font-size:120px"))
    });

    match headline {
        Some(element) => {
            let text = element.text().collect::<String>();
            parse_quote_text(&text)
        }
        None => {
            warn!("Headline rate element not found in page");
            0.0
        }
    }
}

pub struct SaghaRateProvider {
    base_url: String,
    client: reqwest::Client,
    cache: QuoteCache<f64>,
}

impl SaghaRateProvider {
    pub fn new(base_url: &str, cache: QuoteCache<f64>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            client: browser_client()?,
            cache,
        })
    }
}

#[async_trait]
impl UsdRateProvider for SaghaRateProvider {
    #[instrument(name = "UsdRateFetch", skip(self))]
    async fn fetch_usd_rate(&self) -> Result<f64> {
        if let Some(cached) = self.cache.get().await {
            return Ok(cached);
        }

        let url = format!("{}/view/sagha-usd", self.base_url);
        debug!("Requesting USD rate from {}", url);

        let response = with_retry(|| async { self.client.get(&url).send().await }, 3, 500)
            .await
            .context("USD rate request failed")?;
        let html = response
            .text()
            .await
            .context("Failed to read USD rate page")?;

        let rate = parse_headline_rate(&html);
        self.cache.put(rate).await;
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    const MOCK_PAGE: &str = r#"
        <html><body>
            <div class="mb-5" style="color:#333">49.20</div>
            <div class="mb-5" style="font-size:120px;font-weight:bold">49.50</div>
            <div class="mb-5">other text</div>
        </body></html>"#;

    async fn create_mock_server(body: &str) -> wiremock::MockServer {
        let mock_server = wiremock::MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/view/sagha-usd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn new_cache() -> QuoteCache<f64> {
        QuoteCache::new(Duration::from_secs(60))
    }

    #[test]
    fn test_parse_headline_rate_picks_styled_div() {
        assert_eq!(parse_headline_rate(MOCK_PAGE), 49.5);
    }

    #[test]
    fn test_parse_missing_headline_returns_zero() {
        let page = r#"<div class="mb-5" style="color:#333">49.20</div>"#;
        assert_eq!(parse_headline_rate(page), 0.0);
    }

    #[tokio::test]
    async fn test_fetch_usd_rate() {
        let mock_server = create_mock_server(MOCK_PAGE).await;
        let provider = SaghaRateProvider::new(&mock_server.uri(), new_cache()).unwrap();

        let rate = provider.fetch_usd_rate().await.unwrap();
        assert_eq!(rate, 49.5);
    }

    #[tokio::test]
    async fn test_fetch_uses_cache_on_second_call() {
        let mock_server = create_mock_server(MOCK_PAGE).await;
        let provider = SaghaRateProvider::new(&mock_server.uri(), new_cache()).unwrap();

        provider.fetch_usd_rate().await.unwrap();
        drop(mock_server);
        let rate = provider.fetch_usd_rate().await.unwrap();
        assert_eq!(rate, 49.5);
    }
}
