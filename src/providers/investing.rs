//! Gold ounce quote scraped from an investing.com-style instrument page.

use super::util::{browser_client, parse_quote_text, with_retry};
use crate::core::cache::QuoteCache;
use crate::core::quotes::OuncePriceProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

/// Extracts the last-traded instrument price from the page markup. A
/// missing element or garbled text yields 0 ("unavailable"); selector
/// breakage on the source site is an accepted operational risk.
fn parse_instrument_price(html: &str) -> f64 {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"[data-test="instrument-price-last"]"#) else {
        return 0.0;
    };

    match document.select(&selector).next() {
        Some(element) => {
            let text = element.text().collect::<String>();
            parse_quote_text(&text)
        }
        None => {
            warn!("Instrument price element not found in page");
            0.0
        }
    }
}

pub struct InvestingOunceProvider {
    base_url: String,
    client: reqwest::Client,
    cache: QuoteCache<f64>,
}

impl InvestingOunceProvider {
    pub fn new(base_url: &str, cache: QuoteCache<f64>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            client: browser_client()?,
            cache,
        })
    }
}

#[async_trait]
impl OuncePriceProvider for InvestingOunceProvider {
    #[instrument(name = "OuncePriceFetch", skip(self))]
    async fn fetch_ounce_price(&self) -> Result<f64> {
        if let Some(cached) = self.cache.get().await {
            return Ok(cached);
        }

        let url = format!("{}/currencies/xau-usd", self.base_url);
        debug!("Requesting ounce quote from {}", url);

        let response = with_retry(|| async { self.client.get(&url).send().await }, 3, 500)
            .await
            .context("Ounce quote request failed")?;
        let html = response
            .text()
            .await
            .context("Failed to read ounce quote page")?;

        let price = parse_instrument_price(&html);
        self.cache.put(price).await;
        Ok(price)
    }
}
