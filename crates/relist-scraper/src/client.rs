//! HTTP client for public storefront product JSON endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use relist_core::ScrapedProduct;

use crate::error::ScraperError;
use crate::normalize::normalize_product;
use crate::rate_limit::retry_with_backoff;
use crate::resolver::{ScrapeTarget, TargetKind};
use crate::types::{ProductEnvelope, ProductsPage};

/// Page size ceiling for the collection endpoint. The endpoint caps
/// `limit` at 250; a page with fewer products is the last page.
pub(crate) const PAGE_SIZE: usize = 250;

/// Maximum number of collection pages to fetch before returning an error.
/// Prevents infinite loops against misbehaving stores.
pub(crate) const MAX_PAGES: usize = 200;

/// HTTP client for `GET /products/{handle}.json` and
/// `GET /collections/{handle}/products.json`.
///
/// Requests carry a browser-like header set (User-Agent, Accept,
/// Accept-Language, Referer) — many storefronts gate the JSON endpoints
/// behind basic bot filtering and reject bare programmatic requests.
///
/// Rate limiting (429), not-found (404), and other non-2xx responses are
/// surfaced as typed errors; transient errors are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct StorefrontClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with configured timeout, `User-Agent`,
    /// and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors (429, network errors). Set to `0` to
    /// disable retries. `backoff_base_secs` controls the base delay for
    /// exponential backoff: the wait before the n-th retry is
    /// `backoff_base_secs * 2^(n-1)` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches and normalizes a single product.
    ///
    /// `store` may be a bare host (`"shop.com"`) or carry an explicit
    /// scheme (`"http://127.0.0.1:8080"` for tests against a local mock).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network failure after all retries.
    /// - [`ScraperError::Deserialize`] — body is not the expected JSON.
    pub async fn fetch_product(
        &self,
        store: &str,
        handle: &str,
    ) -> Result<ScrapedProduct, ScraperError> {
        let base = store_base(store);
        let url = format!("{base}/products/{handle}.json");
        let envelope: ProductEnvelope = self
            .get_json(&url, &base, &format!("product {handle} from {store}"))
            .await?;
        Ok(normalize_product(envelope.product, &base))
    }

    /// Fetches and normalizes every product in a collection.
    ///
    /// Pages through `?limit=250&page=N` starting at page 1, stopping when
    /// a page comes back empty or short (fewer than 250 products),
    /// whichever happens first. That is the only termination condition the
    /// endpoint offers: a collection holding an exact multiple of 250
    /// products is detected complete only by the trailing empty page.
    ///
    /// `inter_request_delay_ms` is applied between page requests (never
    /// before the first).
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Self::fetch_product`]; additionally
    /// returns [`ScraperError::PaginationLimit`] if the page count exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_collection(
        &self,
        store: &str,
        handle: &str,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<ScrapedProduct>, ScraperError> {
        let base = store_base(store);
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            if page > MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    store: store.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if page > 1 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let url = format!("{base}/collections/{handle}/products.json?limit={PAGE_SIZE}&page={page}");
            let response: ProductsPage = self
                .get_json(&url, &base, &format!("collection {handle} page {page} from {store}"))
                .await?;

            let count = response.products.len();
            all.extend(
                response
                    .products
                    .into_iter()
                    .map(|raw| normalize_product(raw, &base)),
            );

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetches a resolved [`ScrapeTarget`], returning one product or a
    /// whole collection as a uniform list.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::fetch_product`] / [`Self::fetch_collection`].
    pub async fn fetch_target(
        &self,
        target: &ScrapeTarget,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<ScrapedProduct>, ScraperError> {
        match target.kind {
            TargetKind::Product => {
                let product = self.fetch_product(&target.store, &target.handle).await?;
                Ok(vec![product])
            }
            TargetKind::Collection => {
                self.fetch_collection(&target.store, &target.handle, inter_request_delay_ms)
                    .await
            }
        }
    }

    /// One retried GET returning parsed JSON, with the browser-profile
    /// header set and typed status handling.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        referer: &str,
        context: &str,
    ) -> Result<T, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            let referer = referer.to_owned();
            let context = context.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "application/json,text/html;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::REFERER, &referer)
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;

                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        domain: store_domain(&referer),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
                    context,
                    source: e,
                })
            }
        })
        .await
    }
}

/// Coerces a store reference into a scheme-qualified base URL with no
/// trailing slash. Bare hosts get `https://`.
fn store_base(store: &str) -> String {
    let trimmed = store.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// Hostname for error messages; falls back to the input when parsing fails.
fn store_domain(base: &str) -> String {
    reqwest::Url::parse(base)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| base.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_base_prepends_https_for_bare_host() {
        assert_eq!(store_base("shop.com"), "https://shop.com");
    }

    #[test]
    fn store_base_keeps_explicit_scheme() {
        assert_eq!(store_base("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn store_domain_extracts_host() {
        assert_eq!(store_domain("https://shop.com"), "shop.com");
    }
}
