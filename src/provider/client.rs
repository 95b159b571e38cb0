// =============================================================================
// Market-data REST client with templated request URLs
// =============================================================================
//
// SECURITY: the API key is substituted into the URL at request time and is
// never logged.  Transport errors are stripped of their URL for the same
// reason.  There is no retry; a failed fetch is surfaced to the caller.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::market_data::{parse_history, PriceSeries};
use crate::runtime_config::{DataRequest, ProviderConfig};

/// Historical price API client.
#[derive(Clone)]
pub struct MarketDataClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl MarketDataClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        debug!(templates = config.requests.len(), "MarketDataClient initialised");

        Ok(Self { config, client })
    }

    // -------------------------------------------------------------------------
    // URL construction
    // -------------------------------------------------------------------------

    /// Fill the template selected by `request.frequency`.
    ///
    /// Every template receives the same set of values; placeholders a template
    /// does not mention are simply unused.  Forex templates name the pair
    /// `{currencies}`, which carries `request.symbol`.
    pub fn construct_url(&self, request: &DataRequest) -> Result<String> {
        let template = self
            .config
            .requests
            .get(&request.frequency)
            .with_context(|| format!("no URL template for frequency '{}'", request.frequency))?;

        render_template(
            template,
            &[
                ("symbol", Some(request.symbol.as_str())),
                ("currencies", Some(request.symbol.as_str())),
                ("key", Some(self.config.api_key.as_str())),
                ("from_date", request.from_date.as_deref()),
                ("to_date", request.to_date.as_deref()),
            ],
        )
        .with_context(|| format!("failed to build URL for frequency '{}'", request.frequency))
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// GET the history described by `request` and parse it into a series.
    #[instrument(
        skip(self, request),
        fields(symbol = %request.symbol, frequency = %request.frequency),
        name = "provider::fetch_history"
    )]
    pub async fn fetch_history(&self, request: &DataRequest) -> Result<PriceSeries> {
        let url = self.construct_url(request)?;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("history request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| e.without_url())
            .context("failed to read history response body")?;

        if !status.is_success() {
            anyhow::bail!("history endpoint returned {}: {}", status, body);
        }

        let mut series = parse_history(&body)?;
        if series.symbol.is_empty() {
            series.symbol = request.symbol.clone();
        }

        info!(rows = series.len(), "price history fetched");
        Ok(series)
    }
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Substitute `{name}` placeholders.  `{{` is a literal brace.  Unknown
/// placeholders, and placeholders whose value is absent, are errors.
fn render_template(template: &str, vars: &[(&str, Option<&str>)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(escaped) = after.strip_prefix('{') {
            out.push('{');
            rest = escaped;
            continue;
        }

        let close = after.find('}').context("unclosed placeholder in URL template")?;
        let name = &after[..close];
        let value = vars
            .iter()
            .find(|(k, _)| *k == name)
            .with_context(|| format!("unknown placeholder '{{{name}}}' in URL template"))?
            .1
            .with_context(|| format!("request has no value for '{{{name}}}'"))?;

        out.push_str(value);
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
