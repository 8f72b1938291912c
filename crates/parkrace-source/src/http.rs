//! HTTP lot source backed by the public data portal.

use parkrace_lot::ParkingLot;

use crate::{LotSource, SourceConfig, SourceError, decode_lots};

/// A [`LotSource`] that queries the public data portal.
///
/// Sends `GET {base_url}/{service_path}?page=&perPage=&serviceKey=` and
/// decodes the body with [`decode_lots`]. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct HttpLotSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl HttpLotSource {
    /// Builds a source with its own HTTP client.
    ///
    /// # Errors
    /// Returns [`SourceError::Request`] if the client can't be built
    /// (e.g., the TLS backend fails to initialise).
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a source around an existing client. The client's own timeout
    /// applies; `config.timeout` is still set per request.
    pub fn with_client(client: reqwest::Client, config: SourceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl LotSource for HttpLotSource {
    async fn fetch_lots(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ParkingLot>, SourceError> {
        let endpoint = self.config.endpoint();
        tracing::debug!(%endpoint, page, per_page, "fetching parking lots");

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("page", page.to_string()),
                ("perPage", per_page.to_string()),
                ("serviceKey", self.config.api_key.clone()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let lots = decode_lots(&body)?;

        tracing::debug!(page, lots = lots.len(), "parking lots fetched");
        Ok(lots)
    }
}
