// crates.io
use futures_util::future;
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	history::{self, HistorySnapshot, MonthlyIncident, OpenDataEndpoints, OtherIncident},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// Open-data fetcher backed by [`ReqwestClient`].
///
/// Every request is a plain `GET` with `Accept: application/json`. Non-success statuses map
/// to [`TransientError::Endpoint`], connection failures to [`TransportError::Network`], and
/// bodies that do not match the table shape to [`TransientError::ResponseParse`].
#[derive(Clone, Debug)]
pub struct OpenDataClient {
	http: ReqwestClient,
	endpoints: OpenDataEndpoints,
}
impl OpenDataClient {
	/// Builds a client with a default [`ReqwestClient`] and a request timeout.
	pub fn new(endpoints: OpenDataEndpoints) -> Result<Self> {
		let http = ReqwestClient::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self { http, endpoints })
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, endpoints: OpenDataEndpoints) -> Self {
		Self { http: client, endpoints }
	}

	/// Endpoints this client reads from.
	pub fn endpoints(&self) -> &OpenDataEndpoints {
		&self.endpoints
	}

	/// Fetches and parses the monthly natural-disaster table.
	pub async fn fetch_monthly(&self) -> Result<Vec<MonthlyIncident>> {
		let body = self.fetch_table(&self.endpoints.monthly).await?;

		Ok(history::parse_monthly(&body)?)
	}

	/// Fetches and parses the other-incidents table.
	pub async fn fetch_other(&self) -> Result<Vec<OtherIncident>> {
		let body = self.fetch_table(&self.endpoints.other).await?;

		Ok(history::parse_other(&body)?)
	}

	/// Fetches both tables concurrently and aggregates them.
	pub async fn fetch_history(&self) -> Result<HistorySnapshot> {
		const KIND: OpKind = OpKind::FetchHistory;

		let span = OpSpan::new(KIND, "fetch_history");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let (monthly, other) =
					future::try_join(self.fetch_monthly(), self.fetch_other()).await?;

				Ok(HistorySnapshot::from_records(&monthly, &other))
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	async fn fetch_table(&self, url: &Url) -> Result<Vec<u8>> {
		let response = self
			.http
			.get(url.clone())
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(
				TransientError::Endpoint { status: status.as_u16(), url: url.to_string() }.into()
			);
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		Ok(body.to_vec())
	}
}
