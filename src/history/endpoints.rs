// self
use crate::_prelude::*;

const BANDUNG_MONTHLY: &str = "https://opendata.bandung.go.id/api/bigdata/dinas_pemadam_kebakaran_dan_penyelamatan/jumlah_kejadian_bencana_alam_di_kota_bandung";
const BANDUNG_OTHER: &str = "https://opendata.bandung.go.id/api/bigdata/dinas_pemadam_kebakaran_dan_penyelamatan/jumlah_kejadian_bencana_lainnya_di_kota_bandung";

/// Errors raised while constructing or validating open-data endpoints.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum EndpointsError {
	/// A table endpoint was never configured.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint string could not be parsed as a URL.
	#[error("The {endpoint} endpoint is not a valid URL: {message}.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Parser summary.
		message: String,
	},
}

/// Table URLs served by the open-data portal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDataEndpoints {
	/// Monthly natural-disaster table.
	pub monthly: Url,
	/// Other-incidents table.
	pub other: Url,
}
impl OpenDataEndpoints {
	/// Creates a new builder.
	pub fn builder() -> OpenDataEndpointsBuilder {
		OpenDataEndpointsBuilder::default()
	}

	/// Bandung fire and rescue department tables.
	pub fn bandung() -> Self {
		Self::builder()
			.monthly_str(BANDUNG_MONTHLY)
			.and_then(|builder| builder.other_str(BANDUNG_OTHER))
			.and_then(OpenDataEndpointsBuilder::build)
			.unwrap_or_else(|e| unreachable!("Built-in endpoints are valid HTTPS URLs: {e}"))
	}
}

/// Builder for [`OpenDataEndpoints`] values.
#[derive(Debug, Default)]
pub struct OpenDataEndpointsBuilder {
	/// Monthly natural-disaster table.
	pub monthly: Option<Url>,
	/// Other-incidents table.
	pub other: Option<Url>,
}
impl OpenDataEndpointsBuilder {
	/// Sets the monthly table endpoint.
	pub fn monthly(mut self, url: Url) -> Self {
		self.monthly = Some(url);

		self
	}

	/// Parses and sets the monthly table endpoint.
	pub fn monthly_str(self, url: &str) -> Result<Self, EndpointsError> {
		Ok(self.monthly(parse_endpoint("monthly", url)?))
	}

	/// Sets the other-incidents table endpoint.
	pub fn other(mut self, url: Url) -> Self {
		self.other = Some(url);

		self
	}

	/// Parses and sets the other-incidents table endpoint.
	pub fn other_str(self, url: &str) -> Result<Self, EndpointsError> {
		Ok(self.other(parse_endpoint("other", url)?))
	}

	/// Consumes the builder and validates the endpoints.
	pub fn build(self) -> Result<OpenDataEndpoints, EndpointsError> {
		let monthly = self.monthly.ok_or(EndpointsError::MissingEndpoint { endpoint: "monthly" })?;
		let other = self.other.ok_or(EndpointsError::MissingEndpoint { endpoint: "other" })?;

		validate_endpoint("monthly", &monthly)?;
		validate_endpoint("other", &other)?;

		Ok(OpenDataEndpoints { monthly, other })
	}
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, EndpointsError> {
	Url::parse(raw)
		.map_err(|e| EndpointsError::InvalidUrl { endpoint: name, message: e.to_string() })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), EndpointsError> {
	if url.scheme() != "https" {
		Err(EndpointsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bandung_defaults_are_https() {
		let endpoints = OpenDataEndpoints::bandung();

		assert_eq!(endpoints.monthly.host_str(), Some("opendata.bandung.go.id"));
		assert!(
			endpoints.other.path().ends_with("jumlah_kejadian_bencana_lainnya_di_kota_bandung")
		);
	}

	#[test]
	fn builder_rejects_plain_http_and_missing_tables() {
		let insecure = OpenDataEndpoints::builder()
			.monthly_str("http://example.com/monthly")
			.and_then(|builder| builder.other_str("https://example.com/other"))
			.and_then(OpenDataEndpointsBuilder::build);

		assert!(matches!(
			insecure,
			Err(EndpointsError::InsecureEndpoint { endpoint: "monthly", .. })
		));

		let missing = OpenDataEndpoints::builder()
			.other_str("https://example.com/other")
			.and_then(OpenDataEndpointsBuilder::build);

		assert_eq!(missing, Err(EndpointsError::MissingEndpoint { endpoint: "monthly" }));
		assert!(matches!(
			OpenDataEndpoints::builder().monthly_str("not a url"),
			Err(EndpointsError::InvalidUrl { endpoint: "monthly", .. })
		));
	}
}
