//! Disaster history from the Bandung open-data portal.
//!
//! Two tables are published: monthly natural-disaster counts and yearly counts for other
//! incident types. Parsing and aggregation are pure; [`OpenDataClient`] (feature `reqwest`)
//! fetches both tables and folds them into a [`HistorySnapshot`].

mod aggregate;
#[cfg(feature = "reqwest")] mod client;
mod endpoints;

pub use aggregate::*;
#[cfg(feature = "reqwest")] pub use client::*;
pub use endpoints::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransientError};

/// Calendar month as labelled by the open-data portal.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
	Januari,
	Februari,
	Maret,
	April,
	Mei,
	Juni,
	Juli,
	Agustus,
	September,
	Oktober,
	November,
	Desember,
}
impl Month {
	/// Every month in chart order.
	pub const ALL: [Month; 12] = [
		Month::Januari,
		Month::Februari,
		Month::Maret,
		Month::April,
		Month::Mei,
		Month::Juni,
		Month::Juli,
		Month::Agustus,
		Month::September,
		Month::Oktober,
		Month::November,
		Month::Desember,
	];

	/// Upper-case name used in the `bulan` field.
	pub const fn name(self) -> &'static str {
		match self {
			Month::Januari => "JANUARI",
			Month::Februari => "FEBRUARI",
			Month::Maret => "MARET",
			Month::April => "APRIL",
			Month::Mei => "MEI",
			Month::Juni => "JUNI",
			Month::Juli => "JULI",
			Month::Agustus => "AGUSTUS",
			Month::September => "SEPTEMBER",
			Month::Oktober => "OKTOBER",
			Month::November => "NOVEMBER",
			Month::Desember => "DESEMBER",
		}
	}

	/// Three-letter axis label.
	pub fn label(self) -> &'static str {
		&self.name()[..3]
	}

	/// Zero-based chart position.
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Resolves an upstream month name, ignoring case and surrounding whitespace.
	pub fn from_name(name: &str) -> Option<Self> {
		let name = name.trim();

		Self::ALL.into_iter().find(|month| month.name().eq_ignore_ascii_case(name))
	}
}
impl Display for Month {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.name())
	}
}
impl FromStr for Month {
	type Err = UnknownMonth;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| UnknownMonth(s.to_owned()))
	}
}

/// Month name that does not match any entry in [`Month::ALL`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown month name `{0}`.")]
pub struct UnknownMonth(pub String);

/// Row of the monthly natural-disaster table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyIncident {
	/// Disaster category, e.g. `BANJIR`.
	pub kategori_bencana_alam: String,
	/// Upper-case month name.
	pub bulan: String,
	/// Calendar year.
	pub tahun: i32,
	/// Incident count.
	pub jumlah: u64,
}
impl MonthlyIncident {
	/// Parsed month, when the `bulan` field is recognized.
	pub fn month(&self) -> Option<Month> {
		Month::from_name(&self.bulan)
	}
}

/// Row of the other-incidents table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherIncident {
	/// Incident category, e.g. `ANIMAL RESCUE`.
	pub kategori_bencana_lainnya: String,
	/// Incident count; absent or null counts as zero.
	#[serde(default)]
	pub jumlah_bencana: Option<u64>,
}

#[derive(Deserialize)]
struct Envelope<T> {
	data: Vec<T>,
}

/// Decodes the monthly table's `{ "data": [...] }` envelope.
pub fn parse_monthly(body: &[u8]) -> Result<Vec<MonthlyIncident>, TransientError> {
	parse_envelope(body)
}

/// Decodes the other-incidents table's `{ "data": [...] }` envelope.
pub fn parse_other(body: &[u8]) -> Result<Vec<OtherIncident>, TransientError> {
	parse_envelope(body)
}

fn parse_envelope<T>(body: &[u8]) -> Result<Vec<T>, TransientError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let envelope: Envelope<T> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ResponseParse { source })?;

	Ok(envelope.data)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn month_table_round_trips_names_and_labels() {
		assert_eq!(Month::from_name("januari"), Some(Month::Januari));
		assert_eq!(Month::from_name(" DESEMBER "), Some(Month::Desember));
		assert_eq!(Month::Agustus.label(), "AGU");
		assert_eq!(Month::Desember.index(), 11);
		assert_eq!("SEPTEMBER".parse::<Month>(), Ok(Month::September));
		assert!("SEPTEMBRE".parse::<Month>().is_err());
	}

	#[test]
	fn parse_monthly_reads_envelope() {
		let body = br#"{"data":[{"kategori_bencana_alam":"BANJIR","bulan":"MARET","tahun":2023,"jumlah":4}]}"#;
		let rows = parse_monthly(body).expect("Monthly payload should parse.");

		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].month(), Some(Month::Maret));
		assert_eq!(rows[0].jumlah, 4);
	}

	#[test]
	fn parse_other_defaults_missing_counts() {
		let body = br#"{"data":[{"kategori_bencana_lainnya":"LAIN-LAIN"},{"kategori_bencana_lainnya":"BANJIR","jumlah_bencana":null}]}"#;
		let rows = parse_other(body).expect("Other-incident payload should parse.");

		assert!(rows.iter().all(|row| row.jumlah_bencana.is_none()));
	}

	#[test]
	fn parse_errors_carry_the_offending_path() {
		let body = br#"{"data":[{"kategori_bencana_alam":"BANJIR","bulan":"MARET","tahun":2023,"jumlah":"x"}]}"#;

		match parse_monthly(body) {
			Err(TransientError::ResponseParse { source }) =>
				assert_eq!(source.path().to_string(), "data[0].jumlah"),
			other => panic!("Expected a parse error, got {other:?}."),
		}
	}
}
