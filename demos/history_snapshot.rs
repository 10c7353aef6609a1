//! Fetches both open-data tables from a local mock of the Bandung portal and prints the
//! monthly chart and incident summary.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use siaga::{
	history::{OpenDataClient, OpenDataEndpoints},
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let monthly_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/monthly");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"kategori_bencana_alam":"BANJIR","bulan":"JANUARI","tahun":2023,"jumlah":5},{"kategori_bencana_alam":"LONGSOR","bulan":"MARET","tahun":2023,"jumlah":2}]}"#,
			);
		})
		.await;
	let other_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/other");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"kategori_bencana_lainnya":"ANIMAL RESCUE","jumlah_bencana":7},{"kategori_bencana_lainnya":"SEARCH AND RESCUE","jumlah_bencana":3}]}"#,
			);
		})
		.await;
	let endpoints = OpenDataEndpoints::builder()
		.monthly(Url::parse(&server.url("/monthly"))?)
		.other(Url::parse(&server.url("/other"))?)
		.build()?;
	let client = OpenDataClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
		endpoints,
	);
	let snapshot = client.fetch_history().await?;

	for series in &snapshot.chart.series {
		let points = snapshot
			.chart
			.labels
			.iter()
			.zip(series.values)
			.map(|(label, value)| format!("{label}={value}"))
			.collect::<Vec<_>>()
			.join(" ");

		println!("{}: {points}", series.category);
	}

	println!("Total other incidents: {}.", snapshot.summary.total);

	for (category, count) in snapshot.summary.buckets() {
		println!("  {category}: {count}");
	}

	monthly_mock.assert_async().await;
	other_mock.assert_async().await;

	Ok(())
}
