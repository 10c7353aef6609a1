// self
use crate::{
	_prelude::*,
	history::{Month, MonthlyIncident, OtherIncident},
};

/// Natural-disaster categories charted month by month, in series order.
pub const CHART_CATEGORIES: [&str; 3] = ["BANJIR", "POHON TUMBANG", "LONGSOR"];

/// One line of the monthly chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
	/// Upstream category name.
	pub category: &'static str,
	/// Count per month, indexed by [`Month::index`].
	pub values: [u64; 12],
}

/// Monthly counts for the charted natural-disaster categories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyChart {
	/// Axis labels in month order.
	pub labels: [&'static str; 12],
	/// One series per entry of [`CHART_CATEGORIES`].
	pub series: Vec<ChartSeries>,
}
impl MonthlyChart {
	/// Builds the chart from raw rows.
	///
	/// For each category and month the first matching row wins; months without a row are
	/// zero. Rows with an unrecognized month or category are ignored.
	pub fn from_records(records: &[MonthlyIncident]) -> Self {
		let labels = Month::ALL.map(Month::label);
		let series = CHART_CATEGORIES
			.into_iter()
			.map(|category| {
				let values = Month::ALL.map(|month| {
					records
						.iter()
						.find(|row| {
							row.kategori_bencana_alam == category && row.month() == Some(month)
						})
						.map_or(0, |row| row.jumlah)
				});

				ChartSeries { category, values }
			})
			.collect();

		Self { labels, series }
	}

	/// Series for `category`, if charted.
	pub fn series(&self, category: &str) -> Option<&ChartSeries> {
		self.series.iter().find(|series| series.category == category)
	}
}

/// Bucket of the other-incidents summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DisasterCategory {
	/// `SEARCH AND RESCUE`.
	SearchAndRescue,
	/// `POHON TUMBANG` (fallen tree).
	PohonTumbang,
	/// `LONGSOR` (landslide).
	Longsor,
	/// `BANJIR` (flood).
	Banjir,
	/// `TRAFIC ACCIDENT`.
	TrafficAccident,
	/// `BUILDING COLLAPS`.
	BuildingCollapse,
	/// `ANIMAL RESCUE`.
	AnimalRescue,
	/// `LAIN-LAIN` (other).
	LainLain,
}
impl DisasterCategory {
	/// Every bucket in display order.
	pub const ALL: [DisasterCategory; 8] = [
		DisasterCategory::SearchAndRescue,
		DisasterCategory::PohonTumbang,
		DisasterCategory::Longsor,
		DisasterCategory::Banjir,
		DisasterCategory::TrafficAccident,
		DisasterCategory::BuildingCollapse,
		DisasterCategory::AnimalRescue,
		DisasterCategory::LainLain,
	];

	/// Category name exactly as the portal spells it.
	pub const fn upstream_name(self) -> &'static str {
		match self {
			DisasterCategory::SearchAndRescue => "SEARCH AND RESCUE",
			DisasterCategory::PohonTumbang => "POHON TUMBANG",
			DisasterCategory::Longsor => "LONGSOR",
			DisasterCategory::Banjir => "BANJIR",
			DisasterCategory::TrafficAccident => "TRAFIC ACCIDENT",
			DisasterCategory::BuildingCollapse => "BUILDING COLLAPS",
			DisasterCategory::AnimalRescue => "ANIMAL RESCUE",
			DisasterCategory::LainLain => "LAIN-LAIN",
		}
	}

	/// Matches an upstream name exactly.
	pub fn from_upstream(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|category| category.upstream_name() == name)
	}
}
impl Display for DisasterCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.upstream_name())
	}
}

/// Totals for the other-incidents table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IncidentSummary {
	/// Sum over every row, including unbucketed categories.
	pub total: u64,
	counts: [u64; 8],
}
impl IncidentSummary {
	/// Folds raw rows into bucket counts.
	pub fn from_records(records: &[OtherIncident]) -> Self {
		records.iter().fold(Self::default(), |mut summary, row| {
			let amount = row.jumlah_bencana.unwrap_or(0);

			summary.total = summary.total.saturating_add(amount);

			if let Some(category) = DisasterCategory::from_upstream(&row.kategori_bencana_lainnya) {
				let count = &mut summary.counts[category as usize];

				*count = count.saturating_add(amount);
			}

			summary
		})
	}

	/// Count for a single bucket.
	pub fn count(&self, category: DisasterCategory) -> u64 {
		self.counts[category as usize]
	}

	/// Buckets paired with their counts, in display order.
	pub fn buckets(&self) -> impl Iterator<Item = (DisasterCategory, u64)> + '_ {
		DisasterCategory::ALL.into_iter().map(|category| (category, self.count(category)))
	}
}

/// Both history views, computed from one fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistorySnapshot {
	/// Monthly natural-disaster chart.
	pub chart: MonthlyChart,
	/// Other-incident totals.
	pub summary: IncidentSummary,
}
impl HistorySnapshot {
	/// Aggregates both tables.
	pub fn from_records(monthly: &[MonthlyIncident], other: &[OtherIncident]) -> Self {
		Self {
			chart: MonthlyChart::from_records(monthly),
			summary: IncidentSummary::from_records(other),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn monthly(category: &str, month: &str, jumlah: u64) -> MonthlyIncident {
		MonthlyIncident {
			kategori_bencana_alam: category.into(),
			bulan: month.into(),
			tahun: 2023,
			jumlah,
		}
	}

	fn other(category: &str, jumlah: Option<u64>) -> OtherIncident {
		OtherIncident { kategori_bencana_lainnya: category.into(), jumlah_bencana: jumlah }
	}

	#[test]
	fn chart_places_values_by_month_and_fills_gaps() {
		let chart = MonthlyChart::from_records(&[
			monthly("BANJIR", "MARET", 4),
			monthly("BANJIR", "MARET", 9),
			monthly("LONGSOR", "DESEMBER", 2),
			monthly("GEMPA", "JANUARI", 7),
			monthly("BANJIR", "BULAN", 5),
		]);

		assert_eq!(chart.labels[0], "JAN");
		assert_eq!(chart.series.len(), 3);

		let banjir = chart.series("BANJIR").expect("BANJIR should be charted.");

		assert_eq!(banjir.values[Month::Maret.index()], 4);
		assert_eq!(banjir.values.iter().sum::<u64>(), 4);
		assert_eq!(chart.series("LONGSOR").expect("LONGSOR should be charted.").values[11], 2);
		assert_eq!(chart.series("POHON TUMBANG").expect("Series should exist.").values, [0; 12]);
		assert!(chart.series("GEMPA").is_none());
	}

	#[test]
	fn summary_total_includes_unknown_categories() {
		let summary = IncidentSummary::from_records(&[
			other("ANIMAL RESCUE", Some(3)),
			other("ANIMAL RESCUE", Some(2)),
			other("TRAFIC ACCIDENT", Some(1)),
			other("KEBAKARAN", Some(10)),
			other("LAIN-LAIN", None),
		]);

		assert_eq!(summary.total, 16);
		assert_eq!(summary.count(DisasterCategory::AnimalRescue), 5);
		assert_eq!(summary.count(DisasterCategory::TrafficAccident), 1);
		assert_eq!(summary.count(DisasterCategory::LainLain), 0);
		assert_eq!(summary.buckets().map(|(_, count)| count).sum::<u64>(), 6);
	}

	#[test]
	fn summary_saturates_on_oversized_counts() {
		let summary = IncidentSummary::from_records(&[
			other("BANJIR", Some(u64::MAX)),
			other("BANJIR", Some(1)),
			other("KEBAKARAN", Some(5)),
		]);

		assert_eq!(summary.total, u64::MAX);
		assert_eq!(summary.count(DisasterCategory::Banjir), u64::MAX);
	}

	#[test]
	fn upstream_spellings_are_exact() {
		assert_eq!(
			DisasterCategory::from_upstream("BUILDING COLLAPS"),
			Some(DisasterCategory::BuildingCollapse)
		);
		assert_eq!(DisasterCategory::from_upstream("BUILDING COLLAPSE"), None);
		assert_eq!(DisasterCategory::TrafficAccident.to_string(), "TRAFIC ACCIDENT");
	}
}
