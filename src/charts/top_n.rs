use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::histogram::CategoryCount;
use crate::data::model::Listing;

pub const DEFAULT_TOP_N: usize = 10;

/// Which listings the top-N chart counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TopNScope {
    /// The whole dataset; the chart ignores the active filters.
    #[default]
    Dataset,
    /// Only the listings passing the active filters.
    Filtered,
}

/// Horizontal bar chart of the busiest neighbourhoods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    pub title: String,
    pub horizontal: bool,
    /// The first bar is drawn at the top of the category axis.
    pub reversed_category_axis: bool,
    pub scope: TopNScope,
    /// Sorted by count, highest first.
    pub bars: Vec<CategoryCount>,
}

/// Count listings per neighbourhood and keep the `n` largest.
///
/// Ties are broken by neighbourhood name so the output is deterministic.
pub fn build_top_n<'a>(
    listings: impl IntoIterator<Item = &'a Listing>,
    n: usize,
    scope: TopNScope,
) -> BarChartSpec {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for listing in listings {
        *counts.entry(listing.neighbourhood.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);

    BarChartSpec {
        title: format!("Top {n} neighbourhoods by listings"),
        horizontal: true,
        reversed_category_axis: true,
        scope,
        bars: ranked
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RoomType;
    use crate::data::model::tests::listing;

    fn with_counts(counts: &[(&str, usize)]) -> Vec<Listing> {
        let mut id = 0;
        let mut out = Vec::new();
        for &(neighbourhood, count) in counts {
            for _ in 0..count {
                id += 1;
                out.push(listing(id, "Queens", neighbourhood, RoomType::PrivateRoom, 10.0, None));
            }
        }
        out
    }

    #[test]
    fn ties_rank_before_smaller_counts() {
        let listings = with_counts(&[("C", 3), ("B", 5), ("A", 5)]);
        let spec = build_top_n(&listings, DEFAULT_TOP_N, TopNScope::Dataset);

        let names: Vec<&str> = spec.bars.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(spec.horizontal);
        assert!(spec.reversed_category_axis);
    }

    #[test]
    fn keeps_at_most_n() {
        let counts: Vec<(String, usize)> = (0..15).map(|i| (format!("n{i:02}"), i + 1)).collect();
        let borrowed: Vec<(&str, usize)> = counts.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        let listings = with_counts(&borrowed);

        let spec = build_top_n(&listings, DEFAULT_TOP_N, TopNScope::Dataset);
        assert_eq!(spec.bars.len(), 10);
        assert_eq!(spec.bars[0].category, "n14");
        assert_eq!(spec.bars[0].count, 15);
        assert!(spec.bars.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn empty_input_gives_empty_chart() {
        let spec = build_top_n(std::iter::empty(), DEFAULT_TOP_N, TopNScope::Filtered);
        assert!(spec.bars.is_empty());
    }
}
