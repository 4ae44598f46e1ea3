use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::filter::FilteredView;

/// One bar of a categorical chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count-per-borough histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Boroughs in sorted order; boroughs with no listings are left out.
    pub bars: Vec<CategoryCount>,
}

impl HistogramSpec {
    pub fn total(&self) -> usize {
        self.bars.iter().map(|b| b.count).sum()
    }
}

/// Count the listings of the view by borough.
pub fn build_histogram(view: &FilteredView<'_>) -> HistogramSpec {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for listing in view.iter() {
        *counts.entry(listing.borough.as_str()).or_default() += 1;
    }

    HistogramSpec {
        title: "Listings per borough".to_string(),
        x_label: "Borough".to_string(),
        y_label: "Count".to_string(),
        bars: counts
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
    use crate::data::filter::{FilterSelection, filter};
    use crate::data::model::tests::listing;
    use crate::data::model::{Dataset, RoomType};

    #[test]
    fn counts_by_borough() {
        let ds = Dataset::from_listings(vec![
            listing(1, "Manhattan", "Harlem", RoomType::PrivateRoom, 50.0, Some("2019-05-01")),
            listing(2, "Brooklyn", "Bushwick", RoomType::EntireHome, 200.0, Some("2019-06-01")),
            listing(3, "Manhattan", "Chelsea", RoomType::SharedRoom, 30.0, Some("2018-01-01")),
        ]);
        let spec = build_histogram(&FilteredView::full(&ds));

        assert_eq!(
            spec.bars,
            vec![
                CategoryCount { category: "Brooklyn".into(), count: 1 },
                CategoryCount { category: "Manhattan".into(), count: 2 },
            ]
        );
        assert_eq!(spec.total(), 3);
    }

    #[test]
    fn empty_view_gives_zero_categories() {
        let ds = Dataset::from_listings(vec![listing(
            1,
            "Queens",
            "Astoria",
            RoomType::PrivateRoom,
            10.0,
            Some("2019-01-01"),
        )]);
        let mut selection = FilterSelection::all(&ds);
        selection.boroughs.clear();

        let spec = build_histogram(&filter(&ds, &selection));
        assert!(spec.bars.is_empty());
        assert_eq!(spec.total(), 0);
    }
}
