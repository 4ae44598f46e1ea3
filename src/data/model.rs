use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomType – the fixed set of listing categories
// ---------------------------------------------------------------------------

/// The kind of accommodation a listing offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "Private room")]
    PrivateRoom,
    #[serde(rename = "Entire home/apt")]
    EntireHome,
    #[serde(rename = "Shared room")]
    SharedRoom,
}

impl RoomType {
    /// All room types, in the order the checklist shows them.
    pub const ALL: [RoomType; 3] = [
        RoomType::PrivateRoom,
        RoomType::EntireHome,
        RoomType::SharedRoom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RoomType::PrivateRoom => "Private room",
            RoomType::EntireHome => "Entire home/apt",
            RoomType::SharedRoom => "Shared room",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|rt| rt.label() == s.trim())
            .ok_or_else(|| format!("unknown room type '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the dataset
// ---------------------------------------------------------------------------

/// A single rental listing (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub name: String,
    /// `neighbourhood_group` in the source data.
    pub borough: String,
    pub neighbourhood: String,
    pub room_type: RoomType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Nightly price, always finite and non-negative.
    pub price: f64,
    pub last_review: Option<NaiveDate>,
}

impl Listing {
    /// Both coordinates, if the listing has them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed control bounds.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All listings, in file order.
    pub listings: Vec<Listing>,
    /// Sorted distinct boroughs.
    pub boroughs: BTreeSet<String>,
    /// Sorted distinct neighbourhoods.
    pub neighbourhoods: BTreeSet<String>,
    /// Earliest and latest `last_review`, if any listing has one.
    pub review_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Lowest and highest price, if the dataset is non-empty.
    pub price_bounds: Option<(f64, f64)>,
}

impl Dataset {
    /// Build the bound indices from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut boroughs = BTreeSet::new();
        let mut neighbourhoods = BTreeSet::new();
        let mut review_bounds: Option<(NaiveDate, NaiveDate)> = None;
        let mut price_bounds: Option<(f64, f64)> = None;

        for listing in &listings {
            boroughs.insert(listing.borough.clone());
            neighbourhoods.insert(listing.neighbourhood.clone());

            if let Some(date) = listing.last_review {
                review_bounds = Some(match review_bounds {
                    Some((lo, hi)) => (lo.min(date), hi.max(date)),
                    None => (date, date),
                });
            }

            let price = listing.price;
            price_bounds = Some(match price_bounds {
                Some((lo, hi)) => (lo.min(price), hi.max(price)),
                None => (price, price),
            });
        }

        Dataset {
            listings,
            boroughs,
            neighbourhoods,
            review_bounds,
            price_bounds,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn listing(
        id: u64,
        borough: &str,
        neighbourhood: &str,
        room_type: RoomType,
        price: f64,
        last_review: Option<&str>,
    ) -> Listing {
        Listing {
            id,
            name: format!("listing {id}"),
            borough: borough.to_string(),
            neighbourhood: neighbourhood.to_string(),
            room_type,
            latitude: Some(40.7),
            longitude: Some(-73.9),
            price,
            last_review: last_review
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").expect("test date")),
        }
    }

    #[test]
    fn bounds_skip_missing_reviews() {
        let ds = Dataset::from_listings(vec![
            listing(1, "Manhattan", "Harlem", RoomType::PrivateRoom, 50.0, Some("2019-05-01")),
            listing(2, "Brooklyn", "Bushwick", RoomType::EntireHome, 200.0, None),
            listing(3, "Manhattan", "Chelsea", RoomType::SharedRoom, 30.0, Some("2018-01-01")),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.boroughs.iter().cloned().collect::<Vec<_>>(),
            vec!["Brooklyn".to_string(), "Manhattan".to_string()]
        );
        assert_eq!(ds.neighbourhoods.len(), 3);
        assert_eq!(
            ds.review_bounds,
            Some((
                NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2019, 5, 1).unwrap()
            ))
        );
        assert_eq!(ds.price_bounds, Some((30.0, 200.0)));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_listings(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.review_bounds, None);
        assert_eq!(ds.price_bounds, None);
    }

    #[test]
    fn room_type_parses_labels() {
        for rt in RoomType::ALL {
            assert_eq!(rt.label().parse::<RoomType>(), Ok(rt));
        }
        assert!("Hotel room".parse::<RoomType>().is_err());
    }

    #[test]
    fn coordinates_require_both_values() {
        let mut l = listing(1, "Queens", "Astoria", RoomType::PrivateRoom, 10.0, None);
        assert_eq!(l.coordinates(), Some((40.7, -73.9)));
        l.longitude = None;
        assert_eq!(l.coordinates(), None);
    }
}
