use serde::{Deserialize, Serialize};

use crate::data::filter::FilteredView;

/// Fixed map center (lower Manhattan).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 40.7128,
    longitude: -74.0060,
};
pub const DEFAULT_ZOOM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub position: GeoPoint,
    pub label: String,
    /// Used by the renderer for colouring only.
    pub borough: String,
}

/// Point-marker map. Center and zoom never depend on the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub center: GeoPoint,
    pub zoom: f64,
    pub markers: Vec<MapMarker>,
}

/// One marker per listing that has coordinates.
pub fn build_map(view: &FilteredView<'_>) -> MapSpec {
    let markers = view
        .iter()
        .filter_map(|listing| {
            let (latitude, longitude) = listing.coordinates()?;
            Some(MapMarker {
                position: GeoPoint {
                    latitude,
                    longitude,
                },
                label: listing.name.clone(),
                borough: listing.borough.clone(),
            })
        })
        .collect();

    MapSpec {
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::data::model::{Dataset, RoomType};

    #[test]
    fn skips_listings_without_coordinates() {
        let mut missing = listing(2, "Bronx", "Fordham", RoomType::SharedRoom, 20.0, None);
        missing.latitude = None;

        let ds = Dataset::from_listings(vec![
            listing(1, "Bronx", "Fordham", RoomType::PrivateRoom, 40.0, None),
            missing,
        ]);
        let spec = build_map(&FilteredView::full(&ds));

        assert_eq!(spec.markers.len(), 1);
        assert_eq!(spec.markers[0].label, "listing 1");
        assert_eq!(spec.center, DEFAULT_CENTER);
        assert_eq!(spec.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn empty_view_is_valid() {
        let ds = Dataset::default();
        let spec = build_map(&FilteredView::full(&ds));
        assert!(spec.markers.is_empty());
        assert_eq!(spec.center, DEFAULT_CENTER);
    }
}
