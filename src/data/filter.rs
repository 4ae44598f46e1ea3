use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Dataset, Listing, RoomType};

// ---------------------------------------------------------------------------
// FilterSelection – the current state of the four controls
// ---------------------------------------------------------------------------

/// Snapshot of the filter controls. Rebuilt on every interaction.
///
/// An empty `boroughs` or `room_types` set selects nothing; there is no
/// implicit "select all".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub boroughs: BTreeSet<String>,
    pub room_types: BTreeSet<RoomType>,
}

impl FilterSelection {
    /// Initial selection: every borough and room type, full date and price bounds.
    ///
    /// A dataset without review dates gets an inverted (empty) date range.
    pub fn all(dataset: &Dataset) -> Self {
        let (start_date, end_date) = dataset
            .review_bounds
            .unwrap_or((NaiveDate::MAX, NaiveDate::MIN));
        let (min_price, max_price) = dataset.price_bounds.unwrap_or((0.0, 0.0));

        FilterSelection {
            start_date,
            end_date,
            min_price,
            max_price,
            boroughs: dataset.boroughs.clone(),
            room_types: RoomType::ALL.into_iter().collect(),
        }
    }

    pub fn toggle_borough(&mut self, borough: &str) {
        if !self.boroughs.remove(borough) {
            self.boroughs.insert(borough.to_string());
        }
    }

    pub fn toggle_room_type(&mut self, room_type: RoomType) {
        if !self.room_types.remove(&room_type) {
            self.room_types.insert(room_type);
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One conjunct of the filter. A listing is kept when every predicate matches.
///
/// An empty set or an inverted range makes its predicate reject every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    ReviewDate,
    Price,
    Borough,
    RoomType,
}

impl Predicate {
    /// Canonical evaluation order; the cheap comparisons go first.
    pub const ALL: [Predicate; 4] = [
        Predicate::Price,
        Predicate::ReviewDate,
        Predicate::RoomType,
        Predicate::Borough,
    ];

    pub fn matches(self, selection: &FilterSelection, listing: &Listing) -> bool {
        match self {
            // A missing review never compares inside a range.
            Predicate::ReviewDate => listing
                .last_review
                .is_some_and(|d| selection.start_date <= d && d <= selection.end_date),
            Predicate::Price => {
                selection.min_price <= listing.price && listing.price <= selection.max_price
            }
            Predicate::Borough => selection.boroughs.contains(&listing.borough),
            Predicate::RoomType => selection.room_types.contains(&listing.room_type),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – indices of the listings that pass
// ---------------------------------------------------------------------------

/// The subset of a [`Dataset`] matching a selection, as row indices in file order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every listing of the dataset.
    #[cfg(test)]
    pub fn full(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.listings[i])
    }
}

/// Return the view of listings that pass all four predicates.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    filter_with_order(dataset, selection, &Predicate::ALL)
}

/// Like [`filter`], evaluating the predicates in the given order.
///
/// Predicates missing from `order` are not applied.
pub fn filter_with_order<'a>(
    dataset: &'a Dataset,
    selection: &FilterSelection,
    order: &[Predicate],
) -> FilteredView<'a> {
    let indices = dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| order.iter().all(|p| p.matches(selection, listing)))
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}
