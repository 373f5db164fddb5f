use std::collections::BTreeSet;

use super::model::{CarSale, SalesDataset};

// ---------------------------------------------------------------------------
// Filter selection: which values are picked in each selector
// ---------------------------------------------------------------------------

/// The two selector dimensions shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Manufacturer,
    VehicleType,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 2] = [
        FilterDimension::Manufacturer,
        FilterDimension::VehicleType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Manufacturer => "Select Manufacturer",
            FilterDimension::VehicleType => "Select Vehicle Type",
        }
    }

    /// The record field this dimension filters on.
    pub fn value<'a>(&self, sale: &'a CarSale) -> &'a str {
        match self {
            FilterDimension::Manufacturer => &sale.manufacturer,
            FilterDimension::VehicleType => &sale.vehicle_type,
        }
    }

    /// Every value the dataset offers for this dimension.
    pub fn options<'a>(&self, dataset: &'a SalesDataset) -> &'a BTreeSet<String> {
        match self {
            FilterDimension::Manufacturer => &dataset.manufacturers,
            FilterDimension::VehicleType => &dataset.vehicle_types,
        }
    }
}

/// Per-dimension selection state.
/// An empty set means "no filter" on that dimension, not "exclude everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub manufacturers: BTreeSet<String>,
    pub vehicle_types: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<M, V>(manufacturers: M, vehicle_types: V) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            manufacturers: manufacturers.into_iter().map(Into::into).collect(),
            vehicle_types: vehicle_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn selected(&self, dim: FilterDimension) -> &BTreeSet<String> {
        match dim {
            FilterDimension::Manufacturer => &self.manufacturers,
            FilterDimension::VehicleType => &self.vehicle_types,
        }
    }

    pub fn selected_mut(&mut self, dim: FilterDimension) -> &mut BTreeSet<String> {
        match dim {
            FilterDimension::Manufacturer => &mut self.manufacturers,
            FilterDimension::VehicleType => &mut self.vehicle_types,
        }
    }

    /// True when neither dimension constrains anything.
    pub fn is_unfiltered(&self) -> bool {
        self.manufacturers.is_empty() && self.vehicle_types.is_empty()
    }

    /// Whether a record passes both dimensions.
    pub fn matches(&self, sale: &CarSale) -> bool {
        FilterDimension::ALL.iter().all(|dim| {
            let selected = self.selected(*dim);
            selected.is_empty() || selected.contains(dim.value(sale))
        })
    }
}

/// Borrow the records that pass the selection, in dataset order.
///
/// An empty result is a normal outcome; every aggregate accepts it.
pub fn apply_filter<'a>(
    dataset: &'a SalesDataset,
    selection: &FilterSelection,
) -> Vec<&'a CarSale> {
    if selection.is_unfiltered() {
        return dataset.all();
    }
    dataset
        .records
        .iter()
        .filter(|sale| selection.matches(sale))
        .collect()
}
