use crate::color::ColorMap;
use crate::data::filter::{FilterDimension, FilterSelection};
use crate::data::model::SalesDataset;
use crate::data::view::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads).
    pub dataset: Option<SalesDataset>,

    /// Selector state for both filter dimensions.
    pub selection: FilterSelection,

    /// Charts and metrics for the current selection (cached).
    pub view: Option<DashboardView>,

    /// Manufacturer colours shared by the pie and scatter charts.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with a dataset already loaded and an initial selection.
    pub fn with_dataset(dataset: SalesDataset, selection: FilterSelection) -> Self {
        let mut state = Self::default();
        state.set_dataset(dataset);
        state.selection = selection;
        state.refilter();
        state
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.selection = FilterSelection::default();
        self.color_map = Some(ColorMap::new(&dataset.manufacturers));
        self.view = Some(DashboardView::compute(&dataset, &self.selection));

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute the cached view after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.view = Some(DashboardView::compute(ds, &self.selection));
        }
    }

    /// Toggle a single value in one dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: FilterDimension, value: &str) {
        let selected = self.selection.selected_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every option of a dimension.
    pub fn select_all(&mut self, dim: FilterDimension) {
        if let Some(ds) = &self.dataset {
            *self.selection.selected_mut(dim) = dim.options(ds).clone();
            self.refilter();
        }
    }

    /// Clear a dimension, which lifts its filter entirely.
    pub fn clear(&mut self, dim: FilterDimension) {
        self.selection.selected_mut(dim).clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CarSale;

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            CarSale::new("Toyota", "Corolla", 10.0, "Passenger", "2020-01-01"),
            CarSale::new("Toyota", "Hilux", 5.0, "Truck", "2021-01-01"),
            CarSale::new("Ford", "Focus", 8.0, "Passenger", "2020-06-01"),
        ])
    }

    fn visible(state: &AppState) -> usize {
        state.view.as_ref().map_or(0, |v| v.record_count)
    }

    #[test]
    fn loading_shows_everything() {
        let mut state = AppState::default();
        assert!(state.view.is_none());
        state.set_dataset(dataset());
        assert_eq!(visible(&state), 3);
        assert!(state.color_map.is_some());
    }

    #[test]
    fn toggling_refilters_and_untoggling_restores() {
        let mut state = AppState::with_dataset(dataset(), FilterSelection::default());

        state.toggle_filter_value(FilterDimension::Manufacturer, "Ford");
        assert_eq!(visible(&state), 1);

        state.toggle_filter_value(FilterDimension::VehicleType, "Truck");
        assert_eq!(visible(&state), 0);

        state.toggle_filter_value(FilterDimension::Manufacturer, "Ford");
        assert_eq!(visible(&state), 1);
    }

    #[test]
    fn select_all_and_clear_are_equivalent_views() {
        let mut state = AppState::with_dataset(dataset(), FilterSelection::default());

        state.select_all(FilterDimension::Manufacturer);
        assert_eq!(state.selection.manufacturers.len(), 2);
        assert_eq!(visible(&state), 3);

        state.clear(FilterDimension::Manufacturer);
        assert!(state.selection.is_unfiltered());
        assert_eq!(visible(&state), 3);
    }

    #[test]
    fn initial_selection_is_applied() {
        let selection = FilterSelection::new(["Toyota"], Vec::<String>::new());
        let state = AppState::with_dataset(dataset(), selection);
        assert_eq!(visible(&state), 2);
    }

    #[test]
    fn new_dataset_resets_selection() {
        let selection = FilterSelection::new(["Toyota"], ["Truck"]);
        let mut state = AppState::with_dataset(dataset(), selection);
        assert_eq!(visible(&state), 1);

        state.set_dataset(dataset());
        assert!(state.selection.is_unfiltered());
        assert_eq!(visible(&state), 3);
    }
}
