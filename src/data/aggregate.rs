//! Group-by aggregation over a filtered subset.
//!
//! Mirrors `df.groupby(key)[value].agg(reducer)`: records are partitioned by
//! a key column, the value column is reduced per partition, and the result
//! is ordered however the consuming chart needs it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;

use super::model::{CarSale, CategoryColumn, NumericColumn};

/// Number of bars in the top-models chart.
pub const TOP_MODELS: usize = 15;

// ---------------------------------------------------------------------------
// Keys, reducers, ordering
// ---------------------------------------------------------------------------

/// Column to partition on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category(CategoryColumn),
    /// Parsed `Latest_Launch`. Unparsable dates are left out of every group.
    LaunchDate,
    /// Calendar year of `Latest_Launch`.
    LaunchYear,
}

impl GroupKey {
    fn label(&self, sale: &CarSale) -> Option<GroupLabel> {
        match self {
            GroupKey::Category(col) => Some(GroupLabel::Text(col.value(sale).to_string())),
            GroupKey::LaunchDate => sale.launch_date().map(GroupLabel::Date),
            GroupKey::LaunchYear => sale.launch_year().map(GroupLabel::Year),
        }
    }
}

/// A group's key value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupLabel {
    Text(String),
    Date(NaiveDate),
    Year(i32),
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Text(s) => f.pad(s),
            GroupLabel::Date(d) => f.pad(&d.format("%Y-%m-%d").to_string()),
            GroupLabel::Year(y) => f.pad(&y.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    /// NaN for a group with no present values.
    Mean,
    /// Number of present values.
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Largest value first, ties by key; optionally keep only the first `limit`.
    ValueDescending { limit: Option<usize> },
    KeyAscending,
    /// Order in which each key first appears in the subset.
    FirstSeen,
}

// ---------------------------------------------------------------------------
// Aggregation result
// ---------------------------------------------------------------------------

/// Ordered `(key, value)` pairs produced by [`aggregate_by`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub entries: Vec<(GroupLabel, f64)>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupLabel, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn get(&self, key: &GroupLabel) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, v)| acc + v)
    }
}

#[derive(Default)]
struct Accumulator {
    first_seen: usize,
    sum: f64,
    count: usize,
}

/// Group `subset` by `key`, reduce `value` with `reducer`, order by `order`.
///
/// Records whose key cannot be derived are skipped. Records whose value is
/// missing still create their group but contribute nothing to it.
pub fn aggregate_by(
    subset: &[&CarSale],
    key: GroupKey,
    value: NumericColumn,
    reducer: Reducer,
    order: GroupOrder,
) -> Aggregation {
    let mut groups: HashMap<GroupLabel, Accumulator> = HashMap::new();

    for (pos, sale) in subset.iter().enumerate() {
        let Some(label) = key.label(sale) else {
            continue;
        };
        let acc = groups.entry(label).or_insert_with(|| Accumulator {
            first_seen: pos,
            ..Accumulator::default()
        });
        if let Some(v) = value.value(sale) {
            acc.sum += v;
            acc.count += 1;
        }
    }

    let mut rows: Vec<(GroupLabel, usize, f64)> = groups
        .into_iter()
        .map(|(label, acc)| {
            let reduced = match reducer {
                Reducer::Sum => acc.sum,
                Reducer::Mean if acc.count == 0 => f64::NAN,
                Reducer::Mean => acc.sum / acc.count as f64,
                Reducer::Count => acc.count as f64,
            };
            (label, acc.first_seen, reduced)
        })
        .collect();

    match order {
        GroupOrder::ValueDescending { limit } => {
            rows.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
        }
        GroupOrder::KeyAscending => rows.sort_by(|a, b| a.0.cmp(&b.0)),
        GroupOrder::FirstSeen => rows.sort_by_key(|row| row.1),
    }

    Aggregation {
        entries: rows.into_iter().map(|(label, _, v)| (label, v)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Chart-specific views
// ---------------------------------------------------------------------------

/// Total sales per model, best sellers first, at most [`TOP_MODELS`] entries.
pub fn sales_by_model(subset: &[&CarSale]) -> Aggregation {
    aggregate_by(
        subset,
        GroupKey::Category(CategoryColumn::Model),
        NumericColumn::Sales,
        Reducer::Sum,
        GroupOrder::ValueDescending {
            limit: Some(TOP_MODELS),
        },
    )
}

/// Total sales per launch date, oldest first.
pub fn sales_by_launch_date(subset: &[&CarSale]) -> Aggregation {
    aggregate_by(
        subset,
        GroupKey::LaunchDate,
        NumericColumn::Sales,
        Reducer::Sum,
        GroupOrder::KeyAscending,
    )
}

/// Total sales per manufacturer, alphabetical.
pub fn sales_by_manufacturer(subset: &[&CarSale]) -> Aggregation {
    aggregate_by(
        subset,
        GroupKey::Category(CategoryColumn::Manufacturer),
        NumericColumn::Sales,
        Reducer::Sum,
        GroupOrder::KeyAscending,
    )
}

/// Number of distinct values of `column` in the subset.
pub fn distinct_count(subset: &[&CarSale], column: CategoryColumn) -> usize {
    subset
        .iter()
        .map(|sale| column.value(sale))
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn text(s: &str) -> GroupLabel {
        GroupLabel::Text(s.to_string())
    }

    fn sample() -> Vec<CarSale> {
        vec![
            CarSale::new("Toyota", "Corolla", 10.0, "Passenger", "2020-01-01"),
            CarSale::new("Toyota", "Hilux", 5.0, "Truck", "2021-01-01"),
            CarSale::new("Ford", "Focus", 8.0, "Passenger", "2020-06-01"),
            CarSale::new("Toyota", "Corolla", 4.0, "Passenger", "2020-01-01"),
            CarSale::new("Honda", "Civic", 3.0, "Passenger", "unknown"),
        ]
    }

    #[test]
    fn sums_by_model_descending() {
        let data = sample();
        let subset: Vec<&CarSale> = data.iter().collect();
        let agg = sales_by_model(&subset);

        assert_eq!(
            agg.entries,
            vec![
                (text("Corolla"), 14.0),
                (text("Focus"), 8.0),
                (text("Hilux"), 5.0),
                (text("Civic"), 3.0),
            ]
        );
    }

    #[test]
    fn top_models_are_truncated_and_sorted() {
        let data: Vec<CarSale> = (0..40)
            .map(|i| {
                CarSale::new(
                    "Make",
                    format!("M{i:02}"),
                    f64::from(i % 17),
                    "Car",
                    "2020-01-01",
                )
            })
            .collect();
        let subset: Vec<&CarSale> = data.iter().collect();
        let agg = sales_by_model(&subset);

        assert_eq!(agg.len(), TOP_MODELS);
        assert!(agg.entries.windows(2).all(|w| w[0].1 >= w[1].1));
        // Ties keep key order.
        assert_eq!(agg.entries[0], (text("M16"), 16.0));
        assert_eq!(agg.entries[1], (text("M33"), 16.0));
    }

    #[test]
    fn launch_dates_ascending_and_unparsable_skipped() {
        let data = sample();
        let subset: Vec<&CarSale> = data.iter().collect();
        let agg = sales_by_launch_date(&subset);

        let keys: Vec<String> = agg.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["2020-01-01", "2020-06-01", "2021-01-01"]);
        assert_abs_diff_eq!(agg.entries[0].1, 14.0);
        assert_abs_diff_eq!(agg.total(), 27.0);
    }

    #[test]
    fn mean_and_count_reducers() {
        let data = sample();
        let subset: Vec<&CarSale> = data.iter().collect();
        let key = GroupKey::Category(CategoryColumn::Manufacturer);

        let mean = aggregate_by(
            &subset,
            key,
            NumericColumn::Sales,
            Reducer::Mean,
            GroupOrder::KeyAscending,
        );
        assert_abs_diff_eq!(
            mean.get(&text("Toyota")).unwrap(),
            19.0 / 3.0,
            epsilon = 1e-12
        );

        let years = aggregate_by(
            &subset,
            key,
            NumericColumn::LaunchYear,
            Reducer::Count,
            GroupOrder::KeyAscending,
        );
        // Honda's only launch date is unparsable: the group exists with no values.
        assert_eq!(years.get(&text("Honda")), Some(0.0));
        assert_eq!(years.get(&text("Toyota")), Some(3.0));

        let year_mean = aggregate_by(
            &subset,
            key,
            NumericColumn::LaunchYear,
            Reducer::Mean,
            GroupOrder::KeyAscending,
        );
        assert!(year_mean.get(&text("Honda")).unwrap().is_nan());
    }

    #[test]
    fn first_seen_order_and_year_keys() {
        let data = sample();
        let subset: Vec<&CarSale> = data.iter().collect();

        let by_type = aggregate_by(
            &subset,
            GroupKey::Category(CategoryColumn::VehicleType),
            NumericColumn::Sales,
            Reducer::Sum,
            GroupOrder::FirstSeen,
        );
        assert_eq!(
            by_type.entries,
            vec![(text("Passenger"), 25.0), (text("Truck"), 5.0)]
        );

        let by_year = aggregate_by(
            &subset,
            GroupKey::LaunchYear,
            NumericColumn::Sales,
            Reducer::Sum,
            GroupOrder::KeyAscending,
        );
        assert_eq!(
            by_year.entries,
            vec![(GroupLabel::Year(2020), 22.0), (GroupLabel::Year(2021), 5.0)]
        );
    }

    #[test]
    fn empty_subset_gives_empty_aggregations() {
        let subset: Vec<&CarSale> = Vec::new();
        assert!(sales_by_model(&subset).is_empty());
        assert!(sales_by_launch_date(&subset).is_empty());
        assert!(sales_by_manufacturer(&subset).is_empty());
        assert_eq!(distinct_count(&subset, CategoryColumn::Model), 0);

        let total = sales_by_manufacturer(&subset).total();
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
    }

    #[test]
    fn filtered_sums_never_exceed_unfiltered() {
        let data = sample();
        let all: Vec<&CarSale> = data.iter().collect();
        let toyota: Vec<&CarSale> = data
            .iter()
            .filter(|s| s.manufacturer == "Toyota")
            .collect();

        let full = sales_by_manufacturer(&all);
        for (key, value) in sales_by_manufacturer(&toyota).iter() {
            assert!(value <= full.get(key).unwrap());
        }
        assert!(sales_by_model(&toyota).total() <= sales_by_model(&all).total());
    }

    #[test]
    fn distinct_counts() {
        let data = sample();
        let subset: Vec<&CarSale> = data.iter().collect();
        assert_eq!(distinct_count(&subset, CategoryColumn::Model), 4);
        assert_eq!(distinct_count(&subset, CategoryColumn::Manufacturer), 3);
        assert_eq!(distinct_count(&subset, CategoryColumn::VehicleType), 2);
    }
}
