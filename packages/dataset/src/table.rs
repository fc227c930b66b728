//! In-memory crime table and its derived read queries.

use std::collections::BTreeSet;

use crime_dash_crime_models::CrimeRecord;

/// The loaded crime dataset.
///
/// Rows carry no required order; every query that exposes an ordering
/// sorts explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeTable {
    records: Vec<CrimeRecord>,
}

impl CrimeTable {
    /// Wraps already-decoded records.
    #[must_use]
    pub const fn new(records: Vec<CrimeRecord>) -> Self {
        Self { records }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the distinct state names, sorted ascending.
    #[must_use]
    pub fn distinct_states(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Returns the distinct crime type names, sorted ascending.
    #[must_use]
    pub fn distinct_crime_types(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.crime_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Returns the earliest year present, or `None` for an empty table.
    #[must_use]
    pub fn min_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).min()
    }

    /// Returns the latest year present, or `None` for an empty table.
    #[must_use]
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Iterates over the records of one state.
    pub fn rows_for_state<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a CrimeRecord> {
        self.records.iter().filter(move |r| r.state == state)
    }
}

impl FromIterator<CrimeRecord> for CrimeTable {
    fn from_iter<T: IntoIterator<Item = CrimeRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CrimeTable {
        [
            CrimeRecord::new("Y", "Theft", 2019, 4.0),
            CrimeRecord::new("X", "Theft", 2021, 20.0),
            CrimeRecord::new("X", "Assault", 2018, 3.0),
            CrimeRecord::new("X", "Theft", 2020, 10.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn distinct_values_are_sorted_and_unique() {
        let table = table();
        assert_eq!(table.distinct_states(), vec!["X", "Y"]);
        assert_eq!(table.distinct_crime_types(), vec!["Assault", "Theft"]);
    }

    #[test]
    fn year_bounds() {
        let table = table();
        assert_eq!(table.min_year(), Some(2018));
        assert_eq!(table.max_year(), Some(2021));
        assert_eq!(CrimeTable::default().min_year(), None);
    }

    #[test]
    fn rows_for_state_filters_exactly() {
        let table = table();
        assert_eq!(table.rows_for_state("X").count(), 3);
        assert_eq!(table.rows_for_state("x").count(), 0);
    }
}
