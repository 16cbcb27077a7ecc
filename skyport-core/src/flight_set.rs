use std::collections::{BTreeSet, HashMap};

use skyport_shared::models::FlightSummary;

/// Catalog entries keyed by flight number. Numbers the catalog does not know
/// are simply absent.
pub type CatalogSnapshot = HashMap<String, FlightSummary>;

/// Distinct flight numbers referenced by a batch of tickets.
///
/// This is the hand-off between the ledger stage and the catalog stage of an
/// aggregation; it is ordered so the outbound query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightNumberSet(BTreeSet<String>);

impl FlightNumberSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flight_number: impl Into<String>) {
        self.0.insert(flight_number.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, flight_number: &str) -> bool {
        self.0.contains(flight_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FlightNumberSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let set: FlightNumberSet = ["AFL031", "SU100", "AFL031"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["AFL031", "SU100"]);
    }
}
