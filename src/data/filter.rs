use std::collections::{BTreeMap, BTreeSet};

use super::model::KineticsDataset;

// ---------------------------------------------------------------------------
// Filter predicate: which facet values are selected
// ---------------------------------------------------------------------------

/// Per-facet selection state: maps facet name → set of selected values.
/// A facet absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<String>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(dataset: &KineticsDataset) -> FilterState {
    dataset.unique_values.clone()
}

/// Return indices of entries that pass all active filters.
///
/// An entry passes a facet filter when:
/// * The facet is not present in `filters` → passes (no constraint)
/// * The filter set for that facet is empty → nothing selected → fails
/// * The entry's value for that facet is in the selected set → passes
pub fn filtered_indices(dataset: &KineticsDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .facets
        .iter()
        .enumerate()
        .filter(|(_, facets)| {
            filters.iter().all(|(facet, selected)| {
                if selected.is_empty() {
                    return false;
                }
                if dataset
                    .unique_values
                    .get(facet)
                    .is_some_and(|all| selected.len() == all.len())
                {
                    return true;
                }
                facets.get(facet).is_some_and(|value| selected.contains(value))
            })
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{KineticsEntry, Units, FACET_DIRECTION, FACET_SOURCE};

    fn dataset() -> KineticsDataset {
        let mut reverse = KineticsEntry::new("R1", "NIST");
        reverse.forward = false;
        KineticsDataset::from_entries(
            vec![
                KineticsEntry::new("R1", "NIST"),
                reverse,
                KineticsEntry::new("R2", "Training"),
            ],
            Units::default(),
        )
    }

    #[test]
    fn everything_selected_shows_all() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn partial_selection_narrows() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.insert(FACET_SOURCE.to_string(), BTreeSet::from(["NIST".to_string()]));
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1]);

        filters.insert(FACET_DIRECTION.to_string(), BTreeSet::from(["reverse".to_string()]));
        assert_eq!(filtered_indices(&ds, &filters), vec![1]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.insert(FACET_SOURCE.to_string(), BTreeSet::new());
        assert!(filtered_indices(&ds, &filters).is_empty());
    }
}
