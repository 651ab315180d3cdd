use std::collections::BTreeMap;

use arrow::array::Array;

use super::model::{FrameError, IrisFrame, Species};

// ---------------------------------------------------------------------------
// Group-by on the species label
// ---------------------------------------------------------------------------

/// Row indices belonging to each species. Keys iterate alphabetically.
pub type SpeciesGroups = BTreeMap<Species, Vec<usize>>;

/// Partition the rows of `frame` by species label.
///
/// Species with no rows are absent from the result.
pub fn group_indices(frame: &IrisFrame) -> Result<SpeciesGroups, FrameError> {
    let mut groups = SpeciesGroups::new();
    for (idx, species) in frame.species()?.into_iter().enumerate() {
        groups.entry(species).or_default().push(idx);
    }
    Ok(groups)
}

/// Values of `column` restricted to the rows in `indices`.
pub fn select(frame: &IrisFrame, column: &str, indices: &[usize]) -> Result<Vec<f64>, FrameError> {
    let col = frame.numeric(column)?;
    Ok(indices
        .iter()
        .filter(|&&i| col.is_valid(i))
        .map(|&i| col.value(i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PETAL_WIDTH;

    fn frame() -> IrisFrame {
        IrisFrame::from_columns(
            [
                vec![5.0, 6.0, 7.0, 5.5],
                vec![3.0, 3.0, 3.0, 3.0],
                vec![1.0, 4.0, 6.0, 1.5],
                vec![0.2, 1.3, 2.0, 0.3],
            ],
            vec![0, 1, 2, 0],
            &["setosa", "versicolor", "virginica"],
        )
        .unwrap()
    }

    #[test]
    fn groups_are_keyed_alphabetically() {
        let groups = group_indices(&frame()).unwrap();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, Species::ALL.to_vec());
        assert_eq!(groups[&Species::Setosa], vec![0, 3]);
        assert_eq!(groups[&Species::Virginica], vec![2]);
    }

    #[test]
    fn absent_species_has_no_group() {
        let f = IrisFrame::from_columns(
            [vec![5.0], vec![3.0], vec![1.0], vec![0.2]],
            vec![0],
            &["setosa", "versicolor", "virginica"],
        )
        .unwrap();
        let groups = group_indices(&f).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(!groups.contains_key(&Species::Versicolor));
    }

    #[test]
    fn select_picks_rows_in_order() {
        let f = frame();
        let values = select(&f, PETAL_WIDTH, &[3, 0]).unwrap();
        assert_eq!(values, vec![0.3, 0.2]);
    }
}
