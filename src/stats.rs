use std::collections::BTreeMap;

use crate::data::group::{group_indices, select};
use crate::data::model::{FEATURE_COLUMNS, FrameError, IrisFrame, Species};

// ---------------------------------------------------------------------------
// Descriptive statistics per numeric column
// ---------------------------------------------------------------------------

/// count / mean / std / min / quartiles / max of one column.
///
/// `std` is the sample standard deviation (n − 1 denominator). Quartiles use
/// linear interpolation between closest ranks. For an empty column every
/// statistic except `count` is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        ColumnSummary {
            column: column.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Statistic rows in display order, labelled the way a describe table is.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summaries of every numeric column, in table order.
pub fn describe(frame: &IrisFrame) -> Result<Vec<ColumnSummary>, FrameError> {
    FEATURE_COLUMNS
        .iter()
        .map(|column| Ok(ColumnSummary::from_values(column, &frame.values(column)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean of each numeric column (in [`FEATURE_COLUMNS`] order) per species.
/// Keys iterate alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMeans {
    pub columns: Vec<String>,
    pub means: BTreeMap<Species, Vec<f64>>,
}

impl GroupedMeans {
    /// Mean of `column` for `species`, if both exist.
    pub fn get(&self, species: Species, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.means.get(&species).map(|row| row[idx])
    }

    /// Species with the largest mean in `column`.
    pub fn argmax(&self, column: &str) -> Option<Species> {
        self.extreme(column, |candidate, best| candidate > best)
    }

    /// Species with the smallest mean in `column`.
    pub fn argmin(&self, column: &str) -> Option<Species> {
        self.extreme(column, |candidate, best| candidate < best)
    }

    fn extreme(&self, column: &str, better: impl Fn(f64, f64) -> bool) -> Option<Species> {
        let mut best: Option<(Species, f64)> = None;
        for &species in self.means.keys() {
            let value = self.get(species, column)?;
            match best {
                Some((_, current)) if !better(value, current) => {}
                _ => best = Some((species, value)),
            }
        }
        best.map(|(species, _)| species)
    }
}

pub fn grouped_means(frame: &IrisFrame) -> Result<GroupedMeans, FrameError> {
    let groups = group_indices(frame)?;
    let mut means = BTreeMap::new();
    for (species, indices) in &groups {
        let row = FEATURE_COLUMNS
            .iter()
            .map(|column| Ok(mean(&select(frame, column, indices)?)))
            .collect::<Result<Vec<f64>, FrameError>>()?;
        means.insert(*species, row);
    }
    Ok(GroupedMeans {
        columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        means,
    })
}

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile `q` of an ascending slice, linearly interpolated at `(n − 1)·q`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Pearson correlation coefficient. `None` when the inputs differ in
/// length, have fewer than two pairs, or either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_iris;
    use crate::data::model::{PETAL_LENGTH, PETAL_WIDTH, SEPAL_LENGTH, SEPAL_WIDTH};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn quantiles_interpolate_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile_sorted(&sorted, 0.25), 1.75));
        assert!(close(quantile_sorted(&sorted, 0.5), 2.5));
        assert!(close(quantile_sorted(&sorted, 1.0), 4.0));
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn std_uses_sample_denominator() {
        assert!(close(sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.138089935));
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn empty_column_summary_is_nan() {
        let s = ColumnSummary::from_values("x", &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan() && s.min.is_nan() && s.max.is_nan());
    }

    #[test]
    fn describe_matches_reference_values() {
        let frame = load_iris().unwrap();
        let summaries = describe(&frame).unwrap();
        assert_eq!(summaries.len(), 4);

        let sl = &summaries[0];
        assert_eq!(sl.column, SEPAL_LENGTH);
        assert!((sl.mean - 5.843333).abs() < 1e-5);
        assert!((sl.std - 0.828066).abs() < 1e-5);
        assert_eq!((sl.min, sl.max), (4.3, 7.9));
        assert!(close(sl.q25, 5.1) && close(sl.median, 5.8) && close(sl.q75, 6.4));

        let pl = &summaries[2];
        assert_eq!(pl.column, PETAL_LENGTH);
        assert!(close(pl.median, 4.35));
        assert!((pl.std - 1.765298).abs() < 1e-5);
    }

    #[test]
    fn describe_is_ordered_and_complete() {
        let frame = load_iris().unwrap();
        for s in describe(&frame).unwrap() {
            assert_eq!(s.count, 150, "{}", s.column);
            assert!(s.min <= s.q25, "{}", s.column);
            assert!(s.q25 <= s.median, "{}", s.column);
            assert!(s.median <= s.q75, "{}", s.column);
            assert!(s.q75 <= s.max, "{}", s.column);
        }
    }

    #[test]
    fn grouped_means_match_reference_values() {
        let frame = load_iris().unwrap();
        let g = grouped_means(&frame).unwrap();
        let keys: Vec<_> = g.means.keys().copied().collect();
        assert_eq!(keys, Species::ALL.to_vec());
        assert!(close(g.get(Species::Setosa, SEPAL_LENGTH).unwrap(), 5.006));
        assert!(close(g.get(Species::Versicolor, SEPAL_WIDTH).unwrap(), 2.770));
        assert!(close(g.get(Species::Virginica, PETAL_LENGTH).unwrap(), 5.552));
        assert!(close(g.get(Species::Virginica, PETAL_WIDTH).unwrap(), 2.026));
    }

    #[test]
    fn virginica_has_strictly_largest_petals() {
        let frame = load_iris().unwrap();
        let g = grouped_means(&frame).unwrap();
        for column in [PETAL_LENGTH, PETAL_WIDTH] {
            let virginica = g.get(Species::Virginica, column).unwrap();
            for other in [Species::Setosa, Species::Versicolor] {
                assert!(virginica > g.get(other, column).unwrap(), "{column} vs {other}");
            }
            assert_eq!(g.argmax(column), Some(Species::Virginica));
            assert_eq!(g.argmin(column), Some(Species::Setosa));
        }
    }

    #[test]
    fn pearson_handles_degenerate_input() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(), 1.0));
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(), -1.0));
    }

    #[test]
    fn sepal_and_petal_length_are_strongly_correlated() {
        let frame = load_iris().unwrap();
        let r = pearson(
            &frame.values(SEPAL_LENGTH).unwrap(),
            &frame.values(PETAL_LENGTH).unwrap(),
        )
        .unwrap();
        assert!((r - 0.871754).abs() < 1e-5, "r = {r}");
    }
}
