use arrow::error::ArrowError;
use log::debug;
use serde::Deserialize;

use super::model::IrisFrame;

/// The bundled dataset, compiled into the binary.
pub const IRIS_CSV: &str = include_str!("../../data/iris.csv");

const N_FEATURES: usize = 4;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset source is empty")]
    Empty,

    #[error("malformed header: {0}")]
    Header(String),

    #[error("header declares {declared} features, expected {expected}")]
    FeatureCount { declared: usize, expected: usize },

    #[error("row {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: class code {code} has no label (only {labels} declared)")]
    UnknownClass { row: usize, code: u8, labels: usize },

    #[error("header declares {declared} samples but {actual} rows were read")]
    RowCount { declared: usize, actual: usize },

    #[error("building table: {0}")]
    Arrow(#[from] ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the bundled Iris dataset.
pub fn load_iris() -> Result<IrisFrame, LoadError> {
    load_from_str(IRIS_CSV)
}

/// Parse a dataset in the bundled layout.
///
/// ```text
/// 150,4,setosa,versicolor,virginica     <- n_samples, n_features, label names
/// 5.1,3.5,1.4,0.2,0                     <- features..., class code
/// ...
/// ```
pub fn load_from_str(source: &str) -> Result<IrisFrame, LoadError> {
    let (header, body) = source
        .trim_start()
        .split_once('\n')
        .ok_or(LoadError::Empty)?;
    let header = parse_header(header)?;
    let labels: Vec<&str> = header.labels.iter().map(String::as_str).collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut features: [Vec<f64>; N_FEATURES] =
        std::array::from_fn(|_| Vec::with_capacity(header.n_samples));
    let mut codes = Vec::with_capacity(header.n_samples);

    for (row, result) in reader.deserialize::<IrisRecord>().enumerate() {
        let record = result.map_err(|source| LoadError::Record { row, source })?;
        if usize::from(record.class) >= labels.len() {
            return Err(LoadError::UnknownClass {
                row,
                code: record.class,
                labels: labels.len(),
            });
        }
        features[0].push(record.sepal_length);
        features[1].push(record.sepal_width);
        features[2].push(record.petal_length);
        features[3].push(record.petal_width);
        codes.push(record.class as i8);
    }

    if codes.len() != header.n_samples {
        return Err(LoadError::RowCount {
            declared: header.n_samples,
            actual: codes.len(),
        });
    }

    debug!(
        "parsed {} rows with labels {:?}",
        codes.len(),
        header.labels
    );
    Ok(IrisFrame::from_columns(features, codes, &labels)?)
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IrisRecord {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    class: u8,
}

#[derive(Debug)]
struct Header {
    n_samples: usize,
    labels: Vec<String>,
}

fn parse_header(line: &str) -> Result<Header, LoadError> {
    let mut fields = line.trim().split(',').map(str::trim);

    let n_samples = fields
        .next()
        .and_then(|f| f.parse::<usize>().ok())
        .ok_or_else(|| LoadError::Header(format!("bad sample count in '{line}'")))?;
    let n_features = fields
        .next()
        .and_then(|f| f.parse::<usize>().ok())
        .ok_or_else(|| LoadError::Header(format!("bad feature count in '{line}'")))?;
    if n_features != N_FEATURES {
        return Err(LoadError::FeatureCount {
            declared: n_features,
            expected: N_FEATURES,
        });
    }

    let labels: Vec<String> = fields.map(str::to_string).collect();
    if labels.is_empty() || labels.iter().any(|l| l.is_empty()) {
        return Err(LoadError::Header(format!("missing label names in '{line}'")));
    }
    if labels.len() > i8::MAX as usize {
        return Err(LoadError::Header(format!("too many labels in '{line}'")));
    }

    Ok(Header { n_samples, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FEATURE_COLUMNS, Species};

    #[test]
    fn bundled_dataset_has_150_complete_rows() {
        let frame = load_iris().unwrap();
        assert_eq!(frame.len(), 150);
        assert_eq!(frame.column_names().len(), 5);
        for (column, nulls) in frame.null_counts() {
            assert_eq!(nulls, 0, "nulls in {column}");
        }
    }

    #[test]
    fn bundled_dataset_has_fifty_of_each_species() {
        let species = load_iris().unwrap().species().unwrap();
        for s in Species::ALL {
            assert_eq!(species.iter().filter(|x| **x == s).count(), 50, "{s}");
        }
    }

    #[test]
    fn first_row_matches_source() {
        let frame = load_iris().unwrap();
        let first: Vec<f64> = FEATURE_COLUMNS
            .iter()
            .map(|c| frame.numeric(c).unwrap().value(0))
            .collect();
        assert_eq!(first, vec![5.1, 3.5, 1.4, 0.2]);
        assert_eq!(frame.species().unwrap()[0], Species::Setosa);
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(load_from_str(""), Err(LoadError::Empty)));
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let src = "1,3,setosa\n5.1,3.5,1.4,0\n";
        assert!(matches!(
            load_from_str(src),
            Err(LoadError::FeatureCount { declared: 3, .. })
        ));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let src = "1,4,setosa\n5.1,oops,1.4,0.2,0\n";
        assert!(matches!(
            load_from_str(src),
            Err(LoadError::Record { row: 0, .. })
        ));
    }

    #[test]
    fn class_code_must_index_a_label() {
        let src = "1,4,setosa,versicolor\n5.1,3.5,1.4,0.2,2\n";
        assert!(matches!(
            load_from_str(src),
            Err(LoadError::UnknownClass { row: 0, code: 2, labels: 2 })
        ));
    }

    #[test]
    fn truncated_source_is_rejected() {
        let truncated: String = IRIS_CSV.lines().take(101).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            load_from_str(&truncated),
            Err(LoadError::RowCount { declared: 150, actual: 100 })
        ));
    }

    #[test]
    fn error_message_names_the_cause() {
        let msg = load_from_str("x,4,setosa\n").unwrap_err().to_string();
        assert!(msg.contains("bad sample count"), "{msg}");
    }
}
