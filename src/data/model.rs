use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, AsArray, DictionaryArray, Float64Array, Int8Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Int8Type, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const SEPAL_LENGTH: &str = "sepal length (cm)";
pub const SEPAL_WIDTH: &str = "sepal width (cm)";
pub const PETAL_LENGTH: &str = "petal length (cm)";
pub const PETAL_WIDTH: &str = "petal width (cm)";
pub const SPECIES: &str = "species";

/// Numeric measurement columns in table order.
pub const FEATURE_COLUMNS: [&str; 4] = [SEPAL_LENGTH, SEPAL_WIDTH, PETAL_LENGTH, PETAL_WIDTH];

// ---------------------------------------------------------------------------
// Species – the categorical label
// ---------------------------------------------------------------------------

/// One of the three Iris species. Variant order is alphabetical so that
/// `BTreeMap<Species, _>` iterates the way a group-by on the label would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    pub fn name(self) -> &'static str {
        match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Species::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Errors when reading columns back out of the frame
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' has type {actual}, expected {expected}")]
    WrongType {
        column: String,
        expected: &'static str,
        actual: DataType,
    },

    #[error("column '{column}' row {row}: unknown species label '{label}'")]
    UnknownLabel {
        column: String,
        row: usize,
        label: String,
    },
}

// ---------------------------------------------------------------------------
// IrisFrame – the loaded table
// ---------------------------------------------------------------------------

/// The in-memory table: four Float64 measurement columns followed by a
/// dictionary-encoded species column (Int8 codes over the species names).
#[derive(Debug, Clone)]
pub struct IrisFrame {
    batch: RecordBatch,
}

impl IrisFrame {
    /// Schema of the table as produced by the loader.
    pub fn schema() -> SchemaRef {
        let mut fields: Vec<Field> = FEATURE_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true))
            .collect();
        fields.push(Field::new(
            SPECIES,
            DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::Utf8)),
            true,
        ));
        Arc::new(Schema::new(fields))
    }

    /// Assemble a frame from measurement columns, class codes and the label
    /// names the codes index into.
    pub fn from_columns(
        features: [Vec<f64>; 4],
        codes: Vec<i8>,
        label_names: &[&str],
    ) -> Result<Self, ArrowError> {
        let keys = Int8Array::from(codes);
        let values = Arc::new(StringArray::from(label_names.to_vec()));
        let species = DictionaryArray::<Int8Type>::try_new(keys, values)?;

        let mut columns: Vec<Arc<dyn Array>> = features
            .into_iter()
            .map(|col| Arc::new(Float64Array::from(col)) as Arc<dyn Array>)
            .collect();
        columns.push(Arc::new(species));

        let batch = RecordBatch::try_new(Self::schema(), columns)?;
        Ok(IrisFrame { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Per-column null counts in table order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.batch
            .schema()
            .fields()
            .iter()
            .zip(self.batch.columns())
            .map(|(f, col)| (f.name().clone(), col.null_count()))
            .collect()
    }

    /// A numeric measurement column.
    pub fn numeric(&self, column: &str) -> Result<&Float64Array, FrameError> {
        let col = self
            .batch
            .column_by_name(column)
            .ok_or_else(|| FrameError::MissingColumn(column.to_string()))?;
        col.as_primitive_opt::<Float64Type>()
            .ok_or_else(|| FrameError::WrongType {
                column: column.to_string(),
                expected: "Float64",
                actual: col.data_type().clone(),
            })
    }

    /// Non-null values of a numeric column, in row order.
    pub fn values(&self, column: &str) -> Result<Vec<f64>, FrameError> {
        Ok(self.numeric(column)?.iter().flatten().collect())
    }

    /// The species label of every row, decoded from the dictionary column.
    pub fn species(&self) -> Result<Vec<Species>, FrameError> {
        let col = self
            .batch
            .column_by_name(SPECIES)
            .ok_or_else(|| FrameError::MissingColumn(SPECIES.to_string()))?;
        let wrong_type = || FrameError::WrongType {
            column: SPECIES.to_string(),
            expected: "Dictionary(Int8, Utf8)",
            actual: col.data_type().clone(),
        };
        let dict = col.as_dictionary_opt::<Int8Type>().ok_or_else(wrong_type)?;
        let names = dict.values().as_string_opt::<i32>().ok_or_else(wrong_type)?;

        dict.keys()
            .iter()
            .enumerate()
            .map(|(row, key)| {
                let label = key.map(|k| names.value(k as usize)).unwrap_or("<null>");
                Species::from_name(label).ok_or_else(|| FrameError::UnknownLabel {
                    column: SPECIES.to_string(),
                    row,
                    label: label.to_string(),
                })
            })
            .collect()
    }

    /// First `n` rows (or fewer, if the table is shorter).
    pub fn head(&self, n: usize) -> RecordBatch {
        self.batch.slice(0, n.min(self.len()))
    }
}
