//! Console rendering for the pipeline.
//!
//! Every function returns the text it would print, so the output can be
//! compared between runs. Numbers use fixed precision.

use arrow::array::Array;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::util::pretty::pretty_format_batches;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::data::model::{IrisFrame, Species, PETAL_LENGTH, PETAL_WIDTH};
use crate::stats::{ColumnSummary, GroupedMeans};

pub const PREVIEW_ROWS: usize = 5;

pub const FINDING: &str =
    "Interesting Finding: On average, 'virginica' species has the highest petal length and width.";

pub const OBSERVATIONS: [&str; 3] = [
    "- 'Setosa' species has significantly smaller petal lengths and widths.",
    "- 'Virginica' species tends to have the largest features across the board.",
    "- There's a strong positive correlation between sepal length and petal length.",
];

/// Correlation at or above which "strong positive" holds.
pub const STRONG_CORRELATION: f64 = 0.7;

// ---------------------------------------------------------------------------
// Inspect
// ---------------------------------------------------------------------------

/// The first rows of the table.
pub fn preview(frame: &IrisFrame) -> Result<String, ArrowError> {
    Ok(pretty_format_batches(&[frame.head(PREVIEW_ROWS)])?.to_string())
}

#[derive(Debug, Tabled)]
struct InfoRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Non-Null Count")]
    non_null: String,
    #[tabled(rename = "Dtype")]
    dtype: String,
}

/// Index range, per-column non-null counts and types, memory usage.
pub fn info(frame: &IrisFrame) -> String {
    let batch = frame.batch();
    let rows: Vec<InfoRow> = batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .enumerate()
        .map(|(position, (field, col))| InfoRow {
            position,
            column: field.name().clone(),
            non_null: format!("{} non-null", col.len() - col.null_count()),
            dtype: dtype_name(field.data_type()),
        })
        .collect();

    let index = if frame.is_empty() {
        "RangeIndex: 0 entries".to_string()
    } else {
        format!("RangeIndex: {} entries, 0 to {}", frame.len(), frame.len() - 1)
    };

    format!(
        "{index}\nData columns (total {} columns):\n{}\nmemory usage: {} bytes",
        rows.len(),
        Table::new(&rows),
        batch.get_array_memory_size()
    )
}

fn dtype_name(dt: &DataType) -> String {
    match dt {
        DataType::Float64 => "float64".to_string(),
        DataType::Dictionary(_, _) => "category".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Tabled)]
struct NullRow {
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Missing")]
    nulls: usize,
}

/// Missing values per column.
pub fn null_counts(frame: &IrisFrame) -> String {
    let rows: Vec<NullRow> = frame
        .null_counts()
        .into_iter()
        .map(|(column, nulls)| NullRow { column, nulls })
        .collect();
    Table::new(&rows).to_string()
}

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

/// Describe table: one row per statistic, one column per measurement.
pub fn describe_table(summaries: &[ColumnSummary]) -> String {
    let mut builder = Builder::default();
    let header = std::iter::once(String::new()).chain(summaries.iter().map(|s| s.column.clone()));
    builder.push_record(header);

    let labels = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    for (row, label) in labels.iter().enumerate() {
        let cells = summaries.iter().map(|s| format_stat(s.rows()[row].1));
        builder.push_record(std::iter::once(label.to_string()).chain(cells));
    }
    builder.build().to_string()
}

/// Grouped means: one row per species (alphabetical), one column per
/// measurement.
pub fn grouped_table(grouped: &GroupedMeans) -> String {
    let mut builder = Builder::default();
    builder.push_record(std::iter::once("species".to_string()).chain(grouped.columns.iter().cloned()));
    for (species, means) in &grouped.means {
        let cells = means.iter().map(|m| format!("{m:.3}"));
        builder.push_record(std::iter::once(species.to_string()).chain(cells));
    }
    builder.build().to_string()
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

// ---------------------------------------------------------------------------
// Checks behind the authored sentences
// ---------------------------------------------------------------------------

/// Compare the authored sentences against computed data. Returns one message
/// per sentence the data does not support.
pub fn unsupported_claims(grouped: &GroupedMeans, sepal_petal_r: Option<f64>) -> Vec<String> {
    let mut problems = Vec::new();

    for column in [PETAL_LENGTH, PETAL_WIDTH] {
        match grouped.argmax(column) {
            Some(Species::Virginica) => {}
            other => problems.push(format!(
                "largest mean {column} belongs to {}, not virginica",
                describe_species(other)
            )),
        }
        match grouped.argmin(column) {
            Some(Species::Setosa) => {}
            other => problems.push(format!(
                "smallest mean {column} belongs to {}, not setosa",
                describe_species(other)
            )),
        }
    }

    match sepal_petal_r {
        Some(r) if r >= STRONG_CORRELATION => {}
        Some(r) => problems.push(format!(
            "sepal/petal length correlation is {r:.3}, below {STRONG_CORRELATION}"
        )),
        None => problems.push("sepal/petal length correlation is undefined".to_string()),
    }

    problems
}

fn describe_species(species: Option<Species>) -> String {
    species.map_or_else(|| "no species".to_string(), |s| s.to_string())
}
