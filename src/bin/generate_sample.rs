use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-species (mean, std) for sepal length, sepal width, petal length,
/// petal width; close to the real Iris measurements.
const SPECIES: [(&str, [(f64, f64); 4]); 3] = [
    ("Iris-setosa", [(5.006, 0.352), (3.428, 0.379), (1.462, 0.174), (0.246, 0.105)]),
    ("Iris-versicolor", [(5.936, 0.516), (2.770, 0.314), (4.260, 0.470), (1.326, 0.198)]),
    ("Iris-virginica", [(6.588, 0.636), (2.974, 0.322), (5.552, 0.552), (2.026, 0.275)]),
];

const ROWS_PER_SPECIES: usize = 50;

/// One measurement: a Box-Muller normal draw, recorded to one decimal and
/// never below 0.1 cm.
fn measure<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-10);
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    ((mean + std_dev * z).max(0.1) * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut columns: [Vec<f64>; 4] = Default::default();
    let mut species: Vec<&str> = Vec::new();

    for (name, dims) in &SPECIES {
        for _ in 0..ROWS_PER_SPECIES {
            for (col, &(mean, std_dev)) in columns.iter_mut().zip(dims) {
                col.push(measure(&mut rng, mean, std_dev));
            }
            species.push(*name);
        }
    }

    // Headerless CSV, same layout as the UCI iris.data file
    let csv_path = "iris_sample.data";
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)
        .context("creating CSV output")?;
    for (i, name) in species.iter().enumerate() {
        let mut row: Vec<String> = columns.iter().map(|c| format!("{:.1}", c[i])).collect();
        row.push(name.to_string());
        writer.write_record(&row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;

    // Parquet with named columns
    let names = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
    let mut fields: Vec<Field> = names
        .iter()
        .map(|n| Field::new(*n, DataType::Float64, false))
        .collect();
    fields.push(Field::new("species", DataType::Utf8, false));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<arrow::array::ArrayRef> = columns
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.clone())) as arrow::array::ArrayRef)
        .collect();
    arrays.push(Arc::new(StringArray::from(species.clone())));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let parquet_path = "iris_sample.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} rows ({} species) to {csv_path} and {parquet_path}",
        species.len(),
        SPECIES.len()
    );
    Ok(())
}
