use std::io::Write;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use iris_summary::data::filter::drop_missing;
use iris_summary::data::loader::{load_source, LoadOptions};
use iris_summary::error::LoadError;
use iris_summary::report::{Report, ReportSettings};
use iris_summary::summary::{count_missing, describe, group_mean, infer_types, ColumnType, Divisor};

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn load(path: &std::path::Path) -> iris_summary::data::model::Dataset {
    load_source(path.to_str().expect("utf-8 path"), &LoadOptions::default()).expect("load")
}

#[test]
fn headered_csv_with_gaps() {
    let file = write_temp(
        ".csv",
        "sepal_length,sepal_width,petal_length,petal_width,species\n\
         5.1,3.5,1.4,0.2,setosa\n\
         4.9,,1.4,0.2,setosa\n\
         7.0,3.2,4.7,1.4,versicolor\n\
         6.4,3.2,NA,1.5,versicolor\n",
    );
    let ds = load(file.path());
    assert_eq!(ds.len(), 4);

    let missing = count_missing(&ds);
    assert_eq!(missing["sepal_width"], 1);
    assert_eq!(missing["petal_length"], 1);
    assert_eq!(missing["species"], 0);

    let stats = describe(&ds, Divisor::Sample).unwrap();
    assert_eq!(stats["sepal_width"].count, 3);

    let clean = drop_missing(&ds);
    assert_eq!(clean.len(), 2);
    assert!(count_missing(&clean).values().all(|&n| n == 0));

    let means = group_mean(&ds, "species").unwrap();
    assert_abs_diff_eq!(means["setosa"]["sepal_width"], 3.5, epsilon = 1e-12);
    assert_abs_diff_eq!(means["versicolor"]["petal_length"], 4.7, epsilon = 1e-12);
}

#[test]
fn headerless_data_file_builds_full_report() {
    let file = write_temp(
        ".data",
        "5.1,3.5,1.4,0.2,Iris-setosa\n\
         4.9,3.0,1.4,0.2,Iris-setosa\n\
         4.7,3.2,1.3,0.2,Iris-setosa\n\
         7.0,3.2,4.7,1.4,Iris-versicolor\n\
         6.4,3.2,4.5,1.5,Iris-versicolor\n\
         6.9,3.1,4.9,1.5,Iris-versicolor\n\
         6.3,3.3,6.0,2.5,Iris-virginica\n\
         5.8,2.7,5.1,1.9,Iris-virginica\n\
         7.1,3.0,5.9,2.1,Iris-virginica\n\
         \n",
    );
    let ds = load(file.path());
    let report = Report::build(&ds, &ReportSettings::default()).unwrap();

    assert_eq!(report.rows, 9);
    assert_eq!(report.dtypes["species"], ColumnType::Categorical);
    assert_eq!(report.group_means.len(), 3);
    assert_abs_diff_eq!(
        report.correlation.get("petal_length", "petal_width").unwrap(),
        report.correlation.get("petal_width", "petal_length").unwrap()
    );
    assert!(report.correlation.get("petal_length", "petal_width").unwrap() > 0.9);

    let text = report.to_string();
    assert!(text.starts_with("Data Types of Columns:"));
    assert!(text.contains("Mean by species:"));
}

#[test]
fn json_records() {
    let file = write_temp(
        ".json",
        r#"[
            {"sepal_length": 5.1, "species": "setosa"},
            {"sepal_length": 6.2, "species": "virginica"},
            {"species": "virginica"}
        ]"#,
    );
    let ds = load(file.path());
    assert_eq!(ds.len(), 3);
    assert_eq!(count_missing(&ds)["sepal_length"], 1);

    let types = infer_types(&ds).unwrap();
    assert_eq!(types["sepal_length"], ColumnType::Numeric);
    assert_eq!(types["species"], ColumnType::Categorical);
}

#[test]
fn parquet_table() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("petal_length", DataType::Float64, true),
        Field::new("count", DataType::Int64, false),
        Field::new("species", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(vec![Some(1.4), None, Some(4.7)])),
        Arc::new(Int64Array::from(vec![1, 2, 3])),
        Arc::new(StringArray::from(vec!["setosa", "setosa", "versicolor"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path()).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load(file.path());
    assert_eq!(ds.columns(), &["petal_length", "count", "species"]);
    assert_eq!(count_missing(&ds)["petal_length"], 1);

    let means = group_mean(&ds, "species").unwrap();
    assert_abs_diff_eq!(means["setosa"]["petal_length"], 1.4, epsilon = 1e-12);
    assert_abs_diff_eq!(means["setosa"]["count"], 1.5, epsilon = 1e-12);
}

#[test]
fn unsupported_extension() {
    let file = write_temp(".xlsx", "not a spreadsheet");
    let err = load_source(file.path().to_str().unwrap(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
}

#[test]
fn missing_source_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iris.data");
    let err = load_source(path.to_str().unwrap(), &LoadOptions::default()).unwrap_err();
    assert!(err.to_string().starts_with("source not found"));
}
