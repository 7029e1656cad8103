use super::{load_csv, read_csv, DatasetError};
use crate::logic::features::encoding::EncodingError;
use crate::logic::features::layout::idx;
use std::io::Write;

const HEADER: &str = "Latitude,Longitude,Rainfall_mm,Temperature_C,Humidity_%,River_Discharge_m³_s,\
Water_Level_m,Elevation_m,Land_Cover,Soil_Type,Population_Density,Infrastructure,Historical_Floods,Flood_Occurred";

fn csv_with_rows(rows: &[&str]) -> String {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content
}

#[test]
fn test_read_processed_rows() {
    let content = csv_with_rows(&[
        "10,20,50,28,80,120,3,5,2,2,500,2,1,1",
        "11,21,5,25,60,80,1,40,0,1,100,0,0,0",
    ]);

    let dataset = read_csv(content.as_bytes(), "Flood_Occurred").unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.labels(), &[1, 0]);
    assert_eq!(dataset.class_counts(), [1, 1]);

    let first = dataset.observations()[0];
    assert_eq!(first.get(idx::RAINFALL_MM), Some(50.0));
    assert_eq!(first.get(idx::LAND_COVER), Some(2.0));
}

#[test]
fn test_category_names_encoded_like_requests() {
    let content = csv_with_rows(&["10,20,50,28,80,120,3,5,Urban,Clay,500,2,1,1"]);
    let dataset = read_csv(content.as_bytes(), "Flood_Occurred").unwrap();

    let row = dataset.observations()[0];
    assert_eq!(row.get(idx::LAND_COVER), Some(2.0));
    assert_eq!(row.get(idx::SOIL_TYPE), Some(2.0));
}

#[test]
fn test_unknown_category_fails_with_row() {
    let content = csv_with_rows(&[
        "10,20,50,28,80,120,3,5,Urban,Clay,500,2,1,1",
        "10,20,50,28,80,120,3,5,urban,Clay,500,2,1,1",
    ]);

    match read_csv(content.as_bytes(), "Flood_Occurred") {
        Err(DatasetError::InvalidCategory { row, source }) => {
            assert_eq!(row, 3);
            assert_eq!(
                source,
                EncodingError::InvalidCategory {
                    field: "Land_Cover",
                    value: "urban".to_string(),
                }
            );
        }
        other => panic!("expected InvalidCategory, got {:?}", other),
    }
}

#[test]
fn test_out_of_domain_code_rejected() {
    let content = csv_with_rows(&["10,20,50,28,80,120,3,5,2,5,500,2,1,1"]);
    assert!(matches!(
        read_csv(content.as_bytes(), "Flood_Occurred"),
        Err(DatasetError::InvalidCategory { row: 2, .. })
    ));
}

#[test]
fn test_missing_columns_listed() {
    let content = "Latitude,Longitude\n1,2\n";
    match read_csv(content.as_bytes(), "Flood_Occurred") {
        Err(DatasetError::MissingColumns(missing)) => {
            assert_eq!(missing.len(), 12);
            assert_eq!(missing[0], "Rainfall_mm");
            assert_eq!(missing.last().map(String::as_str), Some("Flood_Occurred"));
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_invalid_label_rejected() {
    let content = csv_with_rows(&["10,20,50,28,80,120,3,5,2,2,500,2,1,yes"]);
    assert!(matches!(
        read_csv(content.as_bytes(), "Flood_Occurred"),
        Err(DatasetError::InvalidLabel { row: 2, .. })
    ));
}

#[test]
fn test_invalid_number_rejected() {
    let content = csv_with_rows(&["10,20,heavy,28,80,120,3,5,2,2,500,2,1,0"]);
    match read_csv(content.as_bytes(), "Flood_Occurred") {
        Err(DatasetError::InvalidNumber { row, column, value }) => {
            assert_eq!(row, 2);
            assert_eq!(column, "Rainfall_mm");
            assert_eq!(value, "heavy");
        }
        other => panic!("expected InvalidNumber, got {:?}", other),
    }
}

#[test]
fn test_column_order_and_alias_are_irrelevant() {
    let content = "Flood_Occurred,Soil_Type,Land_Cover,River_Discharge,Latitude,Longitude,Rainfall_mm,\
Temperature_C,Humidity_%,Water_Level_m,Elevation_m,Population_Density,Infrastructure,Historical_Floods,Notes\n\
1,Clay,Urban,120,10,20,50,28,80,3,5,500,2,1,ignored\n";

    let dataset = read_csv(content.as_bytes(), "Flood_Occurred").unwrap();
    let row = dataset.observations()[0];
    assert_eq!(row.get(idx::RIVER_DISCHARGE), Some(120.0));
    assert_eq!(row.get(idx::LATITUDE), Some(10.0));
    assert_eq!(row.get(idx::SOIL_TYPE), Some(2.0));
}

#[test]
fn test_empty_dataset_rejected() {
    assert!(matches!(
        read_csv(HEADER.as_bytes(), "Flood_Occurred"),
        Err(DatasetError::Empty)
    ));
}

#[test]
fn test_load_csv_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flood.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", csv_with_rows(&["10,20,50,28,80,120,3,5,Rural,Silt,500,2,1,0"])).unwrap();

    let dataset = load_csv(&path, "Flood_Occurred").unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.observations()[0].get(idx::LAND_COVER), Some(1.0));
}

#[test]
fn test_load_csv_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_csv(&dir.path().join("absent.csv"), "Flood_Occurred"),
        Err(DatasetError::Csv(_))
    ));
}
