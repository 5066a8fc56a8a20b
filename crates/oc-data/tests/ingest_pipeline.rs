use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use oc_data::*;
use proptest::prelude::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn measurement_csv(areas: &[f64]) -> String {
    let mut csv = String::from(",label,area,fano,mean_intensity,eccentricity,solidity\n");
    for (i, area) in areas.iter().enumerate() {
        csv.push_str(&format!(
            "{i},{},{area},{:.2},{:.1},0.5,0.9\n",
            i + 1,
            1.0 + i as f64 * 0.1,
            100.0 + i as f64
        ));
    }
    csv
}

fn upload(name: &str, csv: &str) -> UploadFile {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    UploadFile::from_bytes(name, csv.as_bytes(), ts)
}

const TEN_ROWS: [f64; 10] = [
    9000.0, 7999.0, 8000.0, 500.0, 12000.0, 8001.0, 100.0, 20000.0, 7000.0, 8500.0,
];

#[test]
fn two_uploads_then_reset() {
    let root = unique_temp_dir("oc_ingest_scenario");
    let mut store = DatasetStore::new(&root, "compare_optical").unwrap();

    for name in ["a.csv", "b.csv"] {
        let summary = parse_upload(&mut store, &upload(name, &measurement_csv(&TEN_ROWS))).unwrap();
        assert_eq!(summary.filename, name);
        assert_eq!(summary.row_count, 6);
    }

    let listed = store.list_datasets().unwrap();
    assert_eq!(listed.len(), 2);
    for (_, table) in &listed {
        assert_eq!(table.len(), 6);
    }

    assert_eq!(store.reset_all().unwrap(), ["a.csv", "b.csv"]);
    assert!(store.list_datasets().unwrap().is_empty());
    assert!(store.reset_all().unwrap().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn failed_parse_persists_nothing() {
    let root = unique_temp_dir("oc_ingest_failure");
    let mut store = DatasetStore::new(&root, "compare_optical").unwrap();

    let err = parse_upload(&mut store, &upload("broken.csv", ",area,fano\n0,9000,1\n")).unwrap_err();
    assert!(matches!(err, DataError::Parse { .. }));
    assert!(!store.has_dataset("broken.csv"));

    let bad_payload = UploadFile {
        filename: "garbled.csv".to_string(),
        contents: "data:text/csv;base64,***".to_string(),
        last_modified: Utc::now(),
    };
    let err = parse_upload(&mut store, &bad_payload).unwrap_err();
    assert!(matches!(err, DataError::Decode { .. }));
    assert!(store.list_filenames().unwrap().is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn reupload_replaces_dataset() {
    let root = unique_temp_dir("oc_ingest_replace");
    let mut store = DatasetStore::new(&root, "compare_optical").unwrap();

    parse_upload(&mut store, &upload("a.csv", &measurement_csv(&TEN_ROWS))).unwrap();
    let summary = parse_upload(&mut store, &upload("a.csv", &measurement_csv(&[9000.0]))).unwrap();
    assert_eq!(summary.row_count, 1);
    assert_eq!(store.load_dataset("a.csv").unwrap().len(), 1);

    let _ = fs::remove_dir_all(&root);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn persisted_rows_meet_area_threshold(areas in prop::collection::vec(0.0_f64..20_000.0, 0..40)) {
        let root = unique_temp_dir("oc_ingest_prop");
        let mut store = DatasetStore::new(&root, "compare_optical").unwrap();

        let summary = parse_upload(&mut store, &upload("p.csv", &measurement_csv(&areas))).unwrap();
        let expected = areas.iter().filter(|a| **a >= MIN_AREA).count();
        prop_assert_eq!(summary.row_count, expected);

        let stored = store.load_dataset("p.csv").unwrap();
        for area in stored.column_f64("area").unwrap() {
            prop_assert!(area >= MIN_AREA);
        }

        let _ = fs::remove_dir_all(&root);
    }
}
