use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use oc_app::{Session, SessionConfig, SessionEvent, SessionOutput, UploadOutcome};
use oc_core::{ChartId, ChartType, ChartWidth};
use oc_data::UploadFile;
use oc_viz::PALETTE;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn session(prefix: &str) -> (Session, PathBuf) {
    let root = unique_temp_dir(prefix);
    let config = SessionConfig {
        storage_root: root.clone(),
        ..SessionConfig::default()
    };
    (Session::new(config).expect("failed to create session"), root)
}

fn sample_upload(name: &str) -> UploadFile {
    let mut csv = String::from(",area,fano,mean_intensity,eccentricity,solidity\n");
    let areas = [9000, 100, 8000, 7999, 15000, 8200, 10, 30000, 50, 9999];
    for (i, area) in areas.iter().enumerate() {
        csv.push_str(&format!("{i},{area},1.{i},1{i}0,0.5,0.9\n"));
    }
    let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    UploadFile::from_bytes(name, csv.as_bytes(), ts)
}

fn charts(output: SessionOutput) -> Vec<oc_app::RenderedChart> {
    match output {
        SessionOutput::Charts(charts) => charts,
        other => panic!("expected charts, got {:?}", other),
    }
}

#[test]
fn upload_render_and_reset() {
    let (mut session, root) = session("oc_session_flow");

    let output = session
        .dispatch(SessionEvent::Upload {
            files: vec![sample_upload("a.csv"), sample_upload("b.csv")],
        })
        .unwrap();
    let SessionOutput::Uploads(outcomes) = output else {
        panic!("expected upload outcomes");
    };
    for outcome in &outcomes {
        match outcome {
            UploadOutcome::Accepted(summary) => assert_eq!(summary.row_count, 6),
            UploadOutcome::Rejected { message, .. } => panic!("rejected: {message}"),
        }
    }

    let rendered = charts(
        session
            .dispatch(SessionEvent::AddChart { width: None })
            .unwrap(),
    );
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].spec.id, ChartId::FIRST);
    assert_eq!(rendered[0].figure.series_names(), ["a.csv", "b.csv"]);
    assert_eq!(rendered[0].figure.data[0].color(), Some(PALETTE[0]));
    assert_eq!(rendered[0].figure.data[1].color(), Some(PALETTE[1]));

    let output = session.dispatch(SessionEvent::Reset { count: 1 }).unwrap();
    assert_eq!(
        output,
        SessionOutput::Reset {
            deleted: vec!["a.csv".to_string(), "b.csv".to_string()],
            message: Some(r#"Previous .csv files deleted: ["a.csv", "b.csv"]"#.to_string()),
        }
    );
    assert!(session.charts().is_empty());
    assert!(session.ingestion().list_datasets().unwrap().is_empty());

    let output = session.dispatch(SessionEvent::Reset { count: 2 }).unwrap();
    assert_eq!(
        output,
        SessionOutput::Reset {
            deleted: Vec::new(),
            message: None,
        }
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn bad_file_does_not_block_siblings() {
    let (mut session, root) = session("oc_session_batch");

    let broken = UploadFile {
        filename: "broken.csv".to_string(),
        contents: "not a data url".to_string(),
        last_modified: Utc::now(),
    };
    let output = session
        .dispatch(SessionEvent::Upload {
            files: vec![broken, sample_upload("good.csv")],
        })
        .unwrap();
    let SessionOutput::Uploads(outcomes) = output else {
        panic!("expected upload outcomes");
    };
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(&outcomes[0], UploadOutcome::Rejected { filename, .. } if filename == "broken.csv"));
    assert!(matches!(&outcomes[1], UploadOutcome::Accepted(s) if s.row_count == 6));
    assert_eq!(
        session.ingestion().store().list_filenames().unwrap(),
        ["good.csv"]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn initial_reset_is_ignored() {
    let (mut session, root) = session("oc_session_guard");
    session
        .dispatch(SessionEvent::AddChart { width: None })
        .unwrap();
    let output = session.dispatch(SessionEvent::Reset { count: 0 }).unwrap();
    assert_eq!(output, SessionOutput::Unchanged);
    assert_eq!(session.charts().len(), 1);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn chart_events_route_by_id() {
    let (mut session, root) = session("oc_session_routing");
    session
        .dispatch(SessionEvent::Upload {
            files: vec![sample_upload("s.csv")],
        })
        .unwrap();
    for _ in 0..3 {
        session
            .dispatch(SessionEvent::AddChart {
                width: Some(ChartWidth::new(6).unwrap()),
            })
            .unwrap();
    }

    let second = ChartId::new(2).unwrap();
    let rendered = charts(
        session
            .dispatch(SessionEvent::ChangeChartType {
                id: second,
                chart_type: ChartType::MeanIntensity,
            })
            .unwrap(),
    );
    assert_eq!(
        rendered[1].figure.layout.title.as_deref(),
        Some("Histogram of mean_intensity")
    );
    assert_eq!(
        rendered[0].figure.layout.title.as_deref(),
        Some("Estimate of homogeneity for optical images")
    );

    let rendered = charts(
        session
            .dispatch(SessionEvent::RemoveChart { id: second })
            .unwrap(),
    );
    let ids: Vec<u64> = rendered.iter().map(|c| c.spec.id.get()).collect();
    assert_eq!(ids, [1, 3]);

    let missing = session.dispatch(SessionEvent::RenameChart {
        id: second,
        title: "gone".to_string(),
    });
    assert!(matches!(missing, Err(oc_app::AppError::ChartNotFound(_))));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn events_replay_from_yaml() {
    let (mut session, root) = session("oc_session_yaml");
    let script = "\
- event: add_chart
- event: add_chart
  width: 4
- event: change_chart_type
  id: 1
  chart_type: solidity
- event: rename_chart
  id: 2
  title: Narrow
";
    let events: Vec<SessionEvent> = serde_yaml::from_str(script).unwrap();
    for event in events {
        session.dispatch(event).unwrap();
    }

    let specs = session.charts().charts();
    assert_eq!(specs[0].chart_type, ChartType::Solidity);
    assert_eq!(specs[1].width.get(), 4);
    assert_eq!(specs[1].title.as_deref(), Some("Narrow"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn close_clears_storage() {
    let (mut session, root) = session("oc_session_close");
    session
        .dispatch(SessionEvent::Upload {
            files: vec![sample_upload("c.csv")],
        })
        .unwrap();
    let store_dir = session.ingestion().store().root_dir().to_path_buf();
    assert!(store_dir.exists());

    assert_eq!(session.close().unwrap(), ["c.csv"]);
    assert!(!store_dir.exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn storage_failure_mid_batch_reports_what_was_persisted() {
    let (mut session, root) = session("oc_session_partial_batch");
    let store_dir = session.ingestion().store().root_dir().to_path_buf();
    fs::create_dir_all(store_dir.join("b.csv")).unwrap();

    let err = session
        .dispatch(SessionEvent::Upload {
            files: vec![
                sample_upload("a.csv"),
                sample_upload("b.csv"),
                sample_upload("c.csv"),
            ],
        })
        .unwrap_err();
    let (filename, outcomes, source) = match err {
        oc_app::AppError::PartialBatch {
            filename,
            outcomes,
            source,
        } => (filename, outcomes, source),
        other => panic!("expected a partial batch error, got {other:?}"),
    };
    assert_eq!(filename, "b.csv");
    assert!(!source.is_per_file());
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], UploadOutcome::Accepted(s) if s.filename == "a.csv"));

    // What the error reports matches what a later listing sees.
    assert_eq!(
        session.ingestion().store().list_filenames().unwrap(),
        ["a.csv"]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn rejected_file_before_storage_failure_is_kept_in_outcomes() {
    let (mut session, root) = session("oc_session_partial_mixed");
    let store_dir = session.ingestion().store().root_dir().to_path_buf();
    fs::create_dir_all(store_dir.join("b.csv")).unwrap();

    let broken = UploadFile {
        filename: "broken.csv".to_string(),
        contents: "not a data url".to_string(),
        last_modified: Utc::now(),
    };
    let err = session
        .dispatch(SessionEvent::Upload {
            files: vec![broken, sample_upload("b.csv")],
        })
        .unwrap_err();
    let outcomes = match err {
        oc_app::AppError::PartialBatch { outcomes, .. } => outcomes,
        other => panic!("expected a partial batch error, got {other:?}"),
    };
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], UploadOutcome::Rejected { filename, .. } if filename == "broken.csv"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn failed_reset_keeps_charts() {
    let (mut session, root) = session("oc_session_failed_reset");
    session
        .dispatch(SessionEvent::AddChart { width: None })
        .unwrap();

    let store_dir = session.ingestion().store().root_dir().to_path_buf();
    fs::create_dir_all(&root).unwrap();
    fs::write(&store_dir, "not a directory").unwrap();

    let err = session
        .dispatch(SessionEvent::Reset { count: 1 })
        .unwrap_err();
    assert!(matches!(err, oc_app::AppError::Data(ref e) if !e.is_per_file()));
    assert_eq!(session.charts().len(), 1);

    fs::remove_file(&store_dir).unwrap();
    let output = session.dispatch(SessionEvent::Reset { count: 2 }).unwrap();
    assert!(matches!(output, SessionOutput::Reset { .. }));
    assert!(session.charts().is_empty());

    let _ = fs::remove_dir_all(&root);
}
