//! Batch validation over folders of connector configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use connector_rules::ConnectorType;
use connector_rules_cli::batch::{BatchValidator, FileOutcome, collect_config_files};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn rules_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "general_managed_configs.csv",
        "name,what_do_do,default\n\
         connector.class,REQUIRE,\n\
         kafka.auth.mode,ALLOW default,KAFKA_API_KEY\n",
    );
    write(
        dir.path(),
        "managed_source_configs.csv",
        "name,what to do\n\
         connection.host,REQUIRE\n",
    );
    write(
        dir.path(),
        "managed_sink_configs.csv",
        "name,what to do\n\
         topics,REQUIRE\n\
         csfle.enabled,DISALLOW\n",
    );
    dir
}

fn configs_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "good.json",
        &json!({
            "connector.class": "MongoDbAtlasSource",
            "connection.host": "cluster0.example.net",
        })
        .to_string(),
    );
    write(
        dir.path(),
        "bad.json",
        &json!({
            "connector.class": "MongoDbAtlasSink",
            "kafka.auth.mode": "SERVICE_ACCOUNT",
        })
        .to_string(),
    );
    write(dir.path(), "broken.json", "[1, 2]");
    write(dir.path(), "notes.txt", "not a config");
    dir
}

#[test]
fn collects_json_files_sorted() {
    let configs = configs_dir();
    let files = collect_config_files(&[configs.path().to_path_buf()]).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bad.json", "broken.json", "good.json"]);
}

#[test]
fn explicit_files_are_deduplicated() {
    let configs = configs_dir();
    let good = configs.path().join("good.json");
    let files = collect_config_files(&[good.clone(), configs.path().to_path_buf()]).unwrap();
    assert_eq!(files.iter().filter(|path| **path == good).count(), 1);
}

#[test]
fn missing_path_is_an_error() {
    let configs = configs_dir();
    let missing = configs.path().join("absent.json");
    let error = collect_config_files(&[missing]).unwrap_err();
    assert!(error.to_string().contains("path not found"));
}

#[test]
fn batch_report_snapshot() {
    let rules = rules_dir();
    let configs = configs_dir();
    let files = collect_config_files(&[configs.path().to_path_buf()]).unwrap();

    let mut validator = BatchValidator::new(rules.path(), None);
    let report = validator.validate_files(&files).unwrap();
    assert_eq!(report.accepted_count(), 1);
    assert_eq!(report.skipped_count(), 2);
    assert!(report.has_skipped());

    let json = serde_json::to_string_pretty(&report).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "files": [
        {
          "file": "bad.json",
          "connector_type": "sink",
          "status": "rejected",
          "result": {
            "is_valid": false,
            "missing_required": [
              "topics"
            ],
            "disallowed_present": [],
            "error_messages": [
              "Only KAFKA_API_KEY is supported for kafka.auth.mode",
              "Missing required fields: topics"
            ]
          }
        },
        {
          "file": "broken.json",
          "connector_type": null,
          "status": "unreadable",
          "reason": "expected a JSON object"
        },
        {
          "file": "good.json",
          "connector_type": "source",
          "status": "accepted"
        }
      ]
    }
    "#);
}

#[test]
fn forced_type_skips_detection() {
    let rules = rules_dir();
    let mut validator = BatchValidator::new(rules.path(), Some(ConnectorType::Sink));
    let config = json!({ "topics": "orders" });
    let report = validator
        .validate_config("forced.json", config.as_object().unwrap())
        .unwrap();
    assert_eq!(report.connector_type, Some(ConnectorType::Sink));
    assert_eq!(
        report.issues(),
        vec!["Missing required fields: connector.class"]
    );
}

#[test]
fn undetectable_class_is_skipped_not_fatal() {
    let rules = rules_dir();
    let mut validator = BatchValidator::new(rules.path(), None);
    let config = json!({ "connector.class": "MongoDbAtlas" });
    let report = validator
        .validate_config("odd.json", config.as_object().unwrap())
        .unwrap();
    assert_eq!(report.connector_type, None);
    match &report.outcome {
        FileOutcome::Unreadable { reason } => {
            assert!(reason.contains("cannot determine connector type"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_rules_abort_the_batch() {
    let empty = TempDir::new().unwrap();
    let configs = configs_dir();
    let mut validator = BatchValidator::new(empty.path(), None);
    let error = validator
        .validate_file(&configs.path().join("good.json"))
        .unwrap_err();
    assert!(format!("{error:#}").contains("good.json"));
}

#[test]
fn rule_store_is_loaded_once_per_type() {
    let rules = rules_dir();
    let mut validator = BatchValidator::new(rules.path(), None);
    assert_eq!(validator.store_for(ConnectorType::Sink).unwrap().len(), 4);

    fs::remove_file(rules.path().join("managed_sink_configs.csv")).unwrap();
    assert_eq!(validator.store_for(ConnectorType::Sink).unwrap().len(), 4);
    assert!(validator.store_for(ConnectorType::Source).is_ok());
}
