use std::path::PathBuf;

use bloom_cli::config::{
    apply_overrides, parse_config, save_config, BloomConfig, StorageBackend, BUCKET_ENV,
    DATA_DIR_ENV,
};
use bloom_instruments::scoring::MissingAnswerPolicy;

#[test]
fn empty_object_gets_defaults() {
    let config = parse_config("{}").unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.storage, StorageBackend::Local { root: None });
    assert_eq!(config.scoring.missing_answers, MissingAnswerPolicy::Reject);
    assert_eq!(config.scoring.thresholds.borderline, 15.0);
    assert_eq!(config.scoring.thresholds.clinical, 20.0);
}

#[test]
fn pre_versioned_data_dir_is_migrated() {
    let config = parse_config(r#"{"data_dir": "/var/lib/bloom"}"#).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(
        config.storage,
        StorageBackend::Local {
            root: Some(PathBuf::from("/var/lib/bloom"))
        }
    );
}

#[test]
fn newer_versions_are_refused() {
    let err = parse_config(r#"{"config_version": 7}"#).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn scoring_section_is_read() {
    let config = parse_config(
        r#"{
            "config_version": 1,
            "storage": {"type": "s3", "bucket": "bloom-prod", "region": "eu-west-1"},
            "scoring": {
                "missing_answers": "treat_as_not_true",
                "thresholds": {"borderline": 16.0, "clinical": 21.0}
            }
        }"#,
    )
    .unwrap();
    assert_eq!(
        config.storage,
        StorageBackend::S3 {
            bucket: "bloom-prod".to_string(),
            region: Some("eu-west-1".to_string())
        }
    );
    assert_eq!(config.scoring.missing_answers, MissingAnswerPolicy::TreatAsNotTrue);
    assert_eq!(config.scoring.thresholds.borderline, 16.0);
}

#[test]
fn environment_overrides_storage() {
    let data_dir = apply_overrides(BloomConfig::default(), |key| {
        (key == DATA_DIR_ENV).then(|| "/tmp/bloom-data".to_string())
    });
    assert_eq!(
        data_dir.storage,
        StorageBackend::Local {
            root: Some(PathBuf::from("/tmp/bloom-data"))
        }
    );

    let both = apply_overrides(BloomConfig::default(), |key| match key {
        BUCKET_ENV => Some("bloom-staging".to_string()),
        DATA_DIR_ENV => Some("/tmp/ignored".to_string()),
        _ => None,
    });
    assert_eq!(
        both.storage,
        StorageBackend::S3 {
            bucket: "bloom-staging".to_string(),
            region: None
        }
    );

    let untouched = apply_overrides(BloomConfig::default(), |_| Some(String::new()));
    assert_eq!(untouched.storage, StorageBackend::Local { root: None });
}

#[test]
fn saved_config_is_stamped_and_reloadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = BloomConfig {
        storage: StorageBackend::Local {
            root: Some(dir.path().join("data")),
        },
        ..Default::default()
    };
    save_config(&config, &path).unwrap();

    let reloaded = parse_config(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded.config_version, 1);
    assert_eq!(reloaded.storage, config.storage);
    assert!(!path.with_extension("json.tmp").exists());
}
