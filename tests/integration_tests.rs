use httpmock::prelude::*;
use inventory_exporter::adapters::build_listers;
use inventory_exporter::adapters::fixture::fixture_listers;
use inventory_exporter::config::defaults::{default_selectors, default_services};
use inventory_exporter::domain::model::{SelectorEntry, ServiceDescriptor};
use inventory_exporter::{
    ExportContext, Exporter, ExporterConfig, ListerSet, Registry, ResourceLister, Result,
    SelectorStatus,
};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct StaticLister(serde_json::Value);

#[async_trait::async_trait]
impl ResourceLister for StaticLister {
    async fn invoke(&self, _operation: &str) -> Result<serde_json::Value> {
        Ok(self.0.clone())
    }
}

fn config_for(root: &Path) -> ExporterConfig {
    let mut config = ExporterConfig::default();
    config.output.csv_dir = root.join("csv-files");
    config.output.zip_dir = root.join("zip-files");
    config
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

fn write_fixture(dir: &Path, service: &str, operation: &str, body: serde_json::Value) {
    std::fs::create_dir_all(dir.join(service)).unwrap();
    std::fs::write(
        dir.join(service).join(format!("{}.json", operation)),
        serde_json::to_vec(&body).unwrap(),
    )
    .unwrap();
}

#[tokio::test]
async fn test_s3_example_exports_sentinel_for_missing_field() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Registry::new(
        vec![ServiceDescriptor::new(
            "s3",
            "s3",
            "Buckets",
            &["Name", "CreationDate"],
        )],
        vec![SelectorEntry::new("-s3", "s3_buckets", "s3")],
    )
    .unwrap();
    let listers = ListerSet::new().with(
        "s3",
        Arc::new(StaticLister(serde_json::json!({
            "Buckets": [
                {"Name": "bkt1", "CreationDate": "2023-01-01"},
                {"Name": "bkt2"}
            ]
        }))),
    );

    let config = config_for(temp_dir.path());
    let report = Exporter::new(ExportContext::new(registry, listers, &config))
        .run(&["-s3".to_string()])
        .await
        .unwrap();

    let artifact = report.artifacts().next().unwrap();
    assert_eq!(artifact.row_count, 2);
    assert!(artifact.file_name().starts_with("s3_buckets_"));
    assert!(artifact.file_name().ends_with(".csv"));

    let (header, rows) = read_csv(&artifact.path);
    assert_eq!(header, vec!["Name", "CreationDate"]);
    assert_eq!(
        rows,
        vec![
            vec!["bkt1".to_string(), "2023-01-01".to_string()],
            vec!["bkt2".to_string(), "N/A".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_failure_isolation() {
    let temp_dir = TempDir::new().unwrap();
    let fixtures = temp_dir.path().join("fixtures");
    // lambda has no fixture, so its listing fails
    write_fixture(
        &fixtures,
        "glue",
        "get_jobs",
        serde_json::json!({"Jobs": [{"Name": "nightly", "MaxRetries": 2, "GlueVersion": "4.0"}]}),
    );

    let registry = Registry::new(default_services(), default_selectors()).unwrap();
    let listers = fixture_listers(&registry, &fixtures);
    let config = config_for(temp_dir.path());

    let report = Exporter::new(ExportContext::new(registry, listers, &config))
        .run(&["-lb".to_string(), "-gl".to_string()])
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].selector, "-lb");
    match &report.outcomes[0].status {
        SelectorStatus::Failed { reason } => assert!(reason.contains("lambda")),
        other => panic!("expected -lb to fail, got {:?}", other),
    }

    let glue = report.outcomes[1].artifact().unwrap();
    let (header, rows) = read_csv(&glue.path);
    assert_eq!(header.len(), 11);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), header.len());
    assert_eq!(rows[0][0], "nightly");
    assert_eq!(rows[0][4], "2");
    assert_eq!(rows[0][1], "N/A");

    let csv_files: Vec<String> = std::fs::read_dir(temp_dir.path().join("csv-files"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(csv_files, vec![glue.file_name()]);

    assert_eq!(archive_names(&report.archive_path), vec![glue.file_name()]);

    let summary = report.render_summary();
    assert!(summary.contains("-lb"));
    assert!(summary.contains("FAILED"));
    assert!(summary.contains(&glue.file_name()));
}

#[tokio::test]
async fn test_all_and_explicit_selectors_export_the_same_set() {
    let temp_dir = TempDir::new().unwrap();
    let fixtures = temp_dir.path().join("fixtures");
    for service in default_services() {
        write_fixture(
            &fixtures,
            &service.service_key,
            &service.listing_operation,
            serde_json::json!({ service.response_collection_key.clone(): [] }),
        );
    }

    let mut selector_sets = Vec::new();
    let explicit: Vec<String> = default_selectors().into_iter().map(|s| s.selector).collect();
    for requested in [vec!["-all".to_string()], vec![], explicit] {
        let registry = Registry::new(default_services(), default_selectors()).unwrap();
        let listers = fixture_listers(&registry, &fixtures);
        let config = config_for(temp_dir.path());

        let report = Exporter::new(ExportContext::new(registry, listers, &config))
            .run(&requested)
            .await
            .unwrap();

        assert!(!report.has_failures());
        let mut selectors: Vec<String> = report.outcomes.iter().map(|o| o.selector.clone()).collect();
        selectors.sort();
        selector_sets.push(selectors);
    }

    assert_eq!(selector_sets[0].len(), 6);
    assert_eq!(selector_sets[0], selector_sets[1]);
    assert_eq!(selector_sets[0], selector_sets[2]);
}

#[tokio::test]
async fn test_end_to_end_with_http_lister() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let buckets_mock = server.mock(|when, then| {
        when.method(GET).path("/s3/list_buckets");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "Buckets": [{"Name": "logs", "CreationDate": "2023-11-26T10:00:00Z"}],
                "Owner": {"ID": "1234"}
            }));
    });
    let rules_mock = server.mock(|when, then| {
        when.method(GET).path("/eventbridge/list_rules");
        then.status(500);
    });

    let mut config = config_for(temp_dir.path());
    config.lister.endpoint = Some(server.base_url());
    config.output.archive_name = "inventory".to_string();

    let registry = config.registry().unwrap();
    let listers = build_listers(&config, &registry).unwrap();
    let report = Exporter::new(ExportContext::new(registry, listers, &config))
        .run(&["-s3".to_string(), "-eb".to_string()])
        .await
        .unwrap();

    buckets_mock.assert();
    rules_mock.assert();

    assert!(report.has_failures());
    let artifact = report.artifacts().next().unwrap();
    assert_eq!(artifact.selector, "-s3");

    let archive_file = report.archive_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(archive_file.starts_with("inventory_"));
    assert!(archive_file.ends_with(".zip"));

    let mut archive = zip::ZipArchive::new(File::open(&report.archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    let mut content = String::new();
    archive
        .by_name(&artifact.file_name())
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "Name,CreationDate\nlogs,2023-11-26T10:00:00Z\n");
}

#[tokio::test]
async fn test_unknown_selector_aborts_before_any_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path());
    let registry = config.registry().unwrap();

    let result = Exporter::new(ExportContext::new(registry, ListerSet::new(), &config))
        .run(&["-s3".to_string(), "-lmb".to_string()])
        .await;

    assert!(matches!(
        result,
        Err(inventory_exporter::ExportError::UnknownSelector { .. })
    ));
    assert!(!temp_dir.path().join("csv-files").exists());
    assert!(!temp_dir.path().join("zip-files").exists());
}

#[tokio::test]
async fn test_repeated_runs_keep_history() {
    let temp_dir = TempDir::new().unwrap();
    let fixtures = temp_dir.path().join("fixtures");
    write_fixture(
        &fixtures,
        "s3",
        "list_buckets",
        serde_json::json!({"Buckets": [{"Name": "bkt1"}]}),
    );

    let mut config = config_for(temp_dir.path());
    config.lister.fixtures_dir = Some(fixtures);

    for _ in 0..2 {
        let registry = config.registry().unwrap();
        let listers = build_listers(&config, &registry).unwrap();
        Exporter::new(ExportContext::new(registry, listers, &config))
            .run(&["-s3".to_string()])
            .await
            .unwrap();
    }

    let csv_count = std::fs::read_dir(temp_dir.path().join("csv-files")).unwrap().count();
    let zip_count = std::fs::read_dir(temp_dir.path().join("zip-files")).unwrap().count();
    assert_eq!(csv_count, 2);
    assert_eq!(zip_count, 2);
}
