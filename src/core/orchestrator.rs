use crate::core::archive::{bundle, ensure_directory};
use crate::core::exporter::export_table;
use crate::core::lister::{list_resources, ListerSet};
use crate::core::naming::NameRegistry;
use crate::core::projector::project;
use crate::core::registry::{Registry, ALL_SELECTOR};
use crate::domain::model::{
    ExportArtifact, ProjectedRow, RunReport, SelectorEntry, SelectorOutcome, SelectorStatus,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ExportError, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Everything a run needs, built once at startup.
pub struct ExportContext {
    pub registry: Registry,
    pub listers: ListerSet,
    pub csv_dir: PathBuf,
    pub zip_dir: PathBuf,
    pub archive_name: String,
    pub concurrency: usize,
    pub listing_timeout: Duration,
}

impl ExportContext {
    pub fn new<C: ConfigProvider>(registry: Registry, listers: ListerSet, config: &C) -> Self {
        Self {
            registry,
            listers,
            csv_dir: config.csv_dir().to_path_buf(),
            zip_dir: config.zip_dir().to_path_buf(),
            archive_name: config.archive_name().to_string(),
            concurrency: config.concurrency(),
            listing_timeout: config.listing_timeout(),
        }
    }
}

/// Turn the requested selectors into registry entries.
///
/// An empty request or one containing `-all` selects every entry in
/// registry order. Otherwise request order is kept and repeats are dropped.
pub fn resolve_selectors(registry: &Registry, requested: &[String]) -> Result<Vec<SelectorEntry>> {
    if requested.is_empty() || requested.iter().any(|s| s == ALL_SELECTOR) {
        return Ok(registry.selectors().to_vec());
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for selector in requested {
        let entry = registry.resolve_selector(selector)?;
        if seen.insert(entry.selector.as_str()) {
            entries.push(entry.clone());
        }
    }
    Ok(entries)
}

pub struct Exporter {
    context: Arc<ExportContext>,
    names: Arc<NameRegistry>,
    clock: Clock,
}

impl Exporter {
    pub fn new(context: ExportContext) -> Self {
        Self {
            context: Arc::new(context),
            names: Arc::new(NameRegistry::new()),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn context(&self) -> &ExportContext {
        &self.context
    }

    /// Export every requested selector and bundle the results.
    ///
    /// Selector failures are recorded in the report. Only configuration,
    /// directory and archive errors are returned as `Err`.
    pub async fn run(&self, requested: &[String]) -> Result<RunReport> {
        let started = Instant::now();
        let entries = resolve_selectors(&self.context.registry, requested)?;

        ensure_directory(&self.context.csv_dir)?;
        ensure_directory(&self.context.zip_dir)?;

        tracing::info!(
            "Exporting {} selector(s) with concurrency {}",
            entries.len(),
            self.context.concurrency
        );

        let outcomes = self.export_all(entries).await;

        let files: Vec<PathBuf> = outcomes
            .iter()
            .filter_map(SelectorOutcome::artifact)
            .map(|a| a.path.clone())
            .collect();
        if files.is_empty() {
            tracing::warn!("No selector produced a file; the archive will be empty");
        }

        let file_count = files.len();
        let archive_path = self.bundle_files(files).await?;
        tracing::info!(
            "Bundled {} file(s) into {}",
            file_count,
            archive_path.display()
        );

        let report = RunReport {
            outcomes,
            archive_path,
        };
        tracing::info!(
            "Run finished in {:?}: {} exported, {} failed, {} rows",
            started.elapsed(),
            report.artifacts().count(),
            report.failures().count(),
            report.total_rows()
        );
        Ok(report)
    }

    /// Claim the archive name and write the zip on the blocking pool.
    async fn bundle_files(&self, files: Vec<PathBuf>) -> Result<PathBuf> {
        let context = Arc::clone(&self.context);
        let names = Arc::clone(&self.names);
        let now = (self.clock)();

        tokio::task::spawn_blocking(move || {
            let archive_path = names.claim(&context.zip_dir, &context.archive_name, "zip", now);
            bundle(&files, &archive_path)?;
            Ok::<_, ExportError>(archive_path)
        })
        .await
        .map_err(|e| ExportError::ArchiveWriteFailure {
            path: self.context.zip_dir.clone(),
            message: format!("bundling task failed: {}", e),
        })?
    }

    async fn export_all(&self, entries: Vec<SelectorEntry>) -> Vec<SelectorOutcome> {
        let mut outcomes: Vec<SelectorOutcome> = entries
            .iter()
            .map(|entry| SelectorOutcome {
                selector: entry.selector.clone(),
                service_key: entry.service_key.clone(),
                status: SelectorStatus::Failed {
                    reason: "export task did not complete".to_string(),
                },
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.context.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (position, entry) in entries.into_iter().enumerate() {
            let context = Arc::clone(&self.context);
            let names = Arc::clone(&self.names);
            let clock = Arc::clone(&self.clock);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let status = match export_selector(&context, names, clock, &entry).await {
                    Ok(artifact) => {
                        tracing::info!(
                            "✅ {}: {} rows -> {}",
                            entry.selector,
                            artifact.row_count,
                            artifact.path.display()
                        );
                        SelectorStatus::Exported(artifact)
                    }
                    Err(e) => {
                        tracing::error!("❌ {}: {}", entry.selector, e);
                        SelectorStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                (position, status)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, status)) => outcomes[position].status = status,
                Err(e) => tracing::error!("Export task aborted: {}", e),
            }
        }

        outcomes
    }
}

async fn export_selector(
    context: &ExportContext,
    names: Arc<NameRegistry>,
    clock: Clock,
    entry: &SelectorEntry,
) -> Result<ExportArtifact> {
    let descriptor = context.registry.lookup(&entry.service_key)?;
    let service = descriptor.service_key.as_str();

    let lister = context
        .listers
        .get(service)
        .ok_or_else(|| ExportError::listing_failed(service, "no resource lister configured"))?;

    let records = tokio::time::timeout(
        context.listing_timeout,
        list_resources(lister.as_ref(), descriptor),
    )
    .await
    .map_err(|_| {
        ExportError::listing_failed(
            service,
            format!("timed out after {:?}", context.listing_timeout),
        )
    })??;
    tracing::debug!("{}: listed {} records", entry.selector, records.len());

    let attributes = descriptor.attributes.clone();
    let csv_dir = context.csv_dir.clone();
    let base_filename = entry.base_filename.clone();

    let (path, row_count) = tokio::task::spawn_blocking(move || {
        let rows: Vec<ProjectedRow> = records
            .iter()
            .map(|record| project(record, &attributes))
            .collect();

        let path = names.claim(&csv_dir, &base_filename, "csv", clock());
        let row_count = export_table(&rows, &attributes, &path)?;
        Ok::<_, ExportError>((path, row_count))
    })
    .await
    .map_err(|e| ExportError::ExportIoFailure {
        path: context.csv_dir.join(&entry.base_filename),
        message: format!("export task failed: {}", e),
    })??;

    Ok(ExportArtifact {
        selector: entry.selector.clone(),
        path,
        row_count,
    })
}
