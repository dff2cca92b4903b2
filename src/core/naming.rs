use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `base_YYYYmmddHHMMSS.extension`
pub fn unique_name(base: &str, extension: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.{}", base, now.format(TIMESTAMP_FORMAT), extension)
}

fn disambiguated_name(base: &str, extension: &str, now: NaiveDateTime, counter: u32) -> String {
    format!(
        "{}_{}_{}.{}",
        base,
        now.format(TIMESTAMP_FORMAT),
        counter,
        extension
    )
}

/// Hands out output paths that are unique for the lifetime of the registry
/// and that do not overwrite files already on disk.
#[derive(Debug, Default)]
pub struct NameRegistry {
    issued: Mutex<HashSet<PathBuf>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, dir: &Path, base: &str, extension: &str, now: NaiveDateTime) -> PathBuf {
        let mut issued = self.issued.lock().unwrap_or_else(|e| e.into_inner());

        let mut candidate = dir.join(unique_name(base, extension, now));
        let mut counter = 0;
        while issued.contains(&candidate) || candidate.exists() {
            counter += 1;
            candidate = dir.join(disambiguated_name(base, extension, now, counter));
        }

        if counter > 0 {
            tracing::debug!(
                "Name collision for '{}', using {}",
                base,
                candidate.display()
            );
        }

        issued.insert(candidate.clone());
        candidate
    }
}
