use crate::combine::combine;
use crate::config::EXPORT_FILE_NAME;
use crate::error::Result;
use crate::fetcher::FetchedFile;
use crate::models::{AveragedProfile, ProfileFilter};
use crate::reshape::average_day;
use crate::table::HourlyTable;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The combined result of one fetch batch. Later steps read only from here.
#[derive(Debug, Clone)]
pub struct Session {
    combined: HourlyTable,
    contributing: Vec<FetchedFile>,
}

impl Session {
    /// Fails with `EmptyInput` when no combination produced data.
    pub fn from_files(files: Vec<FetchedFile>) -> Result<Self> {
        let tables: Vec<HourlyTable> = files.iter().map(|f| f.table.clone()).collect();
        let combined = combine(&tables)?;
        info!(
            "Combined {} files into {} hourly rows",
            files.len(),
            combined.height()
        );

        Ok(Self {
            combined,
            contributing: files,
        })
    }

    pub fn combined(&self) -> &HourlyTable {
        &self.combined
    }

    pub fn contributing_files(&self) -> &[FetchedFile] {
        &self.contributing
    }

    pub fn total_models(&self) -> Option<f64> {
        self.combined.total_models()
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        self.combined.write_csv(writer)
    }

    /// Write the combined table as `eulpdownload.csv` inside `dir`.
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        self.combined.save_csv(&path)?;
        info!("Exported combined table to {}", path.display());
        Ok(path)
    }

    /// Save each contributing file's normalized table under its own name.
    pub fn keep_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.contributing.len());
        for file in &self.contributing {
            let path = dir.join(file.location.normalized_file_name());
            file.table.save_csv(&path)?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn average_day(&self, filter: &ProfileFilter) -> Result<AveragedProfile> {
        average_day(&self.combined, filter)
    }
}
