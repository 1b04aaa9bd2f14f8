use crate::error::{ProfileError, Result};
use crate::models::{FileLocation, Selection};
use crate::normalize::normalize_csv;
use crate::report::{failure_message, Reporter};
use crate::source::FileSource;
use crate::table::HourlyTable;
use crate::url_builder::UrlBuilder;
use log::{debug, info};

/// One successfully fetched and normalized combination.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub selection: Selection,
    pub location: FileLocation,
    pub table: HourlyTable,
}

pub struct Fetcher<'a, S: FileSource> {
    urls: UrlBuilder<'a>,
    source: S,
}

impl<'a, S: FileSource> Fetcher<'a, S> {
    pub fn new(urls: UrlBuilder<'a>, source: S) -> Self {
        Self { urls, source }
    }

    /// Fetch one combination.
    ///
    /// Misses, transport failures and malformed files are reported and give
    /// `Ok(None)`. Labels missing from the reference tables are errors.
    pub fn fetch(&self, selection: &Selection, reporter: &mut dyn Reporter) -> Result<Option<FetchedFile>> {
        let location = self.urls.build_for(selection)?;

        match self.retrieve(&location) {
            Ok(table) => {
                debug!("{}: {} hourly rows from {}", selection, table.height(), location.url);
                Ok(Some(FetchedFile {
                    selection: selection.clone(),
                    location,
                    table,
                }))
            }
            Err(e) if e.is_recoverable() => {
                reporter.report(&failure_message(selection, &e));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn retrieve(&self, location: &FileLocation) -> Result<HourlyTable> {
        let file = self.source.get(&location.url)?;
        if !file.is_success() {
            return Err(ProfileError::FetchMiss { status: file.status });
        }
        normalize_csv(&file.body)
    }

    /// Fetch every selection in order, calling `on_progress` after each one.
    pub fn fetch_all<F>(
        &self,
        selections: &[Selection],
        reporter: &mut dyn Reporter,
        mut on_progress: F,
    ) -> Result<Vec<FetchedFile>>
    where
        F: FnMut(&Selection),
    {
        let mut fetched = Vec::with_capacity(selections.len());
        for selection in selections {
            if let Some(file) = self.fetch(selection, reporter)? {
                fetched.push(file);
            }
            on_progress(selection);
        }

        info!("Fetched {} of {} combinations", fetched.len(), selections.len());
        Ok(fetched)
    }
}
