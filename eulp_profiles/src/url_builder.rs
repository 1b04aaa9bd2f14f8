use crate::catalog::Catalog;
use crate::config::DatasetConfig;
use crate::error::{ProfileError, Result};
use crate::models::{FileLocation, Selection};

/// Maps selection labels to data lake object URLs. Pure string work.
pub struct UrlBuilder<'a> {
    catalog: &'a Catalog,
    dataset: &'a DatasetConfig,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(catalog: &'a Catalog, dataset: &'a DatasetConfig) -> Self {
        Self { catalog, dataset }
    }

    pub fn build(&self, county: &str, building_type: &str, upgrade: &str) -> Result<FileLocation> {
        let building_code = self
            .catalog
            .building_type(building_type)
            .ok_or_else(|| ProfileError::lookup("building type", building_type))?
            .code
            .clone();
        let upgrade_id = self
            .catalog
            .upgrade(upgrade)
            .ok_or_else(|| ProfileError::lookup("upgrade", upgrade))?
            .id;
        let upgrade_code = format!("{:02}", upgrade_id);
        let root = self.dataset.release_root();

        if self.dataset.is_statewide(county) {
            let state = self.dataset.state_code.to_lowercase();
            let url = format!(
                "{root}/by_state/upgrade={upgrade_id}/state={}/up{upgrade_code}-{state}-{building_code}.csv",
                self.dataset.state_code
            );

            return Ok(FileLocation {
                url,
                tract_code: state,
                upgrade_code,
                building_code,
            });
        }

        let tract = self
            .catalog
            .tract_code(county)
            .ok_or_else(|| ProfileError::lookup("county", county))?
            .to_string();
        let url = format!(
            "{root}/by_county/upgrade={upgrade_id}/county={tract}/up{upgrade_code}-{}-{building_code}.csv",
            tract.to_lowercase()
        );

        Ok(FileLocation {
            url,
            tract_code: tract,
            upgrade_code,
            building_code,
        })
    }

    pub fn build_for(&self, selection: &Selection) -> Result<FileLocation> {
        self.build(&selection.county, &selection.building_type, &selection.upgrade)
    }
}
