use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

pub const COUNTY_FILE: &str = "UP county codes.csv";
pub const BUILDING_TYPE_FILE: &str = "building-type-keys.csv";
pub const UPGRADE_FILE: &str = "measure_name_crosswalk.csv";

pub const COMMERCIAL_SECTOR: &str = "com";

#[derive(Debug, Clone, PartialEq)]
pub struct County {
    pub name: String,
    pub tract_code: String,
    /// Member of the regional utility's service territory.
    pub regional: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingType {
    #[serde(rename = "user-facing name")]
    pub name: String,
    #[serde(rename = "program-facing name")]
    pub code: String,
    pub sector: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Upgrade {
    #[serde(rename = "2024_comstock_amy2018_release_2_upgrade_name")]
    pub name: String,
    #[serde(rename = "2024_comstock_amy2018_release_2_upgrade_id")]
    pub id: u32,
}

#[derive(Debug, Deserialize)]
struct CountyRow {
    #[serde(rename = "County")]
    county: String,
    #[serde(rename = "Tract Code")]
    tract_code: String,
    #[serde(rename = "UPPCO", default)]
    uppco: Option<String>,
}

impl From<CountyRow> for County {
    fn from(row: CountyRow) -> Self {
        County {
            name: row.county,
            tract_code: row.tract_code,
            regional: row
                .uppco
                .map(|flag| flag.eq_ignore_ascii_case("x"))
                .unwrap_or(false),
        }
    }
}

/// The three reference tables, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    counties: Vec<County>,
    building_types: Vec<BuildingType>,
    upgrades: Vec<Upgrade>,
    county_index: HashMap<String, usize>,
    building_index: HashMap<String, usize>,
    upgrade_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(counties: Vec<County>, building_types: Vec<BuildingType>, upgrades: Vec<Upgrade>) -> Self {
        let county_index = index_by(&counties, |c| &c.name);
        let building_index = index_by(&building_types, |b| &b.name);
        let upgrade_index = index_by(&upgrades, |u| &u.name);

        Self {
            counties,
            building_types,
            upgrades,
            county_index,
            building_index,
            upgrade_index,
        }
    }

    /// Load the reference tables from their standard file names inside `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let catalog = Self::from_readers(
            std::fs::File::open(dir.join(COUNTY_FILE))?,
            std::fs::File::open(dir.join(BUILDING_TYPE_FILE))?,
            std::fs::File::open(dir.join(UPGRADE_FILE))?,
        )?;

        log::info!(
            "Loaded {} counties, {} building types, {} upgrades from {}",
            catalog.counties.len(),
            catalog.building_types.len(),
            catalog.upgrades.len(),
            dir.display()
        );

        Ok(catalog)
    }

    pub fn from_readers<C: Read, B: Read, U: Read>(counties: C, building_types: B, upgrades: U) -> Result<Self> {
        let counties = table_reader(counties)
            .deserialize::<CountyRow>()
            .map(|row| row.map(County::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let building_types = table_reader(building_types)
            .deserialize::<BuildingType>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let upgrades = table_reader(upgrades)
            .deserialize::<Upgrade>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::new(counties, building_types, upgrades))
    }

    pub fn county(&self, name: &str) -> Option<&County> {
        self.county_index.get(name).map(|&idx| &self.counties[idx])
    }

    pub fn building_type(&self, name: &str) -> Option<&BuildingType> {
        self.building_index.get(name).map(|&idx| &self.building_types[idx])
    }

    pub fn upgrade(&self, name: &str) -> Option<&Upgrade> {
        self.upgrade_index.get(name).map(|&idx| &self.upgrades[idx])
    }

    pub fn tract_code(&self, county: &str) -> Option<&str> {
        self.county(county).map(|c| c.tract_code.as_str())
    }

    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    /// Counties flagged as part of the regional utility territory.
    pub fn regional_counties(&self) -> Vec<&County> {
        self.counties.iter().filter(|c| c.regional).collect()
    }

    pub fn building_types_in_sector(&self, sector: &str) -> Vec<&BuildingType> {
        self.building_types
            .iter()
            .filter(|b| b.sector == sector)
            .collect()
    }
}

fn table_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

fn index_by<T>(rows: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        // First occurrence wins on duplicate labels
        index.entry(key(row).clone()).or_insert(idx);
    }
    index
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const COUNTIES: &str = "County,Tract Code,UPPCO\n\
        Alger,G2600030,x\n\
        Chippewa,G2600330,\n\
        Marquette,G2601030,x\n";
    const BUILDINGS: &str = "user-facing name,program-facing name,sector\n\
        Large Office,largeoffice,com\n\
        Warehouse,warehouse,com\n\
        Mobile Home,mobile_home,res\n";
    const UPGRADES: &str = "2024_comstock_amy2018_release_2_upgrade_name,2024_comstock_amy2018_release_2_upgrade_id\n\
        Baseline,0\n\
        \"Variable Speed HP RTU, Electric Backup\",1\n";

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                County {
                    name: "Alger".to_string(),
                    tract_code: "G2600030".to_string(),
                    regional: true,
                },
                County {
                    name: "Chippewa".to_string(),
                    tract_code: "G2600330".to_string(),
                    regional: false,
                },
            ],
            vec![
                BuildingType {
                    name: "Large Office".to_string(),
                    code: "largeoffice".to_string(),
                    sector: "com".to_string(),
                },
                BuildingType {
                    name: "Warehouse".to_string(),
                    code: "warehouse".to_string(),
                    sector: "com".to_string(),
                },
            ],
            vec![
                Upgrade {
                    name: "Baseline".to_string(),
                    id: 0,
                },
                Upgrade {
                    name: "Heat Pump RTU".to_string(),
                    id: 1,
                },
                Upgrade {
                    name: "Package 4".to_string(),
                    id: 12,
                },
            ],
        )
    }

    #[test]
    fn test_catalog_lookups() {
        let catalog = sample_catalog();

        assert_eq!(catalog.tract_code("Alger"), Some("G2600030"));
        assert_eq!(catalog.building_type("Warehouse").map(|b| b.code.as_str()), Some("warehouse"));
        assert_eq!(catalog.upgrade("Package 4").map(|u| u.id), Some(12));
        assert!(catalog.county("Wayne").is_none());
    }

    #[test]
    fn test_catalog_from_csv() {
        let catalog =
            Catalog::from_readers(COUNTIES.as_bytes(), BUILDINGS.as_bytes(), UPGRADES.as_bytes()).unwrap();

        assert_eq!(catalog.counties().len(), 3);
        let regional: Vec<_> = catalog.regional_counties().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(regional, vec!["Alger", "Marquette"]);

        let commercial: Vec<_> = catalog
            .building_types_in_sector(COMMERCIAL_SECTOR)
            .iter()
            .map(|b| b.code.as_str())
            .collect();
        assert_eq!(commercial, vec!["largeoffice", "warehouse"]);

        assert_eq!(
            catalog.upgrade("Variable Speed HP RTU, Electric Backup").map(|u| u.id),
            Some(1)
        );
    }
}
