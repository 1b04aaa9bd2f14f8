use anyhow::{bail, Result};
use clap::ValueEnum;
use eulp_profiles::catalog::COMMERCIAL_SECTOR;
use eulp_profiles::{Catalog, DatasetConfig};

/// Quick geographic presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Geography {
    /// Counties given with --county
    Custom,
    /// Every county in the county table
    UpperPeninsula,
    /// The counties flagged for the UPPCO service territory
    Uppco,
    /// The single state-level aggregate
    Statewide,
}

pub fn counties(
    geography: Geography,
    custom: &[String],
    catalog: &Catalog,
    dataset: &DatasetConfig,
) -> Result<Vec<String>> {
    let counties: Vec<String> = match geography {
        Geography::Custom => custom.to_vec(),
        Geography::UpperPeninsula => catalog.counties().iter().map(|c| c.name.clone()).collect(),
        Geography::Uppco => catalog
            .regional_counties()
            .into_iter()
            .map(|c| c.name.clone())
            .collect(),
        Geography::Statewide => vec![dataset.statewide_label.clone()],
    };

    if counties.is_empty() {
        bail!("No counties selected; pass --county or choose a --geography preset");
    }
    Ok(counties)
}

pub fn building_types(all: bool, chosen: &[String], catalog: &Catalog) -> Result<Vec<String>> {
    let commercial: Vec<String> = catalog
        .building_types_in_sector(COMMERCIAL_SECTOR)
        .into_iter()
        .map(|b| b.name.clone())
        .collect();

    let building_types: Vec<String> = if all {
        commercial
    } else {
        if let Some(other) = chosen.iter().find(|name| !commercial.contains(name)) {
            bail!(
                "'{}' is not a commercial building type; choose from: {}",
                other,
                commercial.join(", ")
            );
        }
        chosen.to_vec()
    };

    if building_types.is_empty() {
        bail!("No building types selected; pass --building-type or --all-buildings");
    }
    Ok(building_types)
}

/// The requested upgrade, or the first one in the crosswalk.
pub fn upgrade(chosen: Option<&str>, catalog: &Catalog) -> Result<String> {
    match chosen {
        Some(name) => Ok(name.to_string()),
        None => match catalog.upgrades().first() {
            Some(upgrade) => Ok(upgrade.name.clone()),
            None => bail!("The upgrade crosswalk is empty"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES: &str = "County,Tract Code,UPPCO\nAlger,G2600030,x\nChippewa,G2600330,\nDelta,G2600410,x\n";
    const BUILDING_TYPES: &str = "user-facing name,program-facing name,sector\n\
        Large Office,largeoffice,com\n\
        Single-Family Detached,single-family_detached,res\n\
        Warehouse,warehouse,com\n";
    const UPGRADES: &str = "2024_comstock_amy2018_release_2_upgrade_name,2024_comstock_amy2018_release_2_upgrade_id\n\
        Baseline,0\n\
        LED Lighting,13\n";

    fn catalog() -> Catalog {
        Catalog::from_readers(COUNTIES.as_bytes(), BUILDING_TYPES.as_bytes(), UPGRADES.as_bytes()).unwrap()
    }

    #[test]
    fn test_geography_presets() {
        let catalog = catalog();
        let dataset = DatasetConfig::default();

        assert_eq!(
            counties(Geography::UpperPeninsula, &[], &catalog, &dataset).unwrap(),
            vec!["Alger", "Chippewa", "Delta"]
        );
        assert_eq!(
            counties(Geography::Uppco, &[], &catalog, &dataset).unwrap(),
            vec!["Alger", "Delta"]
        );
        assert_eq!(
            counties(Geography::Statewide, &["Alger".to_string()], &catalog, &dataset).unwrap(),
            vec!["Michigan (statewide)"]
        );
        assert_eq!(
            counties(Geography::Custom, &["Chippewa".to_string()], &catalog, &dataset).unwrap(),
            vec!["Chippewa"]
        );
        assert!(counties(Geography::Custom, &[], &catalog, &dataset).is_err());
    }

    #[test]
    fn test_all_buildings_means_commercial_only() {
        let catalog = catalog();
        assert_eq!(
            building_types(true, &[], &catalog).unwrap(),
            vec!["Large Office", "Warehouse"]
        );
        assert_eq!(
            building_types(false, &["Warehouse".to_string()], &catalog).unwrap(),
            vec!["Warehouse"]
        );
        assert!(building_types(false, &[], &catalog).is_err());
    }

    #[test]
    fn test_non_commercial_building_type_is_rejected() {
        let catalog = catalog();

        let err = building_types(false, &["Single-Family Detached".to_string()], &catalog).unwrap_err();
        assert!(err.to_string().contains("not a commercial building type"));

        let err = building_types(false, &["Warehouse".to_string(), "Stadium".to_string()], &catalog).unwrap_err();
        assert!(err.to_string().starts_with("'Stadium'"));
    }

    #[test]
    fn test_upgrade_defaults_to_first() {
        let catalog = catalog();
        assert_eq!(upgrade(None, &catalog).unwrap(), "Baseline");
        assert_eq!(upgrade(Some("LED Lighting"), &catalog).unwrap(), "LED Lighting");
    }
}
