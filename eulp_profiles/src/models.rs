use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One (county, building type, upgrade) combination to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub county: String,
    pub building_type: String,
    pub upgrade: String,
}

impl Selection {
    pub fn new(county: impl Into<String>, building_type: impl Into<String>, upgrade: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            building_type: building_type.into(),
            upgrade: upgrade.into(),
        }
    }

    /// County-major product of the chosen counties and building types.
    pub fn cartesian<C, B>(counties: &[C], building_types: &[B], upgrade: &str) -> Vec<Selection>
    where
        C: AsRef<str>,
        B: AsRef<str>,
    {
        counties
            .iter()
            .flat_map(|county| {
                building_types
                    .iter()
                    .map(move |building| Selection::new(county.as_ref(), building.as_ref(), upgrade))
            })
            .collect()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.county, self.building_type, self.upgrade)
    }
}

/// Where a selection's file lives in the data lake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLocation {
    pub url: String,
    pub tract_code: String,
    /// Upgrade id zero-padded to two digits.
    pub upgrade_code: String,
    pub building_code: String,
}

impl FileLocation {
    /// Name used when a normalized copy of the file is kept on disk.
    pub fn normalized_file_name(&self) -> String {
        format!("{}-up{}-{}.csv", self.tract_code, self.upgrade_code, self.building_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Winter,
    All,
}

impl Season {
    /// Calendar months kept by the filter, `None` for every month.
    pub fn months(&self) -> Option<&'static [u32]> {
        match self {
            Season::Summer => Some(&[6, 7, 8]),
            Season::Winter => Some(&[12, 1, 2]),
            Season::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Weekday,
    Weekend,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Electricity,
    NaturalGas,
    OtherFuel,
    DistrictCooling,
    DistrictHeating,
    All,
}

impl FuelType {
    /// Column-name tokens that disqualify an end use for this fuel.
    pub fn excluded_tokens(&self) -> &'static [&'static str] {
        match self {
            FuelType::Electricity => &["natural_gas", "other_fuel", "district"],
            FuelType::NaturalGas => &["electricity", "other_fuel", "district"],
            FuelType::OtherFuel => &["natural_gas", "electricity", "district"],
            FuelType::DistrictCooling => &["natural_gas", "electricity", "other_fuel", "district_heating"],
            FuelType::DistrictHeating => &["natural_gas", "electricity", "other_fuel", "district_cooling"],
            FuelType::All => &[],
        }
    }

    /// Case-insensitive substring match against the excluded tokens.
    pub fn admits(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        !self
            .excluded_tokens()
            .iter()
            .any(|token| column.contains(token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChoiceError(pub String);

impl fmt::Display for ParseChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized choice '{}'", self.0)
    }
}

impl std::error::Error for ParseChoiceError {}

fn normalize_choice(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', '-'], " ")
}

impl FromStr for Season {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_choice(s).as_str() {
            "summer" => Ok(Season::Summer),
            "winter" => Ok(Season::Winter),
            "all" | "all seasons" => Ok(Season::All),
            _ => Err(ParseChoiceError(s.to_string())),
        }
    }
}

impl FromStr for DayType {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_choice(s).as_str() {
            "weekday" => Ok(DayType::Weekday),
            "weekend" => Ok(DayType::Weekend),
            "all" | "all days" => Ok(DayType::All),
            _ => Err(ParseChoiceError(s.to_string())),
        }
    }
}

impl FromStr for FuelType {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_choice(s).as_str() {
            "electricity" => Ok(FuelType::Electricity),
            "natural gas" => Ok(FuelType::NaturalGas),
            "other fuel" => Ok(FuelType::OtherFuel),
            "district cooling" => Ok(FuelType::DistrictCooling),
            "district heating" => Ok(FuelType::DistrictHeating),
            "all" => Ok(FuelType::All),
            _ => Err(ParseChoiceError(s.to_string())),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::All => "all",
        })
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
            DayType::All => "all",
        })
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FuelType::Electricity => "electricity",
            FuelType::NaturalGas => "natural gas",
            FuelType::OtherFuel => "other fuel",
            FuelType::DistrictCooling => "district cooling",
            FuelType::DistrictHeating => "district heating",
            FuelType::All => "all",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFilter {
    pub season: Season,
    pub day_type: DayType,
    pub fuel_type: FuelType,
}

impl ProfileFilter {
    pub fn new(season: Season, day_type: DayType, fuel_type: FuelType) -> Self {
        Self {
            season,
            day_type,
            fuel_type,
        }
    }

    pub fn title(&self) -> String {
        format!("{}-{}-{}", self.season, self.day_type, self.fuel_type)
    }
}

impl Default for ProfileFilter {
    fn default() -> Self {
        Self::new(Season::Summer, DayType::Weekday, FuelType::Electricity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub hour: u32,
    #[serde(rename = "end-use")]
    pub end_use: String,
    /// kWh, rounded to a whole unit.
    pub value: f64,
}

/// Average day load shape, one point per (hour, end use).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedProfile {
    pub filter: ProfileFilter,
    pub points: Vec<ProfilePoint>,
}

impl AveragedProfile {
    pub fn title(&self) -> String {
        self.filter.title()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// End-use labels in output order.
    pub fn end_uses(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.points.iter().map(|p| p.end_use.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    pub fn value(&self, hour: u32, end_use: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.hour == hour && p.end_use == end_use)
            .map(|p| p.value)
    }

    /// Hourly series for one end use, ordered by hour.
    pub fn series(&self, end_use: &str) -> Vec<(u32, f64)> {
        self.points
            .iter()
            .filter(|p| p.end_use == end_use)
            .map(|p| (p.hour, p.value))
            .collect()
    }

    pub fn to_csv(&self) -> csv::Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for point in &self.points {
            wtr.serialize(point)?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
