pub mod catalog;
pub mod chart;
pub mod combine;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod normalize;
pub mod report;
pub mod reshape;
pub mod session;
pub mod source;
pub mod table;
pub mod url_builder;

pub use catalog::Catalog;
pub use combine::combine;
pub use config::DatasetConfig;
pub use error::{ProfileError, Result};
pub use fetcher::{FetchedFile, Fetcher};
pub use models::{AveragedProfile, DayType, FileLocation, FuelType, ProfileFilter, Season, Selection};
pub use report::{LogReporter, Reporter};
pub use reshape::average_day;
pub use session::Session;
pub use source::{FileSource, HttpSource, MemorySource, RemoteFile};
pub use table::HourlyTable;
pub use url_builder::UrlBuilder;
