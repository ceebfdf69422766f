pub mod loader;
pub mod types;

pub use loader::{load_offerings, read_offerings, LoadReport, LoadedTable};
pub use types::{parse_numeric, ExamType, Offering, OfferingTable};
