pub mod csv_loader;

pub use csv_loader::{load_name_records, parse_name_records, unique_names, unique_names_by_sex};
