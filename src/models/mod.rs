pub mod loaders;
pub mod lookup;
pub mod name_record;

pub use loaders::{load_name_records, unique_names, unique_names_by_sex};
pub use lookup::{ClassificationRecord, FailureKind, LookupResult, LookupStatus, NOT_FOUND_CODE};
pub use name_record::NameRecord;
