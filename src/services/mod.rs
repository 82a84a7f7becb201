pub mod response_parser;
pub mod result_store;
pub mod unresolved_writer;

pub use response_parser::{parse, parse_payload, ParsedResponse};
pub use result_store::{read_classifications, ClassificationTable, RawStore, ResultStore};
pub use unresolved_writer::UnresolvedWriter;
