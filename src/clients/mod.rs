pub mod origin_client;

pub use origin_client::{OriginClient, OriginLookup};
