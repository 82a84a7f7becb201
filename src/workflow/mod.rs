pub mod name_ctx;
pub mod name_flow;

pub use name_ctx::NameCtx;
pub use name_flow::{NameFlow, Resolution};
