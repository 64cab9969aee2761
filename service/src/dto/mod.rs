//! Request and response shapes. Field names follow the canonical schema;
//! the older camelCase spellings are accepted on input through serde
//! aliases and nowhere else.

mod course;
mod equipment;
mod extraction;
mod series;

pub use course::*;
pub use equipment::*;
pub use extraction::*;
pub use series::*;
