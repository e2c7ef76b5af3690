/*
[INPUT]:  Keymaster API request/response schemas and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod models;
pub mod options;

pub use models::*;
pub use options::*;
