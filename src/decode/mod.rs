//! Response decoder module
//!
//! Pulls the record array out of a parsed page body using the stream's
//! extraction path (`$.values[*]`, `$.issues[*]`, `$[*]`).

mod decoders;

pub use decoders::{JsonDecoder, RecordDecoder};
