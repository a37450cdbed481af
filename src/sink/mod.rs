//! Sink module
//!
//! Where extracted data goes. Messages follow the Singer wire format:
//! `SCHEMA` before a stream's first record, one `RECORD` per emitted record
//! and `STATE` with the full bookmark document after each stream
//! invocation.

mod message;
mod writers;

pub use message::Message;
pub use writers::{MemorySink, RecordSink, StdoutSink};
