//! Byte buffer plumbing shared by the transit format adapters.

mod writer;

pub use writer::Writer;
