// snapshot/src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod util;
pub mod labels;
pub mod manifest;

pub mod resolve;
pub mod encoding;
pub mod emit;

pub mod commands;

pub use emit::{
    EmissionRecord,
    EmitSummary,
    Emitter
};
pub use encoding::{
    EncodedWriter,
    OutputEncoding
};
pub use labels::LabelTable;
pub use manifest::Manifest;
pub use resolve::{
    FsResolver,
    MemoryResolver,
    Resolve
};
