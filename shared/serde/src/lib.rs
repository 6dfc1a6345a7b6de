//! # Sectornet Serde
//! Deterministic, byte-aligned, little-endian serialization shared by the
//! wire protocol and the save format.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod collections;
mod error;
mod number;
mod serde;
mod writer_pool;

pub use byte_reader::{ByteReader, MAX_NESTING_DEPTH};
pub use byte_writer::{ByteCounter, ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use serde::{decode, decode_exact, encode, Serde};
pub use writer_pool::WriterPool;
