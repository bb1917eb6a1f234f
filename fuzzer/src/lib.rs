//! Schema-aware mutation engine for xrdsim.
//!
//! A [`Fuzzer`] takes one well-formed message, decodes it, and yields a
//! bounded sequence of variants in which every field marked mutable holds a
//! random value of the same shape. Frozen fields, such as request codes and
//! payload lengths, are copied from the seed so variants still reach deep
//! protocol states.

mod config;
mod fuzzer;
mod mutate;

pub use config::{FuzzConfig, DEFAULT_ITERATIONS};
pub use fuzzer::{Fuzzer, Mutations};
pub use mutate::{mutate_record, mutate_value};
