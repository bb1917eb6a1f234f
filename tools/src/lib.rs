//! Command-line driver and tooling for the xrdsim protocol simulator.
//!
//! This crate backs the `xrdsim` binary:
//!
//! - Built-in client and server scenarios (login, fuzzing)
//! - Run settings loaded from JSON and overridden from the command line
//! - Decoding of captured message bytes into records
//! - A listing of every registered message layout

mod decode;
mod scenarios;
mod schemas;
mod settings;

pub use decode::{
    collect_message_entries, decode_messages, format_decode_pretty, format_value, DecodeAs,
    DecodeOutput, MessageEntry,
};
pub use scenarios::{
    FuzzClient, FuzzServer, FuzzTarget, LoginClient, LoginServer, ScenarioKind, STAT_DATA,
};
pub use schemas::{describe_wire_type, format_registry, format_schema};
pub use settings::{load_run_config, RunOverrides};
