//! Command Line Interface (CLI) layer.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`): every GUI form field is exposed
//! as an argument, the assembled configuration is either written out with
//! `--emit-config` or handed to the external `ms2rescore` program.
//!
//! If you are embedding the front-end into another application, prefer the
//! high-level `ms2rescore_gui::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
