//! Core building blocks: form parameters, the settings parser that assembles
//! the nested configuration, the literal reader for modification definitions,
//! and the bundled defaults. No I/O happens here.
pub mod defaults;
pub mod literal;
pub mod params;
pub mod settings;
