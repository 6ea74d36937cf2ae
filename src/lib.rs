#![doc = r#"
MS²Rescore front-end: collect paths and settings, assemble the nested
rescoring configuration, and launch the external `ms2rescore` program.

The crate powers both the command-line front-end and the desktop GUI. The
only real logic is the settings parser: the flat form values are kept under
`general`, and the MaxQuant and MS²PIP text blocks are parsed into their own
sections. Spectrum prediction and rescoring itself happen in the external
tool.

Quick start: parse a form
-------------------------
```rust
use ms2rescore_gui::{FormParams, parse_settings};

fn main() -> ms2rescore_gui::Result<()> {
    let params = FormParams {
        identification_file: Some("msms.txt".into()),
        fixed_modifications: "C Carbamidomethyl".to_string(),
        modification_mapping: "ox Oxidation\nac Acetyl".to_string(),
        ms2pip_modifications: "[]".to_string(),
        ..FormParams::default()
    };

    let config = parse_settings(params.to_raw()?)?;
    assert_eq!(config.maxquant_to_rescore.modification_mapping["ox"], "Oxidation");
    assert!(config.ms2pip.modifications.is_empty());
    assert!(!config.general.contains_key("ms2pip_model"));
    Ok(())
}
```

Run the external tool
---------------------
```rust,no_run
use ms2rescore_gui::{CommandRescorer, FormParams, rescore_form};

fn main() -> ms2rescore_gui::Result<()> {
    let params = FormParams {
        identification_file: Some("/data/search.pin".into()),
        ..FormParams::default()
    };
    rescore_form(&params, &CommandRescorer::default())?;
    Ok(())
}
```

Error handling
--------------
Form mistakes surface as `Error::Configuration`, which names the field at
fault:

```rust
use ms2rescore_gui::{Error, FormParams, parse_settings};

let params = FormParams {
    fixed_modifications: "C Carbamido methyl".to_string(),
    ..FormParams::default()
};
match params.to_raw().and_then(parse_settings) {
    Err(Error::Configuration { field, reason }) => {
        assert_eq!(field, "fixed_modifications");
        eprintln!("fix {field}: {reason}");
    }
    other => panic!("unexpected: {other:?}"),
}
```

Feature flags
-------------
- `gui`: builds the GUI module and the `ms2rescoreUI` binary.
- `full`: enables everything.

Useful modules
--------------
- [`api`]: `Rescorer` seam and the `ms2rescore` process launcher.
- [`core`]: form parameters, settings parser, literal reader, defaults.
- [`io`]: configuration and preset files, presentation resources.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
pub use core::defaults::{DefaultConfig, ModelRegistry};
pub use core::literal::{LiteralError, parse_literal, to_literal};
pub use core::params::FormParams;
pub use core::settings::{
    MaxquantSettings, ModificationMap, Ms2pipSettings, ParsedConfiguration, RawFormValues,
    parse_modification_lines, parse_settings,
};
pub use error::{Error, Result};
pub use io::Resources;
pub use types::{LogLevel, Pipeline};

pub use api::{CommandRescorer, Rescorer, rescore, rescore_form};
