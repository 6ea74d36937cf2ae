use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::core::params::FormParams;
use crate::core::settings::ParsedConfiguration;
use crate::error::{Error, Result};

/// Write the configuration as pretty-printed JSON.
pub fn write_configuration(config: &ParsedConfiguration, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    write_configuration_to(config, file)?;
    debug!("Configuration written to {:?}", path);
    Ok(())
}

pub fn write_configuration_to<W: Write>(config: &ParsedConfiguration, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, config)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Render a preset file: a comment header followed by the form as JSON.
pub fn render_preset(params: &FormParams) -> Result<String> {
    let mut content = String::new();
    content.push_str("// ==========================================\n");
    content.push_str("// MS²Rescore Form Preset\n");
    content.push_str("// ==========================================\n");
    content.push_str(&format!("// Version: {}\n", env!("CARGO_PKG_VERSION")));
    content.push_str(&format!(
        "// Generated: {}\n",
        chrono::Utc::now().to_rfc3339()
    ));
    content.push_str("// ==========================================\n\n");
    content.push_str(&serde_json::to_string_pretty(params)?);
    content.push('\n');
    Ok(content)
}

pub fn save_preset(params: &FormParams, path: &Path) -> Result<()> {
    fs::write(path, render_preset(params)?)?;
    info!("Preset saved to: {:?}", path);
    Ok(())
}

/// Parse preset text, skipping the comment header.
pub fn read_preset(content: &str) -> Result<FormParams> {
    let json_start = content.find('{').ok_or_else(|| {
        Error::External("Invalid preset file: no JSON content found".to_string())
    })?;
    Ok(serde_json::from_str(&content[json_start..])?)
}

pub fn load_preset(path: &Path) -> Result<FormParams> {
    let params = read_preset(&fs::read_to_string(path)?)?;
    info!("Preset loaded from: {:?}", path);
    Ok(params)
}
