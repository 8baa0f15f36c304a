use std::path::Path;

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};

use crate::models::{Batch, Verse};

/// Write a batch to a YAML file as `key: [display_name, text, commentary?]`
pub fn save_batch(batch: &Batch, path: &Path) -> Result<()> {
    let yaml = batch_to_yaml(batch)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write batch file: {:?}", path))
}

/// Read a batch previously written by [`save_batch`]
pub fn load_batch(path: &Path) -> Result<Batch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {:?}", path))?;
    batch_from_yaml(&content).with_context(|| format!("Invalid batch file: {:?}", path))
}

/// Serialize a batch to its YAML representation
pub fn batch_to_yaml(batch: &Batch) -> Result<String> {
    let mut mapping = Mapping::new();
    for verse in batch {
        let fields = verse
            .fields()
            .into_iter()
            .map(|f| Value::String(f.to_string()))
            .collect();
        mapping.insert(Value::String(verse.key.clone()), Value::Sequence(fields));
    }
    serde_yaml::to_string(&mapping).context("Failed to serialize batch")
}

/// Parse a batch from its YAML representation, keeping record order
pub fn batch_from_yaml(yaml: &str) -> Result<Batch> {
    // An empty batch serializes as `{}`, but an empty file is accepted too
    if yaml.trim().is_empty() {
        return Ok(Batch::new());
    }

    let mapping: Mapping = serde_yaml::from_str(yaml).context("Failed to parse batch YAML")?;
    let mut batch = Batch::new();

    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            other => anyhow::bail!("Batch key is not a string: {:?}", other),
        };
        let fields: Vec<String> = serde_yaml::from_value(value)
            .with_context(|| format!("Record {} is not a list of strings", key))?;

        let verse = match fields.as_slice() {
            [display_name, text] => Verse::new(key, display_name.clone(), text.clone()),
            [display_name, text, commentary] => Verse {
                key,
                display_name: display_name.clone(),
                text: text.clone(),
                commentary: Some(commentary.clone()),
            },
            _ => anyhow::bail!(
                "Record {} has {} fields, expected 2 or 3",
                key,
                fields.len()
            ),
        };
        batch.insert(verse);
    }

    Ok(batch)
}
