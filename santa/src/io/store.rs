//! Exchange load/save helpers with schema validation.
//!
//! Each exchange lives in its own `exchange_<name>.json` file inside the
//! storage directory, with spaces in the name replaced by underscores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::validator_for;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, warn};

use crate::core::roster::Roster;
use crate::core::snapshot::Snapshot;

const EXCHANGE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/exchange/v1.schema.json"
));

const FILE_PREFIX: &str = "exchange_";
const FILE_SUFFIX: &str = ".json";

/// File name used to store the exchange called `name`.
pub fn file_name_for(name: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, name.replace(' ', "_"), FILE_SUFFIX)
}

/// Directory holding exchange snapshot files.
#[derive(Debug, Clone)]
pub struct ExchangeStore {
    dir: PathBuf,
}

impl ExchangeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.trim().is_empty() {
            bail!("exchange name must not be empty");
        }
        if name.contains(['/', '\\']) {
            bail!("exchange name '{}' must not contain path separators", name);
        }
        Ok(self.dir.join(file_name_for(name)))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name)?.exists())
    }

    /// Create and persist an empty exchange.
    ///
    /// Fails if the exchange already exists unless `force` is set.
    pub fn create(&self, name: &str, budget: f64, force: bool) -> Result<Roster> {
        let path = self.path_for(name)?;
        if path.exists() && !force {
            return Err(anyhow!(
                "exchange '{}' already exists at {} (use --force to overwrite)",
                name,
                path.display()
            ));
        }
        let roster = Roster::new(name, budget);
        self.save(&roster)?;
        Ok(roster)
    }

    /// Load and validate the exchange called `name`.
    pub fn load(&self, name: &str) -> Result<Roster> {
        let path = self.path_for(name)?;
        load_roster(&path)
    }

    /// Write `roster` to its snapshot file. Returns the path written.
    pub fn save(&self, roster: &Roster) -> Result<PathBuf> {
        let path = self.path_for(roster.name())?;
        write_roster(&path, roster)?;
        Ok(path)
    }

    /// Delete the snapshot file for `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        debug!(path = %path.display(), "deleting exchange");
        fs::remove_file(&path).with_context(|| format!("delete exchange {}", path.display()))
    }

    /// Names of the exchanges stored in this directory, sorted.
    ///
    /// Files that cannot be read as snapshots are skipped with a warning.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("read directory {}", self.dir.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in {}", self.dir.display()))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !file_name.starts_with(FILE_PREFIX) || !file_name.ends_with(FILE_SUFFIX) {
                continue;
            }
            match load_snapshot(&entry.path()) {
                Ok(snapshot) => names.push(snapshot.name),
                Err(err) => {
                    let reason = format!("{:#}", err);
                    warn!(path = %entry.path().display(), %reason, "skipping unreadable exchange");
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Load a snapshot file, validate it against the schema and rebuild the roster.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let snapshot = load_snapshot(path)?;
    let roster = Roster::from_snapshot(&snapshot)
        .with_context(|| format!("rebuild exchange {}", path.display()))?;
    debug!(path = %path.display(), participants = roster.len(), "exchange loaded");
    Ok(roster)
}

/// Write `roster` as pretty JSON (four-space indent, trailing newline).
///
/// The snapshot is checked against the same schema `load_roster` enforces, so
/// a roster that could not be read back (negative or non-finite budget) is
/// never written.
pub fn write_roster(path: &Path, roster: &Roster) -> Result<()> {
    debug!(path = %path.display(), participants = roster.len(), "writing exchange");
    let snapshot = roster.to_snapshot();
    let value = serde_json::to_value(&snapshot).context("serialize exchange")?;
    validate_schema(&value).with_context(|| format!("validate exchange {}", path.display()))?;

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    snapshot
        .serialize(&mut serializer)
        .context("serialize exchange")?;
    buf.push(b'\n');
    write_atomic(path, &buf)
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read exchange {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse exchange {}", path.display()))?;
    validate_schema(&value).with_context(|| format!("validate exchange {}", path.display()))?;
    serde_json::from_value(value).with_context(|| format!("deserialize exchange {}", path.display()))
}

fn validate_schema(value: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(EXCHANGE_SCHEMA).context("parse exchange schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(value) {
        let messages = compiled
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "exchange schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("exchange path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp exchange {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace exchange {}", path.display()))?;
    Ok(())
}
