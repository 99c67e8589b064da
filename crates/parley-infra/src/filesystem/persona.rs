//! File-backed persona store.
//!
//! Personas live at `{data_dir}/personas/{slug}.json` (or `.yaml` / `.yml`),
//! where the slug is derived from the agent name. Authors edit these files
//! directly; Parley only writes one when an agent is created without one.

use std::path::{Path, PathBuf};

use tracing::debug;

use parley_core::repository::persona::PersonaSource;
use parley_types::error::PersonaError;
use parley_types::persona::Persona;

/// Extensions tried, in order, when looking up a persona file.
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Persona source reading JSON/YAML character files from a directory.
pub struct FilePersonaStore {
    dir: PathBuf,
}

impl FilePersonaStore {
    /// Store rooted at `{data_dir}/personas`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("personas"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the JSON file written for `agent_name`.
    pub fn json_path(&self, agent_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slugify(agent_name)))
    }

    /// First existing persona file for `agent_name`, if any.
    pub async fn find(&self, agent_name: &str) -> Option<PathBuf> {
        let slug = slugify(agent_name);
        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{slug}.{ext}"));
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    /// Write `persona` as pretty JSON, creating the directory if needed.
    pub async fn save_persona(&self, persona: &Persona) -> Result<PathBuf, PersonaError> {
        let path = self.json_path(&persona.name);
        let json = serde_json::to_string_pretty(persona)
            .map_err(|e| PersonaError::Invalid(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersonaError::Io(e.to_string()))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| PersonaError::Io(e.to_string()))?;

        debug!(path = %path.display(), "Wrote persona file");
        Ok(path)
    }

    /// Write `persona` only if no file exists for its name yet.
    ///
    /// Returns `true` when a file was written.
    pub async fn save_if_missing(&self, persona: &Persona) -> Result<bool, PersonaError> {
        if self.find(&persona.name).await.is_some() {
            return Ok(false);
        }
        self.save_persona(persona).await?;
        Ok(true)
    }
}

impl PersonaSource for FilePersonaStore {
    async fn get_persona(&self, agent_name: &str) -> Result<Persona, PersonaError> {
        let Some(path) = self.find(agent_name).await else {
            return Err(PersonaError::NotFound(agent_name.to_string()));
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PersonaError::Io(format!("{}: {e}", path.display())))?;

        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str::<Persona>(&content).map_err(|e| e.to_string()),
            _ => serde_yaml_ng::from_str::<Persona>(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| PersonaError::Invalid(format!("{}: {e}", path.display())))
    }
}

/// Lowercase `name`, replace non-alphanumerics with `-`, collapse runs of
/// hyphens, and trim them from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_was_hyphen = true; // treat start as hyphen to trim leading

    for c in name.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            slug.push('-');
            prev_was_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
