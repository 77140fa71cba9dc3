use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::GenError;

/// First host language version that ships the interception feature the
/// generated wrappers rely on.
pub const MIN_INTERCEPTION_VERSION: u32 = 12;

/// Generator configuration, loaded from `pretend.toml` when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Host language version of the consuming project.
    pub language_version: u32,
    /// Namespace the generated units are placed in.
    pub namespace: String,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            language_version: MIN_INTERCEPTION_VERSION,
            namespace: "Pretender.Generated".to_string(),
        }
    }
}

impl Manifest {
    pub fn supports_interception(&self) -> bool {
        self.language_version >= MIN_INTERCEPTION_VERSION
    }
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
struct TomlManifest {
    generator: Option<TomlGenerator>,
}

#[derive(Deserialize)]
struct TomlGenerator {
    language_version: Option<u32>,
    namespace: Option<String>,
}

/// Load and validate a `pretend.toml` manifest.
pub fn load_manifest(path: &Path) -> Result<Manifest, GenError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| GenError::manifest(format!("failed to read manifest: {e}"), path.to_path_buf()))?;
    parse_manifest(&text, path)
}

fn parse_manifest(text: &str, path: &Path) -> Result<Manifest, GenError> {
    let parsed: TomlManifest = toml::from_str(text)
        .map_err(|e| GenError::manifest(format!("invalid manifest: {e}"), path.to_path_buf()))?;

    let mut manifest = Manifest::default();
    if let Some(generator) = parsed.generator {
        if let Some(version) = generator.language_version {
            if version == 0 {
                return Err(GenError::manifest(
                    "language_version must be at least 1",
                    path.to_path_buf(),
                ));
            }
            manifest.language_version = version;
        }
        if let Some(namespace) = generator.namespace {
            if namespace.is_empty()
                || !namespace.split('.').all(|seg| {
                    !seg.is_empty()
                        && seg.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
                        && seg.chars().all(|c| c.is_alphanumeric() || c == '_')
                })
            {
                return Err(GenError::manifest(
                    format!("'{namespace}' is not a valid namespace"),
                    path.to_path_buf(),
                ));
            }
            manifest.namespace = namespace;
        }
    }
    Ok(manifest)
}
