//! Discovery and reading of declaration files on disk.
//!
//! Declarations live under `<root>/<namespace>/<category>/<name>.toml`:
//!
//! ```toml
//! run = "ping"
//!
//! [config]
//! permission_level = "User"
//! cooldown = { scope = "per-caller", usages = 2, duration = 10 }
//!
//! [data]
//! description = "Show the bot's status"
//! ```

use crate::descriptor::{CommandData, CooldownDecl, Namespace};
use crate::registry::ValidationError;
use async_trait::async_trait;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of declaration files.
pub const DECLARATION_EXTENSION: &str = "toml";

/// The `[config]` table of a declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDecl {
    /// Defaults to enabled.
    pub enabled: Option<bool>,
    /// Level name; defaults to the lowest level.
    pub permission_level: Option<String>,
    /// Capabilities the bot needs.
    pub client_capabilities: Vec<String>,
    /// Capabilities the caller needs.
    pub caller_capabilities: Vec<String>,
    /// Defaults to `false`.
    pub nsfw: Option<bool>,
    /// Defaults to the default cooldown.
    pub cooldown: Option<CooldownDecl>,
    /// Defaults to `false`.
    pub global: Option<bool>,
}

/// A parsed, not yet validated declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDeclaration {
    /// Name of the handler in the catalogue.
    pub run: Option<String>,
    /// Client-side configuration.
    #[serde(default)]
    pub config: ConfigDecl,
    /// Public data.
    #[serde(default)]
    pub data: CommandData,
}

/// Where a declaration lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleLocation {
    /// Namespace derived from the top-level directory.
    pub namespace: Namespace,
    /// Path of the declaration file.
    pub origin: PathBuf,
}

/// A declaration together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSource {
    /// Namespace derived from the top-level directory.
    pub namespace: Namespace,
    /// Path of the declaration file.
    pub origin: PathBuf,
    /// Parsed contents.
    pub declaration: ModuleDeclaration,
}

impl ModuleSource {
    /// Parses raw TOML read from `location`.
    pub fn parse(location: &ModuleLocation, raw: &str) -> Result<Self, ValidationError> {
        let declaration = toml::from_str(raw).map_err(|e| ValidationError::Malformed {
            origin: location.origin.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            namespace: location.namespace,
            origin: location.origin.clone(),
            declaration,
        })
    }

    /// File stem of the origin, the default identifier.
    pub fn file_stem(&self) -> Option<&str> {
        self.origin.file_stem().and_then(|s| s.to_str())
    }

    /// Parent directory name of the origin, the default category.
    pub fn parent_name(&self) -> Option<&str> {
        self.origin
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
    }
}

/// Reads declarations; reload goes through here to re-read the origin.
#[async_trait]
pub trait ModuleReader: Send + Sync {
    /// Reads and parses the declaration at `location`.
    async fn read(&self, location: &ModuleLocation) -> Result<ModuleSource, ValidationError>;
}

/// Reads declarations from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModuleReader;

#[async_trait]
impl ModuleReader for FsModuleReader {
    async fn read(&self, location: &ModuleLocation) -> Result<ModuleSource, ValidationError> {
        let raw = tokio::fs::read_to_string(&location.origin)
            .await
            .map_err(|e| ValidationError::Malformed {
                origin: location.origin.clone(),
                reason: e.to_string(),
            })?;
        ModuleSource::parse(location, &raw)
    }
}

/// Finds every declaration under `root`, namespace by namespace, sorted by path.
///
/// Missing namespace directories are skipped; dotfiles and dot-directories are ignored.
pub fn discover(root: &Path) -> io::Result<Vec<ModuleLocation>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        ));
    }

    let mut locations = Vec::new();
    for namespace in Namespace::ALL {
        let dir = root.join(namespace.as_str());
        if !dir.is_dir() {
            debug!(namespace = %namespace, "No declaration directory");
            continue;
        }

        let mut files = Vec::new();
        walk(&dir, &mut files)?;
        files.sort();
        debug!(namespace = %namespace, count = files.len(), "Discovered declarations");
        locations.extend(files.into_iter().map(|origin| ModuleLocation { namespace, origin }));
    }
    Ok(locations)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_str().map_or(true, |name| name.starts_with('.'));
        if hidden {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(DECLARATION_EXTENSION) {
            out.push(path);
        } else {
            warn!(path = %path.display(), "Ignoring non-declaration file");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_common::test_utils::{create_temp_dir, write_file};

    #[test]
    fn test_discover_walks_namespaces() {
        let dir = create_temp_dir();
        write_file(dir.path(), "commands/system/ping.toml", "run = \"ping\"");
        write_file(dir.path(), "commands/system/help.toml", "run = \"help\"");
        write_file(dir.path(), "commands/.hidden/secret.toml", "run = \"x\"");
        write_file(dir.path(), "commands/system/.draft.toml", "run = \"x\"");
        write_file(dir.path(), "commands/system/notes.md", "not a declaration");
        write_file(dir.path(), "buttons/confirm/confirm_accept.toml", "run = \"confirm\"");

        let found = discover(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|l| (l.namespace, l.origin.file_stem().unwrap().to_str().unwrap().to_string()))
            .collect();

        assert_eq!(
            names,
            vec![
                (Namespace::Commands, "help".to_string()),
                (Namespace::Commands, "ping".to_string()),
                (Namespace::Buttons, "confirm_accept".to_string()),
            ]
        );
    }

    #[test]
    fn test_discover_missing_root_errors() {
        let dir = create_temp_dir();
        assert!(discover(&dir.path().join("nope")).is_err());
    }

    #[tokio::test]
    async fn test_fs_reader_parses_declaration() {
        let dir = create_temp_dir();
        let origin = write_file(
            dir.path(),
            "commands/system/ping.toml",
            "run = \"ping\"\n[config]\ncooldown = false\n[data]\ndescription = \"Pong\"\n",
        );
        let location = ModuleLocation {
            namespace: Namespace::Commands,
            origin,
        };

        let source = FsModuleReader.read(&location).await.unwrap();
        assert_eq!(source.declaration.run.as_deref(), Some("ping"));
        assert_eq!(source.declaration.config.cooldown, Some(CooldownDecl::Toggle(false)));
        assert_eq!(source.file_stem(), Some("ping"));
        assert_eq!(source.parent_name(), Some("system"));
    }

    #[test]
    fn test_unknown_keys_are_malformed() {
        let location = ModuleLocation {
            namespace: Namespace::Commands,
            origin: PathBuf::from("commands/system/ping.toml"),
        };
        let err = ModuleSource::parse(&location, "run = \"ping\"\n[config]\nperm = 1\n").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));
    }
}
