//! Project metadata: package versions from a `.csproj` file and the NuGet
//! global packages folder they are installed into.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use pipesync_fs::{NormalizedPath, io};
use regex::Regex;

use crate::references::ReferenceResolver;
use crate::{Error, Result};

/// Extension every project file must carry.
pub const PROJECT_EXTENSION: &str = "csproj";

/// NuGet config file names, checked in each directory from the project
/// upwards.
const NUGET_CONFIG_NAMES: &[&str] = &["nuget.config", "NuGet.config", "NuGet.Config"];

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static PACKAGE_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<PackageReference\b([^>]*?)(?:/>|>(.*?)</PackageReference\s*>)")
        .expect("Invalid package reference regex")
});

static INCLUDE_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bInclude\s*=\s*"([^"]*)""#).expect("Invalid include regex")
});

static VERSION_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bVersion\s*=\s*"([^"]*)""#).expect("Invalid version attribute regex")
});

static VERSION_ELEMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<Version>\s*(.*?)\s*</Version>").expect("Invalid version element regex")
});

static ADD_ELEMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<add\b([^>]*?)/?>").expect("Invalid add element regex"));

static KEY_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bkey\s*=\s*"([^"]*)""#).expect("Invalid key regex")
});

static VALUE_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bvalue\s*=\s*"([^"]*)""#).expect("Invalid value regex")
});

/// Package dependencies declared by a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    path: NormalizedPath,
    packages: Vec<(String, String)>,
}

impl ProjectFile {
    /// Read a project file. It must exist and carry the `.csproj` extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let has_extension = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(PROJECT_EXTENSION));
        if !has_extension || !path.is_file() {
            return Err(Error::InvalidProject {
                path: path.to_native(),
            });
        }
        let content = io::read_text(path)?;
        let packages = parse_package_references(&content);
        tracing::info!(
            "Found package dependencies {}",
            packages
                .iter()
                .map(|(name, version)| format!("{name}@{version}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(Self {
            path: path.clone(),
            packages,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// `(name, version)` pairs in declaration order.
    pub fn packages(&self) -> &[(String, String)] {
        &self.packages
    }
}

/// Extract `PackageReference` items that carry a version, either as a
/// `Version` attribute or a `<Version>` child element. Items without a
/// version are ignored; a repeated package keeps its first version.
pub fn parse_package_references(content: &str) -> Vec<(String, String)> {
    let content = COMMENT_REGEX.replace_all(content, "");
    let mut packages: Vec<(String, String)> = Vec::new();

    for caps in PACKAGE_REFERENCE_REGEX.captures_iter(&content) {
        let attributes = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        let Some(name) = INCLUDE_ATTR_REGEX
            .captures(attributes)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
        else {
            continue;
        };

        let version = VERSION_ATTR_REGEX
            .captures(attributes)
            .or_else(|| VERSION_ELEMENT_REGEX.captures(body))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty());
        let Some(version) = version else {
            tracing::debug!(package = name, "package reference has no version");
            continue;
        };

        if packages.iter().any(|(n, _)| n == name) {
            tracing::debug!(package = name, "duplicate package reference ignored");
            continue;
        }
        packages.push((name.to_string(), version.to_string()));
    }

    packages
}

/// Locate the NuGet global packages folder for a project directory.
///
/// `NUGET_PACKAGES` wins, then the `globalPackagesFolder` setting of the
/// nearest `nuget.config`, then `~/.nuget/packages`.
pub fn global_packages_folder(project_dir: &NormalizedPath) -> Option<NormalizedPath> {
    let env = std::env::var("NUGET_PACKAGES").ok();
    resolve_packages_folder(project_dir, env.as_deref(), dirs::home_dir().as_deref())
}

/// [`global_packages_folder`] with the environment passed in explicitly.
pub fn resolve_packages_folder(
    project_dir: &NormalizedPath,
    env_override: Option<&str>,
    home: Option<&Path>,
) -> Option<NormalizedPath> {
    if let Some(folder) = env_override.map(str::trim).filter(|f| !f.is_empty()) {
        return Some(NormalizedPath::new(folder));
    }

    let mut dir = Some(project_dir.clone());
    while let Some(current) = dir {
        for name in NUGET_CONFIG_NAMES {
            let config = current.join(name);
            if !config.is_file() {
                continue;
            }
            match io::read_text(&config) {
                Ok(content) => {
                    if let Some(folder) = packages_folder_setting(&content) {
                        return Some(absolutize(&current, &folder));
                    }
                }
                Err(e) => tracing::warn!("Error reading NuGet config {}: {}", config, e),
            }
            // one config per directory; case-variant names are the same file on
            // case-insensitive filesystems
            break;
        }
        dir = current.parent();
    }

    home.map(|h| NormalizedPath::new(h).join(".nuget/packages"))
}

fn packages_folder_setting(content: &str) -> Option<String> {
    let content = COMMENT_REGEX.replace_all(content, "");
    ADD_ELEMENT_REGEX.captures_iter(&content).find_map(|caps| {
        let attributes = caps.get(1)?.as_str();
        let key = KEY_ATTR_REGEX.captures(attributes)?.get(1)?.as_str();
        if !key.eq_ignore_ascii_case("globalPackagesFolder") {
            return None;
        }
        let value = VALUE_ATTR_REGEX.captures(attributes)?.get(1)?.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn absolutize(base: &NormalizedPath, folder: &str) -> NormalizedPath {
    if Path::new(folder).is_absolute() || folder.starts_with('/') {
        NormalizedPath::new(folder)
    } else {
        base.join(folder.trim_start_matches("./"))
    }
}

/// Resolves references to `<packages>/<id>/<version>/tools/<Name>.dll`.
#[derive(Debug, Clone)]
pub struct NuGetResolver {
    packages_folder: NormalizedPath,
    installed: HashMap<String, String>,
}

impl NuGetResolver {
    pub fn new(packages_folder: NormalizedPath, packages: &[(String, String)]) -> Self {
        Self {
            packages_folder,
            installed: packages.iter().cloned().collect(),
        }
    }

    /// Build a resolver for a project file, locating the packages folder
    /// from the project's directory. `None` if no packages folder can be
    /// determined.
    pub fn for_project(project: &ProjectFile) -> Option<Self> {
        let project_dir = project
            .path()
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."));
        let folder = global_packages_folder(&project_dir)?;
        tracing::info!("Using global packages folder {}", folder);
        Some(Self::new(folder, project.packages()))
    }
}

impl ReferenceResolver for NuGetResolver {
    fn version_of(&self, library: &str) -> Option<String> {
        self.installed.get(library).cloned()
    }

    fn library_path(&self, library: &str, version: &str) -> String {
        self.packages_folder
            .join(&library.to_lowercase())
            .join(version)
            .join("tools")
            .join(&format!("{library}.dll"))
            .as_str()
            .to_string()
    }
}
