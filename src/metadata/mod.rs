//! Project metadata: `package.json`, `.npmbundlerrc` and installed dependencies.

use crate::bundler::builder::checksum::calculate_rules_sha256;
use crate::bundler::builder::{BuildManifest, dependency_digests};
use crate::bundler::{NpmbundlerRc, PackageDescriptor, Project, Settings};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const NPMBUNDLERRC_FILE_NAME: &str = ".npmbundlerrc";

/// Name of the npm package manifest.
pub const PACKAGE_JSON_FILE_NAME: &str = "package.json";

/// The parts of `package.json` the bundler reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    /// Package name
    pub name: Option<String>,

    /// Package version
    pub version: Option<String>,

    /// Production dependencies: name to version range
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    fn identity(&self, path: &Path) -> Result<(&str, &str)> {
        let missing = |field: &str| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Missing '{}' in {}", field, path.display()),
            })
        };
        let name = self.name.as_deref().ok_or_else(|| missing("name"))?;
        let version = self.version.as_deref().ok_or_else(|| missing("version"))?;
        Ok((name, version))
    }
}

/// Loads `package.json` from `dir`.
pub fn load_package_json(dir: &Path) -> Result<PackageJson> {
    let path = dir.join(PACKAGE_JSON_FILE_NAME);
    let text = std::fs::read_to_string(&path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_package_json".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    serde_json::from_str(&text).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "parse_package_json".to_string(),
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })
    })
}

/// Loads `.npmbundlerrc` from `dir`, or defaults if the file is absent.
pub fn load_npmbundlerrc(dir: &Path) -> Result<NpmbundlerRc> {
    let path = dir.join(NPMBUNDLERRC_FILE_NAME);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No {} in {}, using defaults", NPMBUNDLERRC_FILE_NAME, dir.display());
            return Ok(NpmbundlerRc::default());
        }
        Err(e) => {
            return Err(BundlerError::Cli(CliError::ExecutionFailed {
                command: "read_npmbundlerrc".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            }));
        }
    };

    serde_json::from_str(&text).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "parse_npmbundlerrc".to_string(),
            reason: format!("Failed to parse {}: {}", path.display(), e),
        })
    })
}

/// Finds the installed directory of `name` as seen from `from`.
///
/// Looks in `from/node_modules` first, then in the project's hoisted
/// `node_modules`.
fn locate_dependency(project_dir: &Path, from: &Path, name: &str) -> Option<PathBuf> {
    [from, project_dir]
        .iter()
        .map(|base| base.join("node_modules").join(name))
        .find(|dir| dir.join(PACKAGE_JSON_FILE_NAME).is_file())
}

/// Resolves the production dependencies of the project, transitively.
///
/// Dependencies that are not installed are logged and skipped. Each package
/// is returned once; the result is sorted by id.
pub fn resolve_dependencies(
    project_dir: &Path,
    root: &PackageJson,
) -> Result<Vec<PackageDescriptor>> {
    let mut queue: VecDeque<(PathBuf, String)> = root
        .dependencies
        .keys()
        .map(|name| (project_dir.to_path_buf(), name.clone()))
        .collect();
    let mut visited = HashSet::new();
    let mut packages = Vec::new();

    while let Some((from, name)) = queue.pop_front() {
        let Some(dir) = locate_dependency(project_dir, &from, &name) else {
            log::warn!(
                "Dependency {} required from {} is not installed; skipping",
                name,
                from.display()
            );
            continue;
        };
        if !visited.insert(dir.clone()) {
            continue;
        }

        let package_json = load_package_json(&dir)?;
        let (pkg_name, version) = package_json.identity(&dir.join(PACKAGE_JSON_FILE_NAME))?;
        packages.push(PackageDescriptor::dependency(pkg_name, version, &dir));

        queue.extend(
            package_json
                .dependencies
                .keys()
                .map(|child| (dir.clone(), child.clone())),
        );
    }

    packages.sort_by(|a, b| a.id().cmp(b.id()));
    packages.dedup_by(|a, b| a.id() == b.id());

    log::debug!("Resolved {} dependency package(s)", packages.len());
    Ok(packages)
}

/// Loads the project described by `settings`.
///
/// The root package is always dirty. When the build manifest is enabled,
/// a dependency is clean if its source digest and the digest of the loader
/// rules match the ones recorded by the previous build and its output
/// directory still exists.
pub async fn load_project(settings: &Settings) -> Result<Project> {
    let project_dir = settings.project_dir();
    let package_json = load_package_json(project_dir)?;
    let (name, version) = package_json.identity(&project_dir.join(PACKAGE_JSON_FILE_NAME))?;
    let root = PackageDescriptor::root(name, version, project_dir);

    let dependencies = resolve_dependencies(project_dir, &package_json)?;
    if !settings.use_manifest() {
        return Ok(Project::new(root, dependencies));
    }

    let manifest = BuildManifest::load(&settings.manifest_path()).await?;
    let digests = dependency_digests(&dependencies).await?;
    let rules_digest = calculate_rules_sha256(settings.rules())?;

    let mut marked = Vec::with_capacity(dependencies.len());
    for dependency in dependencies {
        let fresh = digests
            .get(dependency.id())
            .is_some_and(|digest| manifest.is_fresh(dependency.id(), digest, &rules_digest));
        let clean = fresh && settings.package_output_dir(&dependency).is_dir();
        if clean {
            log::debug!("{} is unchanged since the last build", dependency.id());
        }
        marked.push(dependency.with_clean(clean));
    }

    Ok(Project::new(root, marked).with_digests(digests))
}
