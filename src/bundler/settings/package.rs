//! Package descriptors for source and destination packages.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identifies a package being bundled: the project itself or one of its
/// npm dependencies.
///
/// Source descriptors are produced while loading the project; the
/// orchestrator derives destination descriptors from them with
/// [`PackageDescriptor::clone_to`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_npm::bundler::PackageDescriptor;
///
/// let root = PackageDescriptor::root("my-portlet", "1.0.0", "/work/my-portlet");
/// let dest = root.clone_to("/work/my-portlet/build");
///
/// assert_eq!(root.id(), dest.id());
/// assert!(dest.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// `name@version`
    id: String,

    /// Package name from `package.json`.
    name: String,

    /// Package version from `package.json`.
    version: String,

    /// Absolute package directory.
    dir: PathBuf,

    /// Whether this is the project's own package.
    is_root: bool,

    /// Whether the package needs no processing in this pass.
    clean: bool,
}

impl PackageDescriptor {
    /// Creates the descriptor of the project's own package.
    pub fn root(name: impl Into<String>, version: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::new(name.into(), version.into(), dir.into(), true)
    }

    /// Creates the descriptor of a dependency package.
    pub fn dependency(
        name: impl Into<String>,
        version: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(name.into(), version.into(), dir.into(), false)
    }

    fn new(name: String, version: String, dir: PathBuf, is_root: bool) -> Self {
        Self {
            id: format!("{}@{}", name, version),
            name,
            version,
            dir,
            is_root,
            clean: false,
        }
    }

    /// Marks the package as clean (skipped) or dirty.
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Derives a descriptor with the same identity and rootness living in `dir`.
    pub fn clone_to(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..self.clone()
        }
    }

    /// Returns the unique id (`name@version`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the package version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the absolute package directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true for the project's own package.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Returns true if the package needs no processing.
    pub fn is_clean(&self) -> bool {
        self.clean
    }
}

/// The packages of one bundling pass.
///
/// Holds the root package, its resolved dependencies (sorted by id) and the
/// source-tree digest of each dependency, when computed.
#[derive(Debug, Clone)]
pub struct Project {
    root: PackageDescriptor,
    dependencies: Vec<PackageDescriptor>,
    digests: BTreeMap<String, String>,
}

impl Project {
    /// Creates a project without dependency digests.
    pub fn new(root: PackageDescriptor, dependencies: Vec<PackageDescriptor>) -> Self {
        Self {
            root,
            dependencies,
            digests: BTreeMap::new(),
        }
    }

    /// Attaches dependency digests keyed by package id.
    pub fn with_digests(mut self, digests: BTreeMap<String, String>) -> Self {
        self.digests = digests;
        self
    }

    /// Returns the project's own package.
    pub fn root(&self) -> &PackageDescriptor {
        &self.root
    }

    /// Returns the dependency packages.
    pub fn dependencies(&self) -> &[PackageDescriptor] {
        &self.dependencies
    }

    /// Returns the digest computed for a dependency.
    pub fn digest(&self, id: &str) -> Option<&str> {
        self.digests.get(id).map(String::as_str)
    }
}
