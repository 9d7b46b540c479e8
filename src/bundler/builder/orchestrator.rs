//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that selects the dirty
//! packages of a project and drives discovery, the loader pipeline and the
//! result writer over each of them.

use super::checksum::{calculate_package_sha256, calculate_rules_sha256};
use super::discovery::discover_package_files;
use super::manifest::BuildManifest;
use super::report::Report;
use super::runner::run_bounded;
use super::summary::{BuildSummary, FileOutcome, PackageStatus, PackageSummary};
use super::writer::{WriteOutcome, write_result};
use crate::bail;
use crate::bundler::loader::{
    BUNDLER_SOURCE_TAG, FileContext, FileLog, LoaderChainResolver, LoaderDescriptor,
    LoaderRegistry, RulesResolver, run_loaders,
};
use crate::bundler::utils::fs;
use crate::bundler::{Error, PackageDescriptor, Project, Result, Settings};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main bundler orchestrator.
///
/// Packages are processed concurrently with each other; the files of one
/// package go through the bounded runner in discovery order.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_npm::bundler::{Bundler, Settings};
/// use kodegen_bundler_npm::bundler::loader::LoaderRegistry;
/// use kodegen_bundler_npm::metadata::load_project;
///
/// # async fn example(settings: Settings) -> kodegen_bundler_npm::Result<()> {
/// let project = load_project(&settings).await?;
/// let bundler = Bundler::new(settings, &LoaderRegistry::with_builtins())?;
///
/// let summary = bundler.bundle_project(&project).await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub struct Bundler {
    settings: Settings,
    resolver: Box<dyn LoaderChainResolver>,
    report: Report,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field("resolver", &"<LoaderChainResolver>")
            .field("report", &self.report)
            .finish()
    }
}

impl Bundler {
    /// Creates a bundler resolving loader chains from the configured rules.
    ///
    /// # Errors
    ///
    /// Fails if a rule is invalid or names a loader missing from `registry`.
    pub fn new(settings: Settings, registry: &LoaderRegistry) -> Result<Self> {
        let resolver = RulesResolver::new(&settings, registry)?;
        Ok(Self::with_resolver(settings, resolver))
    }

    /// Creates a bundler using a custom loader chain resolver.
    pub fn with_resolver(settings: Settings, resolver: impl LoaderChainResolver + 'static) -> Self {
        Self {
            settings,
            resolver: Box::new(resolver),
            report: Report::new(),
        }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the diagnostics collected so far.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Derives the destination descriptor of a package.
    pub fn destination_for(&self, package: &PackageDescriptor) -> PackageDescriptor {
        package.clone_to(self.settings.package_output_dir(package))
    }

    /// Bundles `root` and `dependencies`, skipping clean packages.
    ///
    /// Every dirty package is driven to completion before the first failure
    /// is returned.
    pub async fn bundle(
        &self,
        root: &PackageDescriptor,
        dependencies: &[PackageDescriptor],
    ) -> Result<BuildSummary> {
        let started = Instant::now();
        let packages: Vec<&PackageDescriptor> = std::iter::once(root).chain(dependencies).collect();

        for package in packages.iter().filter(|p| p.is_clean()) {
            log::debug!("Skipping clean package {}", package.id());
            self.report.package(package.id(), PackageStatus::Skipped);
        }

        let dirty: Vec<&PackageDescriptor> =
            packages.iter().copied().filter(|p| !p.is_clean()).collect();
        let mut results = join_all(dirty.iter().map(|p| self.bundle_package(p)))
            .await
            .into_iter();

        let mut summary = BuildSummary::default();
        let mut first_error = None;
        for package in &packages {
            if package.is_clean() {
                summary.packages.push(PackageSummary::skipped(package.id()));
                continue;
            }
            match results.next() {
                Some(Ok(package_summary)) => summary.packages.push(package_summary),
                Some(Err(e)) => {
                    log::error!("Bundling {} failed: {}", package.id(), e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                None => {}
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        summary.total_duration = started.elapsed();
        log::info!(
            "Bundled {} package(s) in {:.2?}",
            summary.processed_count(),
            summary.total_duration
        );
        Ok(summary)
    }

    /// Bundles a loaded project, then updates the manifest and the report.
    pub async fn bundle_project(&self, project: &Project) -> Result<BuildSummary> {
        let summary = self.bundle(project.root(), project.dependencies()).await?;

        if self.settings.use_manifest() {
            self.update_manifest(project).await?;
        }
        if self.settings.dump_report() {
            self.report.save(&self.settings.report_path()).await?;
        }

        Ok(summary)
    }

    async fn update_manifest(&self, project: &Project) -> Result<()> {
        let path = self.settings.manifest_path();
        let mut manifest = BuildManifest::load(&path).await?;
        let rules_digest = calculate_rules_sha256(self.settings.rules())?;

        for dependency in project.dependencies() {
            if dependency.is_clean() && manifest.entry(dependency.id()).is_some() {
                continue;
            }
            let digest = match project.digest(dependency.id()) {
                Some(digest) => digest.to_string(),
                None => calculate_package_sha256(dependency.dir()).await?,
            };
            manifest.record(dependency.id(), digest, &rules_digest);
        }
        manifest.retain_ids(project.dependencies().iter().map(|d| d.id()));

        manifest.save(&path).await?;
        log::debug!("Recorded {} dependency digest(s)", manifest.len());
        Ok(())
    }

    async fn bundle_package(&self, package: &PackageDescriptor) -> Result<PackageSummary> {
        let started = Instant::now();
        let dest = self.destination_for(package);
        if dest.dir() == package.dir() {
            bail!(
                "destination of {} is its source directory {}",
                package.id(),
                package.dir().display()
            );
        }

        // The root destination also holds dependency outputs and the manifest.
        fs::create_dir_all(dest.dir(), !package.is_root()).await?;

        let files = discover_package_files(&self.settings, package).await?;
        log::info!("Bundling {} ({} file(s))", package.id(), files.len());

        let dest = &dest;
        let outcomes = run_bounded(&files, self.settings.max_parallel_files(), 0, |file| {
            self.process_file(package, dest, file)
        })
        .await?;

        self.report.package(package.id(), PackageStatus::Processed);
        Ok(PackageSummary::processed(package.id(), &outcomes, started.elapsed()))
    }

    async fn process_file(
        &self,
        src: &PackageDescriptor,
        dest: &PackageDescriptor,
        file: PathBuf,
    ) -> Result<FileOutcome> {
        let absolute = self.settings.resolve_path(&file);
        let chain = match self.resolver.loaders_for_file(&absolute) {
            Ok(chain) => chain,
            Err(e) => return Err(file_failed(file, e)),
        };

        if chain.is_empty() {
            log::trace!("No loaders for {}", file.display());
            return Ok(FileOutcome::Untouched);
        }

        match self.transform_file(src, dest, &file, &chain).await {
            Ok(Some(written)) => Ok(FileOutcome::Processed(written)),
            Ok(None) => Ok(FileOutcome::Untouched),
            Err(e) => Err(file_failed(file, e)),
        }
    }

    /// Returns `None` when the file is not UTF-8 text and was skipped.
    async fn transform_file(
        &self,
        src: &PackageDescriptor,
        dest: &PackageDescriptor,
        file: &Path,
        chain: &[LoaderDescriptor],
    ) -> Result<Option<WriteOutcome>> {
        let bytes = fs::read_file(&self.settings.resolve_path(file)).await?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping {}: {}", file.display(), e.utf8_error());
                let mut diagnostics = FileLog::default();
                diagnostics.warn(
                    BUNDLER_SOURCE_TAG,
                    format!("Skipped non UTF-8 file: {}", e.utf8_error()),
                );
                self.report.file(file, diagnostics.into_entries());
                return Ok(None);
            }
        };

        let mut context = run_loaders(chain, FileContext::new(file, content)).await?;
        let written = write_result(&self.settings, src, dest, &mut context).await?;
        self.report.file(file, context.log.into_entries());
        Ok(Some(written))
    }
}

fn file_failed(file: PathBuf, error: Error) -> Error {
    Error::FileFailed {
        file,
        source: Box::new(error),
    }
}

/// Computes the source-tree digest of each dependency.
///
/// # Errors
///
/// Fails if a dependency directory cannot be read.
pub async fn dependency_digests(dependencies: &[PackageDescriptor]) -> Result<BTreeMap<String, String>> {
    let mut digests = BTreeMap::new();
    for dependency in dependencies {
        let digest = calculate_package_sha256(dependency.dir()).await?;
        digests.insert(dependency.id().to_string(), digest);
    }
    Ok(digests)
}
