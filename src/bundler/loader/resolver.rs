//! Resolution of the loader chain that applies to a file.

use super::{LoaderDescriptor, LoaderRegistry};
use crate::bundler::settings::{Patterns, Settings};
use crate::bundler::utils::path::to_slash;
use crate::bundler::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Produces the ordered loader chain for a file.
///
/// An empty chain is a normal result: the file is skipped.
pub trait LoaderChainResolver: Send + Sync {
    /// Returns the loaders configured for the file at `absolute_path`.
    fn loaders_for_file(&self, absolute_path: &Path) -> Result<Vec<LoaderDescriptor>>;
}

impl<F> LoaderChainResolver for F
where
    F: Fn(&Path) -> Result<Vec<LoaderDescriptor>> + Send + Sync,
{
    fn loaders_for_file(&self, absolute_path: &Path) -> Result<Vec<LoaderDescriptor>> {
        self(absolute_path)
    }
}

/// A rule with its expressions compiled and its loaders looked up.
#[derive(Debug)]
struct CompiledRule {
    test: Vec<Regex>,
    include: Option<Vec<Regex>>,
    exclude: Vec<Regex>,
    chain: Vec<LoaderDescriptor>,
}

impl CompiledRule {
    fn applies_to(&self, path: &str) -> bool {
        self.test.iter().any(|re| re.is_match(path))
            && self
                .include
                .as_ref()
                .is_none_or(|include| include.iter().any(|re| re.is_match(path)))
            && !self.exclude.iter().any(|re| re.is_match(path))
    }
}

/// Resolves chains from the `rules` section of `.npmbundlerrc`.
///
/// Rule expressions are matched against the file's project-relative path
/// with `/` separators (e.g. `src/components/button.js`). The chain of a
/// file is the concatenation of every applying rule's `use` list, in rule
/// order.
#[derive(Debug)]
pub struct RulesResolver {
    project_dir: PathBuf,
    rules: Vec<CompiledRule>,
}

impl RulesResolver {
    /// Compiles the rules in `settings` against `registry`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid expression or a loader name missing from the
    /// registry.
    pub fn new(settings: &Settings, registry: &LoaderRegistry) -> Result<Self> {
        let rules = settings
            .rules()
            .iter()
            .map(|rule| -> Result<CompiledRule> {
                let chain = rule
                    .uses
                    .iter()
                    .map(|use_| -> Result<LoaderDescriptor> {
                        let loader = registry.get(use_.loader()).ok_or_else(|| {
                            Error::Config(format!(
                                "unknown loader '{}' (available: {})",
                                use_.loader(),
                                registry.names().join(", ")
                            ))
                        })?;
                        Ok(LoaderDescriptor::new(use_.loader(), loader, use_.options()))
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(CompiledRule {
                    test: compile(&rule.test)?,
                    include: rule.include.as_ref().map(compile).transpose()?,
                    exclude: rule.exclude.as_ref().map(compile).transpose()?.unwrap_or_default(),
                    chain,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Compiled {} loader rule(s)", rules.len());

        Ok(Self {
            project_dir: settings.project_dir().to_path_buf(),
            rules,
        })
    }
}

fn compile(patterns: &Patterns) -> Result<Vec<Regex>> {
    patterns
        .as_slice()
        .iter()
        .map(|pattern| Regex::new(pattern).map_err(Error::from))
        .collect()
}

impl LoaderChainResolver for RulesResolver {
    fn loaders_for_file(&self, absolute_path: &Path) -> Result<Vec<LoaderDescriptor>> {
        let relative = absolute_path
            .strip_prefix(&self.project_dir)
            .unwrap_or(absolute_path);
        let path = to_slash(relative);

        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.applies_to(&path))
            .flat_map(|rule| rule.chain.iter().cloned())
            .collect())
    }
}
