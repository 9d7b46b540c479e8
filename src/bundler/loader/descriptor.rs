//! Loader capability and resolved loader descriptors.

use super::FileContext;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by [`Loader::exec`].
///
/// Resolves to `Some(content)` to replace the file's content, or `None` to
/// leave it unchanged.
pub type LoaderFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send + 'a>>;

/// A transform step applied to a file's content.
///
/// Loaders receive exclusive access to the file's [`FileContext`] for the
/// duration of their call and may add extra artifacts or diagnostics to it.
pub trait Loader: Send + Sync {
    /// Runs the loader with its configured options.
    fn exec<'a>(&'a self, context: &'a mut FileContext, options: &'a Value) -> LoaderFuture<'a>;
}

/// Adapts a synchronous closure into a [`Loader`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_npm::bundler::loader::FnLoader;
///
/// let uppercase = FnLoader::new(|ctx, _options| {
///     Ok(ctx.content.as_ref().map(|c| c.to_uppercase()))
/// });
/// ```
pub struct FnLoader<F> {
    func: F,
}

impl<F> FnLoader<F> {
    /// Wraps `func`.
    pub fn new(func: F) -> Self
    where
        F: Fn(&mut FileContext, &Value) -> anyhow::Result<Option<String>> + Send + Sync,
    {
        Self { func }
    }
}

impl<F> Loader for FnLoader<F>
where
    F: Fn(&mut FileContext, &Value) -> anyhow::Result<Option<String>> + Send + Sync,
{
    fn exec<'a>(&'a self, context: &'a mut FileContext, options: &'a Value) -> LoaderFuture<'a> {
        let result = (self.func)(context, options);
        Box::pin(async move { result })
    }
}

/// One configured step of a file's loader chain.
#[derive(Clone)]
pub struct LoaderDescriptor {
    use_id: String,
    loader: Arc<dyn Loader>,
    options: Value,
}

impl LoaderDescriptor {
    /// Creates a descriptor.
    pub fn new(use_id: impl Into<String>, loader: Arc<dyn Loader>, options: Value) -> Self {
        Self {
            use_id: use_id.into(),
            loader,
            options,
        }
    }

    /// Returns the human-readable identifier (`use`).
    pub fn use_id(&self) -> &str {
        &self.use_id
    }

    /// Returns the options payload.
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Returns the executable transform.
    pub fn loader(&self) -> &dyn Loader {
        self.loader.as_ref()
    }
}

impl fmt::Debug for LoaderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderDescriptor")
            .field("use_id", &self.use_id)
            .field("loader", &"<Loader>")
            .field("options", &self.options)
            .finish()
    }
}
