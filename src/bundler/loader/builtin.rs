//! Loaders available without any registration.

use super::{FileContext, Loader, LoaderFuture};
use serde_json::Value;

/// Name of [`CopyLoader`].
pub const COPY_LOADER: &str = "copy-loader";

/// Name of [`IgnoreLoader`].
pub const IGNORE_LOADER: &str = "ignore-loader";

/// Leaves content untouched. Selecting a file with it copies the file.
#[derive(Debug, Default)]
pub struct CopyLoader;

impl Loader for CopyLoader {
    fn exec<'a>(&'a self, _context: &'a mut FileContext, _options: &'a Value) -> LoaderFuture<'a> {
        Box::pin(async { Ok(None) })
    }
}

/// Drops the file's content so nothing is written for it.
#[derive(Debug, Default)]
pub struct IgnoreLoader;

impl Loader for IgnoreLoader {
    fn exec<'a>(&'a self, context: &'a mut FileContext, _options: &'a Value) -> LoaderFuture<'a> {
        context.content = None;
        Box::pin(async { Ok(None) })
    }
}
