//! Sequential execution of a file's loader chain.

use super::{FileContext, LoaderDescriptor};
use crate::bundler::{Error, Result};

/// Runs `chain` over `context`, in order, and returns the final context.
///
/// Each loader sees the context left by the previous one. A loader returning
/// `Some(content)` replaces the content; `None` leaves it as is. The first
/// failing loader aborts the chain with [`Error::LoaderFailed`].
pub async fn run_loaders(chain: &[LoaderDescriptor], mut context: FileContext) -> Result<FileContext> {
    for descriptor in chain {
        log::debug!(
            "Running loader '{}' on {}",
            descriptor.use_id(),
            context.file_path().display()
        );

        match descriptor
            .loader()
            .exec(&mut context, descriptor.options())
            .await
        {
            Ok(Some(content)) => context.content = Some(content),
            Ok(None) => {}
            Err(e) => {
                return Err(Error::LoaderFailed {
                    loader: descriptor.use_id().to_string(),
                    message: format!("{:#}", e),
                });
            }
        }
    }

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::loader::{FnLoader, Loader, LoaderFuture};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor<F>(name: &str, func: F) -> LoaderDescriptor
    where
        F: Fn(&mut FileContext, &Value) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        LoaderDescriptor::new(name, Arc::new(FnLoader::new(func)), Value::Null)
    }

    struct DelayedSuffix;

    impl Loader for DelayedSuffix {
        fn exec<'a>(&'a self, context: &'a mut FileContext, options: &'a Value) -> LoaderFuture<'a> {
            Box::pin(async move {
                tokio::task::yield_now().await;
                let suffix = options["suffix"].as_str().unwrap_or_default();
                Ok(context.content.as_ref().map(|c| format!("{}{}", c, suffix)))
            })
        }
    }

    #[tokio::test]
    async fn test_loaders_apply_in_order() {
        let chain = vec![
            descriptor("upper", |ctx, _| Ok(ctx.content.as_ref().map(|c| c.to_uppercase()))),
            LoaderDescriptor::new("suffix", Arc::new(DelayedSuffix), json!({ "suffix": "!" })),
            descriptor("wrap", |ctx, _| Ok(ctx.content.as_ref().map(|c| format!("[{}]", c)))),
        ];

        let ctx = run_loaders(&chain, FileContext::new("src/a.js", "hello")).await.unwrap();
        assert_eq!(ctx.content.as_deref(), Some("[HELLO!]"));
    }

    #[tokio::test]
    async fn test_none_is_identity() {
        let chain = vec![
            descriptor("noop", |_, _| Ok(None)),
            descriptor("upper", |ctx, _| Ok(ctx.content.as_ref().map(|c| c.to_uppercase()))),
            descriptor("noop2", |_, _| Ok(None)),
        ];

        let ctx = run_loaders(&chain, FileContext::new("src/a.js", "abc")).await.unwrap();
        assert_eq!(ctx.content.as_deref(), Some("ABC"));
    }

    #[tokio::test]
    async fn test_empty_chain_returns_context_unchanged() {
        let ctx = run_loaders(&[], FileContext::new("src/a.js", "abc")).await.unwrap();
        assert_eq!(ctx.content.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_failure_stops_chain_and_names_loader() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);

        let chain = vec![
            descriptor("first", |_, _| Ok(Some("one".to_string()))),
            descriptor("broken", |_, _| Err(anyhow::anyhow!("unexpected token"))),
            descriptor("after", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }),
        ];

        let err = run_loaders(&chain, FileContext::new("src/a.js", "abc"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Loader 'broken' failed: unexpected token");
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loader_can_suppress_output_and_emit_artifacts() {
        let chain = vec![descriptor("extract", |ctx, _| {
            let css = ctx.content.take().unwrap_or_default();
            ctx.set_extra_artifact("src/style.css.js", Some(format!("export default {:?};", css)));
            Ok(None)
        })];

        let ctx = run_loaders(&chain, FileContext::new("src/style.css", "a{}")).await.unwrap();
        assert!(ctx.content.is_none());
        assert_eq!(ctx.emitted_artifacts().count(), 1);
    }

    #[tokio::test]
    async fn test_running_twice_is_deterministic() {
        let chain = vec![descriptor("upper", |ctx, _| {
            Ok(ctx.content.as_ref().map(|c| c.to_uppercase()))
        })];

        let first = run_loaders(&chain, FileContext::new("a.js", "same")).await.unwrap();
        let second = run_loaders(&chain, FileContext::new("a.js", "same")).await.unwrap();
        assert_eq!(first.content, second.content);
    }
}
