// src/plugin/host.rs

//! Build-tool side of the integration.
//!
//! [`BuildHost`] is what a plugin sees of a build tool: either tapable hooks
//! (newer hosts) or a legacy `plugin(event, handler)` registration. The
//! [`Compiler`] here is a small in-process host that drives one compilation
//! per call, used by the CLI watch loop and the tests.

use std::fmt;
use std::sync::mpsc;

use tracing::{debug, warn};

use crate::entries::{EntriesFn, EntryMap};
use crate::errors::Result;
use crate::plugin::collector::ContextDependencies;

/// Completion callback. Handlers must call it once they are done so the build
/// can proceed.
pub type Next = Box<dyn FnOnce() + Send>;

/// After-compile handler: receives the finished compilation and `Next`.
pub type AfterCompileHandler = Box<dyn FnMut(&mut Compilation, Next) + Send>;

/// Legacy event name for the after-compile lifecycle step.
pub const LEGACY_AFTER_COMPILE: &str = "after-compile";

/// State of one build pass that plugins can inspect and extend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    /// Entries the pass was built from.
    pub entries: EntryMap,
    /// Directories whose structure (files added/removed) the next watch cycle
    /// depends on.
    pub context_dependencies: ContextDependencies,
}

/// Async-series hook: taps run in registration order, each one waiting for
/// the previous to signal completion.
#[derive(Default)]
pub struct AsyncSeriesHook {
    taps: Vec<(String, AfterCompileHandler)>,
}

impl fmt::Debug for AsyncSeriesHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSeriesHook")
            .field("taps", &self.tap_names())
            .finish()
    }
}

impl AsyncSeriesHook {
    pub fn tap_async(&mut self, name: impl Into<String>, handler: AfterCompileHandler) {
        self.taps.push((name.into(), handler));
    }

    pub fn tap_names(&self) -> Vec<&str> {
        self.taps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Run every tap against `compilation`. Returns how many signalled
    /// completion.
    pub fn call(&mut self, compilation: &mut Compilation) -> usize {
        run_series(self.taps.iter_mut().map(|(n, h)| (n.as_str(), h)), compilation)
    }
}

/// Hooks exposed by hosts with the tapable API.
#[derive(Debug, Default)]
pub struct CompilerHooks {
    pub after_compile: AsyncSeriesHook,
}

/// The part of a build tool a plugin can register with.
pub trait BuildHost {
    /// Tapable hooks, if this host has them.
    fn hooks(&mut self) -> Option<&mut CompilerHooks>;

    /// Legacy event-name based registration.
    fn plugin(&mut self, event: &str, handler: AfterCompileHandler);
}

/// Which registration API a [`Compiler`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookStyle {
    /// Tapable hooks; context dependencies are a set.
    #[default]
    Tapable,
    /// `plugin(event, handler)`; context dependencies are a sequence.
    Legacy,
}

/// Minimal in-process build host.
#[derive(Debug, Default)]
pub struct Compiler {
    style: HookStyle,
    hooks: CompilerHooks,
    legacy: LegacyPlugins,
}

#[derive(Default)]
struct LegacyPlugins(Vec<(String, AfterCompileHandler)>);

impl fmt::Debug for LegacyPlugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|(e, _)| e)).finish()
    }
}

impl BuildHost for Compiler {
    fn hooks(&mut self) -> Option<&mut CompilerHooks> {
        match self.style {
            HookStyle::Tapable => Some(&mut self.hooks),
            HookStyle::Legacy => None,
        }
    }

    fn plugin(&mut self, event: &str, handler: AfterCompileHandler) {
        self.legacy.0.push((event.to_string(), handler));
    }
}

impl Compiler {
    pub fn new(style: HookStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> HookStyle {
        self.style
    }

    /// Tap names registered on the after-compile hook.
    pub fn after_compile_taps(&self) -> Vec<&str> {
        self.hooks.after_compile.tap_names()
    }

    /// Event names registered through the legacy API.
    pub fn legacy_events(&self) -> Vec<&str> {
        self.legacy.0.iter().map(|(event, _)| event.as_str()).collect()
    }

    /// Empty compilation whose context dependencies have this host's shape.
    pub fn new_compilation(&self, entries: EntryMap) -> Compilation {
        let context_dependencies = match self.style {
            HookStyle::Tapable => ContextDependencies::Set(Default::default()),
            HookStyle::Legacy => ContextDependencies::Sequence(Vec::new()),
        };
        Compilation {
            entries,
            context_dependencies,
        }
    }

    /// Fire the after-compile lifecycle step. Returns how many handlers
    /// signalled completion.
    pub fn after_compile(&mut self, compilation: &mut Compilation) -> usize {
        match self.style {
            HookStyle::Tapable => self.hooks.after_compile.call(compilation),
            HookStyle::Legacy => run_series(
                self.legacy
                    .0
                    .iter_mut()
                    .filter(|(event, _)| event == LEGACY_AFTER_COMPILE)
                    .map(|(e, h)| (e.as_str(), h)),
                compilation,
            ),
        }
    }

    /// One build pass: produce entries, then run after-compile handlers.
    pub async fn compile(&mut self, entries: &EntriesFn) -> Result<Compilation> {
        let entries = entries.call().await?;
        Ok(self.finish(entries))
    }

    /// [`Compiler::compile`] without an async runtime.
    pub fn compile_blocking(&mut self, entries: &EntriesFn) -> Result<Compilation> {
        let entries = entries.call_blocking()?;
        Ok(self.finish(entries))
    }

    fn finish(&mut self, entries: EntryMap) -> Compilation {
        let mut compilation = self.new_compilation(entries);
        let completed = self.after_compile(&mut compilation);
        debug!(
            completed,
            entries = compilation.entries.len(),
            context_dependencies = compilation.context_dependencies.len(),
            "compilation finished"
        );
        compilation
    }
}

/// Run handlers one after another, waiting on each handler's `Next` before
/// starting the following one.
///
/// A handler that drops `Next` without calling it is logged and skipped.
fn run_series<'a, I>(handlers: I, compilation: &mut Compilation) -> usize
where
    I: Iterator<Item = (&'a str, &'a mut AfterCompileHandler)>,
{
    let mut completed = 0;
    for (name, handler) in handlers {
        let (tx, rx) = mpsc::channel::<()>();
        let next: Next = Box::new(move || {
            let _ = tx.send(());
        });
        handler(&mut *compilation, next);
        match rx.recv() {
            Ok(()) => completed += 1,
            Err(_) => warn!(handler = name, "after-compile handler dropped its completion callback"),
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    #[test]
    fn tapable_handlers_run_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new(HookStyle::Tapable);
        for name in ["first", "second"] {
            let order = Arc::clone(&order);
            compiler.hooks().unwrap().after_compile.tap_async(
                name,
                Box::new(move |_, next| {
                    order.lock().unwrap().push(name);
                    next();
                }),
            );
        }

        let mut compilation = compiler.new_compilation(EntryMap::new());
        assert_eq!(compiler.after_compile(&mut compilation), 2);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn legacy_host_has_no_hooks_and_sequence_dependencies() {
        let mut compiler = Compiler::new(HookStyle::Legacy);
        assert!(compiler.hooks().is_none());

        compiler.plugin(
            LEGACY_AFTER_COMPILE,
            Box::new(|compilation, next| {
                compilation
                    .context_dependencies
                    .collector()
                    .add_all(vec![PathBuf::from("/d")]);
                next();
            }),
        );
        compiler.plugin("emit", Box::new(|_, _| panic!("wrong event")));

        let mut compilation = compiler.new_compilation(EntryMap::new());
        assert_eq!(compiler.after_compile(&mut compilation), 1);
        assert_eq!(
            compilation.context_dependencies,
            ContextDependencies::Sequence(vec![PathBuf::from("/d")])
        );
    }

    #[test]
    fn dropped_completion_is_not_counted() {
        let mut compiler = Compiler::new(HookStyle::Tapable);
        compiler
            .hooks()
            .unwrap()
            .after_compile
            .tap_async("silent", Box::new(|_, _next| {}));

        let mut compilation = compiler.new_compilation(EntryMap::new());
        assert_eq!(compiler.after_compile(&mut compilation), 0);
    }
}
