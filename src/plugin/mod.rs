// src/plugin/mod.rs

//! Build-tool integration.
//!
//! [`GlobEntriesPlugin`] hands the resolver's registered directories to the
//! build tool after every compilation, so the tool's watcher notices files
//! being added to or removed from those directories and asks for a fresh
//! entry mapping.

pub mod collector;
pub mod host;

use tracing::debug;

use crate::entries::Resolver;

pub use collector::{AppendOnlySequence, ContextDependencies, DependencyCollector, MutableSet};
pub use host::{
    AfterCompileHandler, AsyncSeriesHook, BuildHost, Compilation, Compiler, CompilerHooks,
    HookStyle, Next, LEGACY_AFTER_COMPILE,
};

/// Tap name used on hosts with tapable hooks.
pub const PLUGIN_NAME: &str = "glob-entries-plugin";

/// After-compile plugin draining a [`Resolver`]'s watched directories into
/// each compilation's context dependencies.
#[derive(Debug, Clone)]
pub struct GlobEntriesPlugin {
    resolver: Resolver,
}

impl GlobEntriesPlugin {
    pub fn new(resolver: &Resolver) -> Self {
        Self {
            resolver: resolver.clone(),
        }
    }

    /// Register on `host`'s after-compile step, using its tapable hooks when
    /// present and the legacy `plugin` API otherwise.
    pub fn install(&self, host: &mut dyn BuildHost) {
        let plugin = self.clone();
        let handler: AfterCompileHandler =
            Box::new(move |compilation, next| plugin.after_compile(compilation, next));

        match host.hooks() {
            Some(hooks) => {
                debug!(tap = PLUGIN_NAME, "installing on after_compile hook");
                hooks.after_compile.tap_async(PLUGIN_NAME, handler);
            }
            None => {
                debug!(event = LEGACY_AFTER_COMPILE, "installing through legacy plugin API");
                host.plugin(LEGACY_AFTER_COMPILE, handler);
            }
        }
    }

    /// Drain the watched directories into `compilation`, then signal `next`.
    ///
    /// `next` is called whether or not there was anything to drain.
    pub fn after_compile(&self, compilation: &mut Compilation, next: Next) {
        {
            let mut collector = compilation.context_dependencies.collector();
            self.resolver.registrar().drain_into(collector.as_mut());
        }
        next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ResolverOptions;
    use crate::fs::mock::MockFileSystem;
    use crate::glob::{FsGlobEngine, GlobOptions};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn resolver(fs: &MockFileSystem) -> Resolver {
        let opts = ResolverOptions::new()
            .with_glob(GlobOptions {
                cwd: Some(PathBuf::from("/project")),
                ..GlobOptions::default()
            })
            .with_engine(Arc::new(FsGlobEngine::new(Arc::new(fs.clone()))));
        Resolver::new(vec!["src/a/*.js", "src/b/*.js"], opts).unwrap()
    }

    #[test]
    fn installs_on_tapable_hook() {
        let fs = MockFileSystem::new();
        let mut compiler = Compiler::new(HookStyle::Tapable);
        GlobEntriesPlugin::new(&resolver(&fs)).install(&mut compiler);

        assert_eq!(compiler.after_compile_taps(), vec![PLUGIN_NAME]);
        assert!(compiler.legacy_events().is_empty());
    }

    #[test]
    fn installs_through_legacy_api() {
        let fs = MockFileSystem::new();
        let mut compiler = Compiler::new(HookStyle::Legacy);
        GlobEntriesPlugin::new(&resolver(&fs)).install(&mut compiler);

        assert_eq!(compiler.legacy_events(), vec![LEGACY_AFTER_COMPILE]);
        assert!(compiler.after_compile_taps().is_empty());
    }

    #[test]
    fn completion_is_signalled_with_nothing_to_drain() {
        let fs = MockFileSystem::new();
        let resolver = resolver(&fs);
        let mut compiler = Compiler::new(HookStyle::Tapable);
        GlobEntriesPlugin::new(&resolver).install(&mut compiler);

        let mut compilation = compiler.new_compilation(Default::default());
        assert_eq!(compiler.after_compile(&mut compilation), 1);
        assert!(compilation.context_dependencies.is_empty());
    }
}
