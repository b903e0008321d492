//! Handler registry
//!
//! Maps handler names to constructors. The binary selects a handler by name;
//! handlers only see the three file paths of a run.

use crate::error::{HandlerError, Result};
use crate::processor::{HandlerConfig, UppercaseHandler};
use crate::progress::RunStats;

use ahash::RandomState;
use hashbrown::HashMap;
use std::path::Path;

/// Name of the built-in dictionary upper-casing handler
pub const UPPERCASE_HANDLER: &str = "uppercase-dictionary";

/// A text transformation run over a dictionary, an input and an output base
pub trait TextHandler {
    fn name(&self) -> &'static str;

    fn run(&self, dictionary: &Path, input: &Path, output_base: &Path) -> Result<RunStats>;
}

/// Builds a handler from the shared configuration
pub type HandlerConstructor = fn(&HandlerConfig) -> Box<dyn TextHandler>;

fn uppercase_handler(config: &HandlerConfig) -> Box<dyn TextHandler> {
    Box::new(UppercaseHandler::new(config.clone()))
}

/// Name to constructor mapping
#[derive(Default)]
pub struct HandlerRegistry {
    constructors: HashMap<&'static str, HandlerConstructor, RandomState>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every handler shipped with the crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(UPPERCASE_HANDLER, uppercase_handler);
        registry
    }

    /// Register a constructor, replacing any previous one under `name`
    pub fn register(&mut self, name: &'static str, constructor: HandlerConstructor) {
        if self.constructors.insert(name, constructor).is_some() {
            log::warn!("Handler '{}' registered twice, keeping the latest", name);
        }
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn create(&self, name: &str, config: &HandlerConfig) -> Result<Box<dyn TextHandler>> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            HandlerError::Configuration(format!(
                "Unknown handler '{}'. Available: {}",
                name,
                self.names().join(", ")
            ))
        })?;

        Ok(constructor(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHandler;

    impl TextHandler for NullHandler {
        fn name(&self) -> &'static str {
            "null"
        }

        fn run(&self, _: &Path, _: &Path, _: &Path) -> Result<RunStats> {
            Ok(RunStats::default())
        }
    }

    fn null_handler(_: &HandlerConfig) -> Box<dyn TextHandler> {
        Box::new(NullHandler)
    }

    #[test]
    fn test_builtin_handler() {
        let registry = HandlerRegistry::with_builtins();
        let handler = registry
            .create(UPPERCASE_HANDLER, &HandlerConfig::default())
            .unwrap();

        assert_eq!(handler.name(), UPPERCASE_HANDLER);
    }

    #[test]
    fn test_register_and_list() {
        let mut registry = HandlerRegistry::with_builtins();
        registry.register("null", null_handler);

        assert_eq!(registry.names(), vec!["null", UPPERCASE_HANDLER]);

        let stats = registry
            .create("null", &HandlerConfig::default())
            .unwrap()
            .run(Path::new("d"), Path::new("i"), Path::new("o"))
            .unwrap();
        assert!(stats.output_files.is_empty());
    }

    #[test]
    fn test_reregister_replaces_constructor() {
        let mut registry = HandlerRegistry::with_builtins();
        registry.register(UPPERCASE_HANDLER, null_handler);

        assert_eq!(registry.names(), vec![UPPERCASE_HANDLER]);
        let handler = registry
            .create(UPPERCASE_HANDLER, &HandlerConfig::default())
            .unwrap();
        assert_eq!(handler.name(), "null");
    }

    #[test]
    fn test_unknown_handler() {
        let registry = HandlerRegistry::with_builtins();
        let err = registry
            .create("lowercase", &HandlerConfig::default())
            .err()
            .unwrap();

        assert!(matches!(err, HandlerError::Configuration(ref msg) if msg.contains(UPPERCASE_HANDLER)));
    }
}
