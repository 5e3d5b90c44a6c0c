use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::Sample;

use super::backend::ClassifierBackend;

/// Thread-safe registry of classifier backends.
///
/// Backends are wrapped in `Mutex` because `ClassifierBackend::classify`
/// takes `&mut self`.
pub struct BackendRegistry {
    backends: HashMap<String, Arc<Mutex<dyn ClassifierBackend>>>,
    default_name: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            default_name: None,
        }
    }

    /// Register a backend. The first registered backend becomes the default.
    pub fn register<B: ClassifierBackend + 'static>(&mut self, backend: B) {
        let name = backend.name().to_string();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.backends.insert(name, Arc::new(Mutex::new(backend)));
    }

    /// Set default backend by name.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.backends.contains_key(name) {
            return Err(anyhow!("classifier backend '{}' not registered", name));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    /// Get backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<Mutex<dyn ClassifierBackend>>> {
        self.backends.get(name).cloned()
    }

    /// Get default backend.
    pub fn default_backend(&self) -> Option<Arc<Mutex<dyn ClassifierBackend>>> {
        self.default_name.as_ref().and_then(|name| self.get(name))
    }

    /// List registered backends.
    pub fn list(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }

    /// Classify one frame with the default backend.
    pub fn classify(&self, pixels: &[u8], width: u32, height: u32) -> Result<Sample> {
        let backend = self
            .default_backend()
            .ok_or_else(|| anyhow!("no classifier backend registered"))?;
        let mut guard = backend
            .lock()
            .map_err(|_| anyhow!("classifier backend lock poisoned"))?;
        guard.classify(pixels, width, height)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::backends::StubBackend;

    #[test]
    fn first_registered_backend_is_the_default() {
        let mut registry = BackendRegistry::new();
        registry.register(StubBackend::with_alphabet());

        assert_eq!(registry.list(), vec!["stub".to_string()]);
        assert!(registry.default_backend().is_some());
        assert!(registry.get("stub").is_some());
        assert!(registry.set_default("missing").is_err());
    }

    #[test]
    fn classify_uses_the_default_backend() {
        let mut registry = BackendRegistry::new();
        registry.register(StubBackend::with_alphabet());

        let pixels = vec![7u8; 4 * 4 * 3];
        let sample = registry.classify(&pixels, 4, 4).unwrap();
        assert_eq!(sample.predictions().len(), 26);
    }
}
