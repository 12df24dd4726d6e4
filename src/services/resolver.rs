use std::collections::HashMap;

/// Maps an opaque numeric identifier to a resource path.
///
/// Lookups may hit a database or the network; the signer imposes no retry or
/// timeout. `None` means the identifier is unknown and must not be treated
/// as an error by callers.
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, id: u64) -> Option<String>;
}

impl<F> ResourceResolver for F
where
    F: Fn(u64) -> Option<String> + Send + Sync,
{
    fn resolve(&self, id: u64) -> Option<String> {
        self(id)
    }
}

/// Resolver backed by a fixed id to path table
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    paths: HashMap<u64, String>,
}

impl StaticResolver {
    pub fn new(paths: HashMap<u64, String>) -> Self {
        Self { paths }
    }

    pub fn insert(&mut self, id: u64, path: impl Into<String>) {
        self.paths.insert(id, path.into());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl ResourceResolver for StaticResolver {
    fn resolve(&self, id: u64) -> Option<String> {
        self.paths.get(&id).cloned()
    }
}
