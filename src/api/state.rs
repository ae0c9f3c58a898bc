use std::sync::Arc;

use crate::config::AppConfig;
use crate::fetch::AtpUpstream;
use crate::registry::RegistryLoader;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistryLoader>,
    pub upstream: Arc<dyn AtpUpstream>,
    pub max_qualifiers: i64,
    pub default_draw_size: i64,
    pub fetch_concurrency: usize,
}

impl AppState {
    pub fn new(config: &AppConfig, upstream: Arc<dyn AtpUpstream>) -> Self {
        Self {
            registry: Arc::new(RegistryLoader::new(config.registry_path())),
            upstream,
            max_qualifiers: config.upstream.max_qualifiers,
            default_draw_size: config.upstream.default_draw_size,
            fetch_concurrency: config.upstream.fetch_concurrency,
        }
    }
}
