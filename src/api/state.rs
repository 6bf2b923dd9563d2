use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    providers::HttpChannelProvider, ChannelService, Collaborators, InMemoryCatalog,
    IntroProvider, SelectionEngine, StaticPolicy, WalkDirEnumerator,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn IntroProvider>,
    pub catalog: Arc<InMemoryCatalog>,
}

impl AppState {
    pub fn new(provider: Arc<dyn IntroProvider>, catalog: Arc<InMemoryCatalog>) -> Self {
        Self { provider, catalog }
    }

    /// Wires the default selection engine over a catalog
    ///
    /// Remote trailers come from the channel API when one is configured and
    /// from the catalog otherwise.
    pub fn with_catalog(config: &Config, catalog: InMemoryCatalog) -> anyhow::Result<Self> {
        let catalog = Arc::new(catalog);

        let channels: Arc<dyn ChannelService> = match &config.channel_api_url {
            Some(url) => {
                tracing::info!(url = %url, "Using remote channel API");
                Arc::new(HttpChannelProvider::new(
                    url.clone(),
                    config.channel_timeout(),
                )?)
            }
            None => catalog.clone(),
        };

        let engine = SelectionEngine::new(Collaborators {
            library: catalog.clone(),
            history: catalog.clone(),
            entitlements: catalog.clone(),
            channels,
            ratings: catalog.clone(),
            policy: Arc::new(StaticPolicy(config.policy())),
            files: Arc::new(WalkDirEnumerator::new().with_follow_links(true)),
        })
        .with_video_extensions(config.intro_video_extensions.clone());

        Ok(Self::new(Arc::new(engine), catalog))
    }

    /// Loads the catalog named in the config and wires the engine
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = InMemoryCatalog::load(&config.catalog_path)?;
        Self::with_catalog(config, catalog)
    }
}
