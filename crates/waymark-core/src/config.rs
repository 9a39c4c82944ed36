//! Router configuration

use serde::{Deserialize, Serialize};
use url::Url;

use waymark_binding::PathTransforms;
use waymark_history::MemoryHistory;
use waymark_store::DEFAULT_MAX_REDIRECT_DEPTH;

use crate::error::CoreError;
use crate::router::RouterOptions;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sub-path the app is served under, e.g. `/app`
    pub base_path: Option<String>,
    /// Starting location for in-memory history: a path or an absolute URL
    pub initial_url: Option<String>,
    /// Nested location changes allowed before navigation is refused
    pub max_redirect_depth: usize,
    /// Use in-memory history even when a browser is available
    pub memory_history: bool,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_redirect_depth == 0 {
            return Err(CoreError::Config(
                "max_redirect_depth must be at least 1".to_string(),
            ));
        }

        if let Some(base) = &self.base_path {
            if !base.is_empty() && !base.starts_with('/') {
                return Err(CoreError::Config(format!(
                    "base_path must start with '/': {}",
                    base
                )));
            }
        }

        Ok(())
    }

    /// The path part of `initial_url`, with query string and fragment.
    pub fn initial_path(&self) -> Result<Option<String>> {
        let Some(initial) = self.initial_url.as_deref() else {
            return Ok(None);
        };

        if initial.starts_with('/') {
            return Ok(Some(initial.to_string()));
        }

        let url = Url::parse(initial)?;
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            path.push('#');
            path.push_str(fragment);
        }
        Ok(Some(path))
    }

    pub fn into_options(&self) -> Result<RouterOptions> {
        self.validate()?;

        let mut options = RouterOptions::default().with_max_redirect_depth(self.max_redirect_depth);

        if let Some(base) = &self.base_path {
            options = options.with_transforms(PathTransforms::with_base_path(base));
        }

        let initial = self.initial_path()?;
        if self.memory_history || initial.is_some() {
            let history = MemoryHistory::new(initial.as_deref().unwrap_or("/"));
            options = options.with_memory_history(history);
        }

        Ok(options)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: None,
            initial_url: None,
            max_redirect_depth: DEFAULT_MAX_REDIRECT_DEPTH,
            memory_history: false,
        }
    }
}
