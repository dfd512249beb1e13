use std::path::Path;

use crate::config::{Normalization, SelectionConfig, SelectionMethod};
use crate::error::UnitSelectionError;
use crate::pipeline::defaults::{scaler_for, search_for};
use crate::pipeline::runtime::{UnitSelector, UnitSelectorParts};
use crate::pipeline::traits::{Scaler, UnitSearch};

pub struct UnitSelectorBuilder {
    config: SelectionConfig,
    scaler: Option<Box<dyn Scaler>>,
    search: Option<Box<dyn UnitSearch>>,
}

impl UnitSelectorBuilder {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            scaler: None,
            search: None,
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, UnitSelectionError> {
        Ok(Self::new(SelectionConfig::load(path)?))
    }

    pub fn with_method(mut self, method: SelectionMethod) -> Self {
        self.config.method = method;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.config.normalization = normalization;
        self
    }

    /// Overrides the scaler derived from the configured normalization.
    pub fn with_scaler(mut self, scaler: Box<dyn Scaler>) -> Self {
        self.scaler = Some(scaler);
        self
    }

    /// Overrides the search derived from the configured method.
    pub fn with_search(mut self, search: Box<dyn UnitSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn build(self) -> UnitSelector {
        let config = self.config;
        UnitSelector::from_parts(UnitSelectorParts {
            config,
            scaler: self
                .scaler
                .unwrap_or_else(|| scaler_for(config.normalization)),
            search: self.search.unwrap_or_else(|| search_for(config.method)),
        })
    }
}
