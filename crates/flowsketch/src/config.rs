//! Configuration types for Flowsketch parsing and layout.
//!
//! All types implement [`serde::Deserialize`] and fall back to their defaults
//! for every missing field, so a partial TOML file is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining parser and layout settings.
//! - [`ParserConfig`] - Controls how strictly diagram sources are checked.
//! - [`LayoutConfig`] - Spacing handed to the layout engine.
//! - [`FallbackConfig`] - Grid geometry used when the layout engine fails.
//!
//! # Example
//!
//! ```
//! # use flowsketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.parser().strict());
//! assert_eq!(config.layout().options().node_spacing(), 80.0);
//! ```

use serde::Deserialize;

use flowsketch_core::geometry::Size;
use flowsketch_parser::ParseOptions;

use crate::layout::{GridOptions, LayoutOptions};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(parser: ParserConfig, layout: LayoutConfig) -> Self {
        Self { parser, layout }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Parser settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Report skipped lines and rejected style properties as warnings.
    #[serde(default)]
    strict: bool,
}

impl ParserConfig {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Returns the [`ParseOptions`] described by this section.
    pub fn options(&self) -> ParseOptions {
        ParseOptions::new().with_strict(self.strict)
    }
}

/// Layout engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_spacing: f32,
    layer_spacing: f32,
    padding: f32,
    thoroughness: u32,
    simplify_bend_points: bool,
    fallback: FallbackConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let options = LayoutOptions::default();
        Self {
            node_spacing: options.node_spacing(),
            layer_spacing: options.layer_spacing(),
            padding: options.padding(),
            thoroughness: options.thoroughness(),
            simplify_bend_points: options.simplify_bend_points(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Returns the [`LayoutOptions`] described by this section.
    pub fn options(&self) -> LayoutOptions {
        LayoutOptions::default()
            .with_node_spacing(self.node_spacing)
            .with_layer_spacing(self.layer_spacing)
            .with_padding(self.padding)
            .with_thoroughness(self.thoroughness)
            .with_simplify_bend_points(self.simplify_bend_points)
    }

    /// Returns the fallback grid settings.
    pub fn fallback(&self) -> &FallbackConfig {
        &self.fallback
    }

    /// Returns the [`GridOptions`] described by the `fallback` section.
    pub fn grid(&self) -> GridOptions {
        self.fallback.options()
    }
}

/// Grid geometry of the fallback layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    columns: usize,
    column_spacing: f32,
    row_spacing: f32,
    margin: f32,
    node_width: f32,
    node_height: f32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let grid = GridOptions::default();
        Self {
            columns: grid.columns(),
            column_spacing: grid.column_spacing(),
            row_spacing: grid.row_spacing(),
            margin: grid.margin(),
            node_width: grid.node_size().width(),
            node_height: grid.node_size().height(),
        }
    }
}

impl FallbackConfig {
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the [`GridOptions`] described by this section.
    pub fn options(&self) -> GridOptions {
        GridOptions::default()
            .with_columns(self.columns)
            .with_column_spacing(self.column_spacing)
            .with_row_spacing(self.row_spacing)
            .with_margin(self.margin)
            .with_node_size(Size::new(self.node_width, self.node_height))
    }
}
