#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod model;
pub mod parser;
pub mod render;
pub mod snapshot;
pub mod text_metrics;
pub mod theme;
pub mod workspace;

#[cfg(feature = "cli")]
pub use cli::run;
use config::merge_init_config;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use parser::{ParseError, ParseOutput, parse_hierarchy};
pub use render::render_svg;
pub use theme::Theme;
pub use workspace::{Workspace, compute_workspace};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }
}

pub fn render_with_options(source: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_hierarchy(source)?;
    let mut config = Config {
        theme: options.theme,
        layout: options.layout,
        render: RenderConfig::default(),
    };
    if let Some(init_config) = parsed.init_config {
        config = merge_init_config(config, init_config);
    }
    let workspace = compute_workspace(&parsed.hierarchy, &config.layout)?;
    Ok(render_svg(&workspace, &config.theme, &config.layout))
}
