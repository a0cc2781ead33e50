use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub group_box_width: f32,
    pub group_box_height: f32,
    pub group_box_gap: f32,
    pub vertical_padding: f32,
    pub column_horizontal_padding: f32,
    pub header_band_height: f32,
    pub box_corner_radius: f32,
    pub box_stroke_width: f32,
    pub line_stroke_width: f32,
    pub hovered_line_stroke_width: f32,
    pub label_padding_x: f32,
    pub label_line_height: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            group_box_width: 220.0,
            group_box_height: 56.0,
            group_box_gap: 24.0,
            vertical_padding: 30.0,
            column_horizontal_padding: 50.0,
            header_band_height: 44.0,
            box_corner_radius: 8.0,
            box_stroke_width: 1.4,
            line_stroke_width: 1.4,
            hovered_line_stroke_width: 2.6,
            label_padding_x: 14.0,
            label_line_height: 1.2,
            fast_text_metrics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    box_fill: Option<String>,
    box_border: Option<String>,
    box_text_color: Option<String>,
    start_box_fill: Option<String>,
    start_box_border: Option<String>,
    space_box_fill: Option<String>,
    space_box_border: Option<String>,
    line_color: Option<String>,
    hovered_line_color: Option<String>,
    header_text_color: Option<String>,
    muted_text_color: Option<String>,
    error_color: Option<String>,
    filtered_opacity: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LayoutConfigFile {
    group_box_width: Option<f32>,
    group_box_height: Option<f32>,
    group_box_gap: Option<f32>,
    vertical_padding: Option<f32>,
    column_horizontal_padding: Option<f32>,
    header_band_height: Option<f32>,
    box_corner_radius: Option<f32>,
    box_stroke_width: Option<f32>,
    line_stroke_width: Option<f32>,
    hovered_line_stroke_width: Option<f32>,
    label_padding_x: Option<f32>,
    label_line_height: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    Ok(config)
}

// Inline `%%{config: {...}}%%` blocks share the config-file schema and win
// over the file passed on the command line.
pub fn merge_init_config(mut config: Config, init: serde_json::Value) -> Config {
    if let Ok(parsed) = serde_json::from_value::<ConfigFile>(init) {
        apply_config_file(&mut config, parsed);
    }
    config
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.box_fill {
            config.theme.box_fill = v;
        }
        if let Some(v) = vars.box_border {
            config.theme.box_border = v;
        }
        if let Some(v) = vars.box_text_color {
            config.theme.box_text_color = v;
        }
        if let Some(v) = vars.start_box_fill {
            config.theme.start_box_fill = v;
        }
        if let Some(v) = vars.start_box_border {
            config.theme.start_box_border = v;
        }
        if let Some(v) = vars.space_box_fill {
            config.theme.space_box_fill = v;
        }
        if let Some(v) = vars.space_box_border {
            config.theme.space_box_border = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.hovered_line_color {
            config.theme.hovered_line_color = v;
        }
        if let Some(v) = vars.header_text_color {
            config.theme.header_text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.error_color {
            config.theme.error_color = v;
        }
        if let Some(v) = vars.filtered_opacity {
            config.theme.filtered_opacity = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.group_box_width {
            config.layout.group_box_width = v;
        }
        if let Some(v) = layout.group_box_height {
            config.layout.group_box_height = v;
        }
        if let Some(v) = layout.group_box_gap {
            config.layout.group_box_gap = v;
        }
        if let Some(v) = layout.vertical_padding {
            config.layout.vertical_padding = v;
        }
        if let Some(v) = layout.column_horizontal_padding {
            config.layout.column_horizontal_padding = v;
        }
        if let Some(v) = layout.header_band_height {
            config.layout.header_band_height = v;
        }
        if let Some(v) = layout.box_corner_radius {
            config.layout.box_corner_radius = v;
        }
        if let Some(v) = layout.box_stroke_width {
            config.layout.box_stroke_width = v;
        }
        if let Some(v) = layout.line_stroke_width {
            config.layout.line_stroke_width = v;
        }
        if let Some(v) = layout.hovered_line_stroke_width {
            config.layout.hovered_line_stroke_width = v;
        }
        if let Some(v) = layout.label_padding_x {
            config.layout.label_padding_x = v;
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }
}
