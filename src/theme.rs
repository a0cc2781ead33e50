use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub box_fill: String,
    pub box_border: String,
    pub box_text_color: String,
    pub start_box_fill: String,
    pub start_box_border: String,
    pub space_box_fill: String,
    pub space_box_border: String,
    pub line_color: String,
    pub hovered_line_color: String,
    pub header_text_color: String,
    pub muted_text_color: String,
    pub error_color: String,
    pub filtered_opacity: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 16.0,
            background: "#FFFFFF".to_string(),
            box_fill: "#ECECFF".to_string(),
            box_border: "#9370DB".to_string(),
            box_text_color: "#333333".to_string(),
            start_box_fill: "#FFFFDE".to_string(),
            start_box_border: "#AAAA33".to_string(),
            space_box_fill: "#FFF4E5".to_string(),
            space_box_border: "#E0A030".to_string(),
            line_color: "#333333".to_string(),
            hovered_line_color: "#9370DB".to_string(),
            header_text_color: "#333333".to_string(),
            muted_text_color: "#888888".to_string(),
            error_color: "#B3261E".to_string(),
            filtered_opacity: 0.25,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            box_fill: "#F8FAFF".to_string(),
            box_border: "#C7D2E5".to_string(),
            box_text_color: "#1C2430".to_string(),
            start_box_fill: "#EEF2F8".to_string(),
            start_box_border: "#7A8AA6".to_string(),
            space_box_fill: "#FFF7ED".to_string(),
            space_box_border: "#E8B97E".to_string(),
            line_color: "#7A8AA6".to_string(),
            hovered_line_color: "#5B8DEF".to_string(),
            header_text_color: "#1C2430".to_string(),
            muted_text_color: "#8A97AB".to_string(),
            error_color: "#C0392B".to_string(),
            filtered_opacity: 0.25,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
