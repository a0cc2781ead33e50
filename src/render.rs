use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::model::EntityKind;
use crate::theme::Theme;
use crate::workspace::{Column, ColumnKind, ColumnState, Workspace, truncate_label};
use anyhow::Result;
use std::path::Path;

pub fn render_svg(workspace: &Workspace, theme: &Theme, config: &LayoutConfig) -> String {
    let width = workspace.width.max(200.0);
    let height = (workspace.height + config.header_band_height).max(200.0);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // relation lines sit under the boxes
    for column in workspace.columns() {
        for group_box in &column.boxes {
            for line in [&group_box.left_line, &group_box.right_line] {
                if !line.visible {
                    continue;
                }
                let y = line.y + config.header_band_height;
                let (stroke, stroke_width) = if line.hovered || line.actions_opened {
                    (
                        theme.hovered_line_color.as_str(),
                        config.hovered_line_stroke_width,
                    )
                } else {
                    (theme.line_color.as_str(), config.line_stroke_width)
                };
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    line.x,
                    line.x + line.length,
                ));
            }
        }
    }

    for column in workspace.columns() {
        if column.kind == ColumnKind::Empty {
            continue;
        }
        render_column(&mut svg, column, theme, config);
    }

    svg.push_str("</svg>");
    svg
}

fn render_column(svg: &mut String, column: &Column, theme: &Theme, config: &LayoutConfig) {
    let center_x = column.x + column.width / 2.0;

    let title = match (column.kind, column.related_group.as_ref()) {
        (ColumnKind::StartPoint, _) => "start point".to_string(),
        (ColumnKind::Parents, Some(group)) => format!("parents of {}", group.name),
        (ColumnKind::Children, Some(group)) => format!("children of {}", group.name),
        _ => String::new(),
    };
    let title = truncate_label(
        &title,
        column.width - 2.0 * config.label_padding_x,
        theme.font_size,
        &theme.font_family,
        config.fast_text_metrics,
    );
    svg.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        config.header_band_height / 2.0 + theme.font_size / 2.0,
        theme.font_family,
        theme.font_size,
        theme.header_text_color,
        escape_xml(&title)
    ));

    match &column.state {
        ColumnState::Loading => {
            render_notice(svg, column, "loading\u{2026}", &theme.muted_text_color, theme, config);
        }
        ColumnState::Failed(reason) => {
            let notice = format!("failed: {reason}");
            render_notice(svg, column, &notice, &theme.error_color, theme, config);
        }
        ColumnState::Ready => {
            if column.is_empty_result() {
                render_notice(svg, column, "no relations", &theme.muted_text_color, theme, config);
            }
        }
    }

    for group_box in &column.boxes {
        let x = column.x + group_box.x;
        let y = group_box.y - column.scroll_top + config.header_band_height;
        let (fill, border) = match (column.kind, group_box.group.kind) {
            (ColumnKind::StartPoint, _) => (&theme.start_box_fill, &theme.start_box_border),
            (_, EntityKind::Space) => (&theme.space_box_fill, &theme.space_box_border),
            _ => (&theme.box_fill, &theme.box_border),
        };
        let opacity = if group_box.filtered_out {
            format!(" opacity=\"{}\"", theme.filtered_opacity)
        } else {
            String::new()
        };

        svg.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"{border}\" stroke-width=\"{}\"{opacity}/>",
            config.group_box_width,
            config.group_box_height,
            config.box_corner_radius,
            config.box_corner_radius,
            config.box_stroke_width,
        ));

        let label = truncate_label(
            &group_box.group.name,
            config.group_box_width - 2.0 * config.label_padding_x,
            theme.font_size,
            &theme.font_family,
            config.fast_text_metrics,
        );
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{opacity}>{}</text>",
            x + config.group_box_width / 2.0,
            y + config.group_box_height / 2.0 + theme.font_size / 3.0,
            theme.font_family,
            theme.font_size,
            theme.box_text_color,
            escape_xml(&label)
        ));
    }
}

fn render_notice(
    svg: &mut String,
    column: &Column,
    notice: &str,
    color: &str,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let y = config.header_band_height
        + config.vertical_padding
        + column.boxes.len() as f32 * (config.group_box_height + config.group_box_gap)
        + theme.font_size;
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-style=\"italic\" fill=\"{color}\">{}</text>",
        column.x + column.width / 2.0,
        theme.font_family,
        theme.font_size,
        escape_xml(notice)
    ));
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
