use crate::workspace::{Column, ColumnKind, ColumnState, GroupBox, Line, Workspace};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct WorkspaceSnapshot {
    pub width: f32,
    pub height: f32,
    pub search_string: String,
    pub columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ColumnSnapshot {
    pub kind: String,
    pub related_group: Option<String>,
    pub state: String,
    pub error: Option<String>,
    pub x: f32,
    pub width: f32,
    pub scroll_top: f32,
    pub boxes: Vec<BoxSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct BoxSnapshot {
    pub id: String,
    pub name: String,
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub margin_bottom: f32,
    pub filtered_out: bool,
    pub left_line: LineSnapshot,
    pub right_line: LineSnapshot,
}

#[derive(Debug, Serialize)]
pub struct LineSnapshot {
    pub visible: bool,
    pub hovered: bool,
    pub actions_opened: bool,
    pub actions_enabled: bool,
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub actions: Vec<String>,
}

impl WorkspaceSnapshot {
    pub fn from_workspace(workspace: &Workspace) -> Self {
        Self {
            width: workspace.width,
            height: workspace.height,
            search_string: workspace.search_string().to_string(),
            columns: workspace.columns().iter().map(column_snapshot).collect(),
        }
    }
}

fn column_snapshot(column: &Column) -> ColumnSnapshot {
    let kind = match column.kind {
        ColumnKind::StartPoint => "startPoint",
        ColumnKind::Parents => "parents",
        ColumnKind::Children => "children",
        ColumnKind::Empty => "empty",
    };
    let (state, error) = match &column.state {
        ColumnState::Loading => ("loading", None),
        ColumnState::Ready => ("ready", None),
        ColumnState::Failed(reason) => ("failed", Some(reason.clone())),
    };
    ColumnSnapshot {
        kind: kind.to_string(),
        related_group: column.related_group.as_ref().map(|g| g.id.clone()),
        state: state.to_string(),
        error,
        x: column.x,
        width: column.width,
        scroll_top: column.scroll_top,
        boxes: column.boxes.iter().map(box_snapshot).collect(),
    }
}

fn box_snapshot(group_box: &GroupBox) -> BoxSnapshot {
    BoxSnapshot {
        id: group_box.group.id.clone(),
        name: group_box.group.name.clone(),
        index: group_box.index_in_column,
        x: group_box.x,
        y: group_box.y,
        margin_bottom: group_box.margin_bottom,
        filtered_out: group_box.filtered_out,
        left_line: line_snapshot(&group_box.left_line),
        right_line: line_snapshot(&group_box.right_line),
    }
}

fn line_snapshot(line: &Line) -> LineSnapshot {
    LineSnapshot {
        visible: line.visible,
        hovered: line.hovered,
        actions_opened: line.actions_opened,
        actions_enabled: line.actions_enabled,
        x: line.x,
        y: line.y,
        length: line.length,
        actions: line.actions.iter().map(|a| a.label.to_string()).collect(),
    }
}

pub fn write_snapshot(path: &Path, workspace: &Workspace) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &WorkspaceSnapshot::from_workspace(workspace))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::{EntityKind, Group, Relation, RelationSide};

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntityKind::Group,
        }
    }

    #[test]
    fn snapshot_mirrors_computed_layout() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "Root"));
        workspace.set_relations(vec![Relation {
            child_id: "g2".to_string(),
            parent_id: "g1".to_string(),
            parent_kind: EntityKind::Group,
            can_view_privileges: false,
        }]);
        workspace.add_column(
            RelationSide::Children,
            group("g1", "Root"),
            vec![group("g2", "Leaf")],
        );

        let snapshot = WorkspaceSnapshot::from_workspace(&workspace);
        assert_eq!(snapshot.columns.len(), 2);
        assert_eq!(snapshot.columns[0].kind, "startPoint");
        assert_eq!(snapshot.columns[1].kind, "children");
        assert_eq!(snapshot.columns[1].related_group.as_deref(), Some("g1"));

        let leaf = &snapshot.columns[1].boxes[0];
        assert_eq!(leaf.id, "g2");
        assert_eq!(leaf.y, config.vertical_padding);
        assert!(leaf.left_line.visible);
        assert_eq!(leaf.left_line.actions, vec!["Remove relation".to_string()]);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["columns"][1]["state"], "ready");
        assert_eq!(
            value["columns"][1]["boxes"][0]["margin_bottom"],
            serde_json::json!(config.vertical_padding)
        );
    }
}
