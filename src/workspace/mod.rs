mod actions;
mod column;
mod group_box;
mod line;
mod text;

pub use actions::{ActionKind, RelationAction};
pub use column::{Column, ColumnId, ColumnKind, ColumnState};
pub use group_box::GroupBox;
pub use line::{Line, LineSide, LineState};
pub(crate) use text::truncate_label;

use crate::config::LayoutConfig;
use crate::model::{ColumnRef, Group, Hierarchy, Relation, RelationSide, Step};
use anyhow::Result;

// Hover clears scheduled by popover closes; drained by settle() after the
// current update batch.
#[derive(Debug, Clone)]
struct DeferredTransition {
    column: ColumnId,
    group_id: String,
    side: LineSide,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    config: LayoutConfig,
    columns: Vec<Column>,
    relations: Vec<Relation>,
    search_string: String,
    deferred: Vec<DeferredTransition>,
    next_column_id: u64,
    pub width: f32,
    pub height: f32,
}

impl Workspace {
    pub fn new(config: &LayoutConfig, start_group: Group) -> Self {
        let mut workspace = Self {
            config: config.clone(),
            columns: Vec::new(),
            relations: Vec::new(),
            search_string: String::new(),
            deferred: Vec::new(),
            next_column_id: 0,
            width: 0.0,
            height: 0.0,
        };
        let id = workspace.allocate_column_id();
        let mut column = Column::new(id, ColumnKind::StartPoint, None);
        column.set_groups(vec![start_group]);
        workspace.columns.push(column);
        workspace.refresh();
        workspace
    }

    fn allocate_column_id(&mut self) -> ColumnId {
        let id = ColumnId(self.next_column_id);
        self.next_column_id += 1;
        id
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id == id)
    }

    pub fn find_column(&self, reference: &ColumnRef) -> Option<&Column> {
        match reference {
            ColumnRef::StartPoint => self
                .columns
                .iter()
                .find(|column| column.kind == ColumnKind::StartPoint),
            ColumnRef::Expansion { side, group_id } => {
                let kind = column_kind_for(*side);
                self.columns.iter().find(|column| {
                    column.kind == kind
                        && column
                            .related_group
                            .as_ref()
                            .is_some_and(|group| group.id == *group_id)
                })
            }
        }
    }

    pub fn search_string(&self) -> &str {
        &self.search_string
    }

    pub fn set_search_string(&mut self, text: &str) {
        self.search_string = text.trim().to_string();
        self.refresh();
    }

    pub fn set_relations(&mut self, relations: Vec<Relation>) {
        self.relations = relations;
        self.refresh();
    }

    // Creates a Loading column for the expansion; data arrives later through
    // set_groups/set_load_failed. Expanding an already-expanded relation is a
    // no-op returning the existing column.
    pub fn expand(&mut self, side: RelationSide, related_group: Group) -> ColumnId {
        let kind = column_kind_for(side);
        if let Some(existing) = self.columns.iter().find(|column| {
            column.kind == kind
                && column
                    .related_group
                    .as_ref()
                    .is_some_and(|group| group.id == related_group.id)
        }) {
            return existing.id;
        }

        let id = self.allocate_column_id();
        let column = Column::new(id, kind, Some(related_group));
        match side {
            RelationSide::Parents => self.columns.insert(0, column),
            RelationSide::Children => self.columns.push(column),
        }
        self.refresh();
        id
    }

    pub fn add_column(
        &mut self,
        side: RelationSide,
        related_group: Group,
        groups: Vec<Group>,
    ) -> ColumnId {
        let reference = ColumnRef::Expansion {
            side,
            group_id: related_group.id.clone(),
        };
        if let Some(existing) = self.find_column(&reference) {
            return existing.id;
        }
        let id = self.expand(side, related_group);
        self.set_groups(id, groups);
        id
    }

    // A fetch that resolves after its column was collapsed must be ignored.
    pub fn set_groups(&mut self, column: ColumnId, groups: Vec<Group>) {
        let Some(column) = self.column_mut(column) else {
            return;
        };
        if column.kind == ColumnKind::Empty {
            return;
        }
        column.set_groups(groups);
        self.refresh();
    }

    // Failure keeps whatever boxes were already shown; only the presentation
    // state changes.
    pub fn set_load_failed(&mut self, column: ColumnId, reason: &str) {
        if let Some(column) = self.column_mut(column) {
            column.state = ColumnState::Failed(reason.to_string());
        }
    }

    pub fn remove_column(&mut self, column: ColumnId) {
        let Some(index) = self.columns.iter().position(|c| c.id == column) else {
            return;
        };
        if self.columns[index].kind == ColumnKind::StartPoint {
            return;
        }

        let interior = index > 0 && index + 1 < self.columns.len();
        if interior {
            // keep the slot so outer columns do not shift
            let id = self.allocate_column_id();
            self.columns[index] = Column::new(id, ColumnKind::Empty, None);
        } else {
            self.columns.remove(index);
            while self
                .columns
                .first()
                .is_some_and(|c| c.kind == ColumnKind::Empty)
            {
                self.columns.remove(0);
            }
            while self
                .columns
                .last()
                .is_some_and(|c| c.kind == ColumnKind::Empty)
            {
                self.columns.pop();
            }
        }
        self.refresh();
    }

    pub fn set_scroll_top(&mut self, column: ColumnId, value: f32) {
        let Some(column) = self.column_mut(column) else {
            return;
        };
        column.set_scroll_top(value);
        self.refresh();
    }

    pub fn line(&self, column: ColumnId, group_id: &str, side: LineSide) -> Option<&Line> {
        self.column(column)?
            .box_for(group_id)
            .map(|group_box| group_box.line(side))
    }

    fn line_mut(&mut self, column: ColumnId, group_id: &str, side: LineSide) -> Option<&mut Line> {
        self.column_mut(column)?
            .box_for_mut(group_id)
            .map(|group_box| group_box.line_mut(side))
    }

    pub fn change_hover(&mut self, column: ColumnId, group_id: &str, side: LineSide, hovered: bool) {
        if let Some(line) = self.line_mut(column, group_id, side) {
            line.change_hover(hovered);
        }
    }

    pub fn toggle_actions(&mut self, column: ColumnId, group_id: &str, side: LineSide, opened: bool) {
        let Some(line) = self.line_mut(column, group_id, side) else {
            return;
        };
        if line.toggle_actions(opened) {
            self.deferred.push(DeferredTransition {
                column,
                group_id: group_id.to_string(),
                side,
            });
        }
    }

    // Runs the transitions scheduled for "after the current update batch";
    // the host calls this once per UI update cycle.
    pub fn settle(&mut self) {
        let pending = std::mem::take(&mut self.deferred);
        for transition in pending {
            if let Some(line) = self.line_mut(transition.column, &transition.group_id, transition.side)
            {
                line.apply_deferred_hover_clear();
            }
        }
    }

    // Recomputes every derived value from scratch. Runs after each mutation,
    // so observers never see a partially updated column.
    fn refresh(&mut self) {
        let box_width = self.config.group_box_width;
        let box_height = self.config.group_box_height;
        let gap = self.config.group_box_gap;
        let vertical_padding = self.config.vertical_padding;
        let horizontal_padding = self.config.column_horizontal_padding;
        let column_width = box_width + 2.0 * horizontal_padding;
        let filter = self.search_string.to_lowercase();

        for (index, column) in self.columns.iter_mut().enumerate() {
            column.x = index as f32 * column_width;
            column.width = column_width;
            column.group_box_x = horizontal_padding;

            let last = column.boxes.len().saturating_sub(1);
            for (box_index, group_box) in column.boxes.iter_mut().enumerate() {
                group_box.index_in_column = box_index;
                group_box.x = horizontal_padding;
                // boxes are uniform height; y depends only on the index,
                // never on measured content
                group_box.y = vertical_padding + box_index as f32 * (box_height + gap);
                group_box.margin_bottom = if box_index == last {
                    vertical_padding
                } else {
                    0.0
                };
                group_box.filtered_out = !filter.is_empty()
                    && !group_box.group.name.to_lowercase().contains(&filter);
            }
        }

        self.width = self.columns.len() as f32 * column_width;
        let tallest = self
            .columns
            .iter()
            .map(|column| column.boxes.len())
            .max()
            .unwrap_or(0);
        self.height = if tallest == 0 {
            2.0 * vertical_padding
        } else {
            2.0 * vertical_padding + tallest as f32 * box_height + (tallest - 1) as f32 * gap
        };

        let relations = self.relations.clone();
        for index in 0..self.columns.len() {
            let left_neighbors: Vec<String> = if index > 0 {
                self.columns[index - 1]
                    .boxes
                    .iter()
                    .map(|b| b.group.id.clone())
                    .collect()
            } else {
                Vec::new()
            };
            let right_neighbors: Vec<String> = if index + 1 < self.columns.len() {
                self.columns[index + 1]
                    .boxes
                    .iter()
                    .map(|b| b.group.id.clone())
                    .collect()
            } else {
                Vec::new()
            };

            let column = &mut self.columns[index];
            let column_x = column.x;
            let scroll_top = column.scroll_top;
            for group_box in &mut column.boxes {
                let line_y = group_box.y + box_height / 2.0 - scroll_top;

                // boxes one column toward the start are parents of this box
                let left_relation = left_neighbors
                    .iter()
                    .find_map(|parent_id| {
                        relations.iter().find(|r| {
                            r.child_id == group_box.group.id && r.parent_id == *parent_id
                        })
                    })
                    .cloned();
                let visible = left_relation.is_some();
                group_box.left_line.update_relation(left_relation, visible);
                if visible {
                    group_box.left_line.x = column_x - horizontal_padding;
                    group_box.left_line.y = line_y;
                    group_box.left_line.length = 2.0 * horizontal_padding;
                } else {
                    group_box.left_line.x = 0.0;
                    group_box.left_line.y = 0.0;
                    group_box.left_line.length = 0.0;
                }

                let right_relation = right_neighbors
                    .iter()
                    .find_map(|child_id| {
                        relations.iter().find(|r| {
                            r.parent_id == group_box.group.id && r.child_id == *child_id
                        })
                    })
                    .cloned();
                let visible = right_relation.is_some();
                group_box
                    .right_line
                    .update_relation(right_relation, visible);
                if visible {
                    group_box.right_line.x = column_x + horizontal_padding + box_width;
                    group_box.right_line.y = line_y;
                    group_box.right_line.length = 2.0 * horizontal_padding;
                } else {
                    group_box.right_line.x = 0.0;
                    group_box.right_line.y = 0.0;
                    group_box.right_line.length = 0.0;
                }
            }
        }
    }
}

fn column_kind_for(side: RelationSide) -> ColumnKind {
    match side {
        RelationSide::Parents => ColumnKind::Parents,
        RelationSide::Children => ColumnKind::Children,
    }
}

// Replays a parsed hierarchy script into a workspace. Structural mistakes
// (no entities, undeclared start) are hard errors; dangling relation targets
// surface as a Failed column instead.
pub fn compute_workspace(hierarchy: &Hierarchy, config: &LayoutConfig) -> Result<Workspace> {
    let start_id = hierarchy
        .start
        .clone()
        .or_else(|| hierarchy.groups.keys().next().cloned())
        .ok_or_else(|| anyhow::anyhow!("hierarchy declares no entities"))?;
    let start_group = hierarchy
        .groups
        .get(&start_id)
        .ok_or_else(|| anyhow::anyhow!("start entity '{start_id}' is not declared"))?
        .clone();

    let mut workspace = Workspace::new(config, start_group);
    workspace.set_relations(hierarchy.relations.clone());

    for step in &hierarchy.steps {
        match step {
            Step::Expand { side, group_id } => {
                let Some(related) = hierarchy.groups.get(group_id) else {
                    anyhow::bail!("cannot expand '{group_id}': entity is not declared");
                };
                let column = workspace.expand(*side, related.clone());
                apply_expansion_data(&mut workspace, hierarchy, column, *side, group_id);
            }
            Step::Collapse { side, group_id } => {
                let reference = ColumnRef::Expansion {
                    side: *side,
                    group_id: group_id.clone(),
                };
                if let Some(column) = workspace.find_column(&reference) {
                    let id = column.id;
                    workspace.remove_column(id);
                }
            }
            Step::Scroll { target, value } => {
                if let Some(column) = workspace.find_column(target) {
                    let id = column.id;
                    workspace.set_scroll_top(id, *value);
                }
            }
            Step::Filter { text } => workspace.set_search_string(text),
        }
    }

    Ok(workspace)
}

fn apply_expansion_data(
    workspace: &mut Workspace,
    hierarchy: &Hierarchy,
    column: ColumnId,
    side: RelationSide,
    group_id: &str,
) {
    let relations = match side {
        RelationSide::Parents => hierarchy.parents_of(group_id),
        RelationSide::Children => hierarchy.children_of(group_id),
    };

    let mut groups = Vec::new();
    let mut missing: Option<&str> = None;
    for relation in relations {
        let other_id = match side {
            RelationSide::Parents => relation.parent_id.as_str(),
            RelationSide::Children => relation.child_id.as_str(),
        };
        match hierarchy.groups.get(other_id) {
            Some(group) => groups.push(group.clone()),
            None => missing = missing.or(Some(other_id)),
        }
    }

    workspace.set_groups(column, groups);
    if let Some(missing) = missing {
        workspace.set_load_failed(column, &format!("unknown entity '{missing}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntityKind::Group,
        }
    }

    fn space(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntityKind::Space,
        }
    }

    fn relation(child: &str, parent: &str) -> Relation {
        Relation {
            child_id: child.to_string(),
            parent_id: parent.to_string(),
            parent_kind: EntityKind::Group,
            can_view_privileges: true,
        }
    }

    fn space_relation(child: &str, parent: &str) -> Relation {
        Relation {
            parent_kind: EntityKind::Space,
            ..relation(child, parent)
        }
    }

    fn children_workspace() -> (Workspace, ColumnId) {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        workspace.set_relations(vec![relation("g2", "g1"), relation("g3", "g1")]);
        let column = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![group("g2", "B"), group("g3", "A")],
        );
        (workspace, column)
    }

    #[test]
    fn boxes_are_sorted_and_positioned_by_index() {
        let (workspace, column) = children_workspace();
        let config = workspace.config().clone();
        let column = workspace.column(column).unwrap();

        let names: Vec<&str> = column.boxes.iter().map(|b| b.group.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let step = config.group_box_height + config.group_box_gap;
        let a = &column.boxes[0];
        let b = &column.boxes[1];
        assert_eq!(a.y, config.vertical_padding);
        assert_eq!(b.y, config.vertical_padding + step);
        assert_eq!(a.margin_bottom, 0.0);
        assert_eq!(b.margin_bottom, config.vertical_padding);
    }

    #[test]
    fn box_y_follows_index_for_any_count() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g0", "Root"));
        let groups: Vec<Group> = (0..7).map(|i| group(&format!("c{i}"), &format!("Child {i}"))).collect();
        let column = workspace.add_column(RelationSide::Children, group("g0", "Root"), groups);
        let column = workspace.column(column).unwrap();
        let step = config.group_box_height + config.group_box_gap;
        for group_box in &column.boxes {
            assert_eq!(
                group_box.y,
                config.vertical_padding + group_box.index_in_column as f32 * step
            );
            let expected_margin = if group_box.index_in_column == column.boxes.len() - 1 {
                config.vertical_padding
            } else {
                0.0
            };
            assert_eq!(group_box.margin_bottom, expected_margin);
        }
    }

    #[test]
    fn ordering_is_deterministic_regardless_of_input_order() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        let column = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![
                group("z9", "dup"),
                group("a1", "dup"),
                group("m5", "Other"),
            ],
        );
        let first: Vec<String> = workspace
            .column(column)
            .unwrap()
            .boxes
            .iter()
            .map(|b| b.group.id.clone())
            .collect();

        workspace.set_groups(
            column,
            vec![
                group("m5", "Other"),
                group("a1", "dup"),
                group("z9", "dup"),
            ],
        );
        let second: Vec<String> = workspace
            .column(column)
            .unwrap()
            .boxes
            .iter()
            .map(|b| b.group.id.clone())
            .collect();

        assert_eq!(first, second);
        // equal names fall back to id order
        assert_eq!(first, vec!["a1", "z9", "m5"]);
    }

    #[test]
    fn search_filter_is_case_insensitive_substring() {
        let (mut workspace, column) = children_workspace();
        workspace.set_search_string("b");
        let col = workspace.column(column).unwrap();
        assert!(col.box_for("g3").unwrap().filtered_out); // "A"
        assert!(!col.box_for("g2").unwrap().filtered_out); // "B"

        workspace.set_search_string("");
        let col = workspace.column(column).unwrap();
        assert!(col.boxes.iter().all(|b| !b.filtered_out));
    }

    #[test]
    fn search_string_is_trimmed() {
        let (mut workspace, column) = children_workspace();
        workspace.set_search_string("  a  ");
        assert_eq!(workspace.search_string(), "a");
        let col = workspace.column(column).unwrap();
        assert!(!col.box_for("g3").unwrap().filtered_out);
        assert!(col.box_for("g2").unwrap().filtered_out);
    }

    #[test]
    fn unnamed_boxes_never_match_a_live_filter() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        let column = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![group("g2", "")],
        );
        workspace.set_search_string("x");
        assert!(workspace.column(column).unwrap().boxes[0].filtered_out);
        workspace.set_search_string("");
        assert!(!workspace.column(column).unwrap().boxes[0].filtered_out);
    }

    #[test]
    fn expansion_is_loading_until_data_arrives() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        let column = workspace.expand(RelationSide::Children, group("g1", "G"));
        assert_eq!(workspace.column(column).unwrap().state, ColumnState::Loading);
        assert!(!workspace.column(column).unwrap().is_empty_result());

        workspace.set_groups(column, vec![group("g2", "B")]);
        assert_eq!(workspace.column(column).unwrap().state, ColumnState::Ready);
    }

    #[test]
    fn failed_column_recovers_when_data_arrives() {
        let (mut workspace, column) = children_workspace();
        workspace.set_load_failed(column, "network timeout");
        let col = workspace.column(column).unwrap();
        assert_eq!(col.state, ColumnState::Failed("network timeout".to_string()));
        // boxes shown before the failure stay visible
        assert_eq!(col.boxes.len(), 2);

        workspace.set_groups(column, vec![group("g2", "B"), group("g3", "A")]);
        assert_eq!(workspace.column(column).unwrap().state, ColumnState::Ready);
    }

    #[test]
    fn duplicate_add_column_returns_existing_without_overwriting() {
        let (mut workspace, column) = children_workspace();
        let duplicate = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![group("g9", "Z")],
        );
        assert_eq!(duplicate, column);
        let col = workspace.column(column).unwrap();
        assert_eq!(col.boxes.len(), 2);
        assert!(col.box_for("g9").is_none());
    }

    #[test]
    fn late_set_groups_on_removed_column_is_a_noop() {
        let (mut workspace, column) = children_workspace();
        workspace.remove_column(column);
        assert_eq!(workspace.columns().len(), 1);
        workspace.set_groups(column, vec![group("g9", "Z")]);
        assert_eq!(workspace.columns().len(), 1);
        assert!(workspace.column(column).is_none());
    }

    #[test]
    fn interior_removal_leaves_an_empty_placeholder() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        workspace.set_relations(vec![relation("g2", "g1"), relation("g4", "g2")]);
        let c1 = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![group("g2", "B")],
        );
        let c2 = workspace.add_column(
            RelationSide::Children,
            group("g2", "B"),
            vec![group("g4", "D")],
        );

        let c2_x = workspace.column(c2).unwrap().x;
        workspace.remove_column(c1);
        assert_eq!(workspace.columns().len(), 3);
        assert_eq!(workspace.columns()[1].kind, ColumnKind::Empty);
        assert_eq!(workspace.column(c2).unwrap().x, c2_x);
        // boxes across the placeholder have no adjacent partner
        assert!(!workspace.column(c2).unwrap().boxes[0].left_line.visible);

        workspace.remove_column(c2);
        assert_eq!(workspace.columns().len(), 1);
        assert_eq!(workspace.columns()[0].kind, ColumnKind::StartPoint);
    }

    #[test]
    fn start_column_cannot_be_removed() {
        let (mut workspace, _) = children_workspace();
        let start = workspace.find_column(&ColumnRef::StartPoint).unwrap().id;
        workspace.remove_column(start);
        assert!(workspace.column(start).is_some());
    }

    #[test]
    fn parents_columns_stack_leftward() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        workspace.set_relations(vec![relation("g1", "p1"), relation("p1", "p2")]);
        workspace.add_column(
            RelationSide::Parents,
            group("g1", "G"),
            vec![group("p1", "Parent")],
        );
        workspace.add_column(
            RelationSide::Parents,
            group("p1", "Parent"),
            vec![group("p2", "Grandparent")],
        );

        let kinds: Vec<ColumnKind> = workspace.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Parents, ColumnKind::Parents, ColumnKind::StartPoint]
        );
        let related: Vec<Option<&str>> = workspace
            .columns()
            .iter()
            .map(|c| c.related_group.as_ref().map(|g| g.id.as_str()))
            .collect();
        assert_eq!(related, vec![Some("p1"), Some("g1"), None]);

        let column_width = config.group_box_width + 2.0 * config.column_horizontal_padding;
        for (index, column) in workspace.columns().iter().enumerate() {
            assert_eq!(column.x, index as f32 * column_width);
            assert_eq!(column.width, column_width);
        }
        assert_eq!(workspace.width, 3.0 * column_width);
    }

    #[test]
    fn line_geometry_spans_the_inter_column_gap() {
        let (mut workspace, column) = children_workspace();
        let config = workspace.config().clone();
        let pad = config.column_horizontal_padding;

        let col = workspace.column(column).unwrap();
        let col_x = col.x;
        let a = col.box_for("g3").unwrap();
        assert!(a.left_line.visible);
        assert_eq!(a.left_line.x, col_x - pad);
        assert_eq!(a.left_line.length, 2.0 * pad);
        assert_eq!(a.left_line.y, a.y + config.group_box_height / 2.0);
        // nothing to the right of the children column
        assert!(!a.right_line.visible);

        // the start box carries the matching right line
        let start = workspace.find_column(&ColumnRef::StartPoint).unwrap();
        let start_box = start.box_for("g1").unwrap();
        assert!(start_box.right_line.visible);
        assert_eq!(
            start_box.right_line.x,
            start.x + pad + config.group_box_width
        );
        assert!(!start_box.left_line.visible);

        workspace.set_scroll_top(column, 40.0);
        let a = workspace.column(column).unwrap().box_for("g3").unwrap();
        assert_eq!(a.left_line.y, a.y + config.group_box_height / 2.0 - 40.0);
    }

    #[test]
    fn line_without_matching_relation_is_hidden() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        // g3 is shown in the column but has no recorded relation to g1
        workspace.set_relations(vec![relation("g2", "g1")]);
        let column = workspace.add_column(
            RelationSide::Children,
            group("g1", "G"),
            vec![group("g2", "B"), group("g3", "A")],
        );
        let col = workspace.column(column).unwrap();
        assert!(col.box_for("g2").unwrap().left_line.visible);
        let orphan = col.box_for("g3").unwrap();
        assert!(!orphan.left_line.visible);
        assert_eq!(orphan.left_line.state(), LineState::Hidden);
    }

    #[test]
    fn hover_guard_holds_for_space_relations() {
        let config = LayoutConfig::default();
        let mut workspace = Workspace::new(&config, group("g1", "G"));
        workspace.set_relations(vec![space_relation("g1", "s1")]);
        let column = workspace.add_column(
            RelationSide::Parents,
            group("g1", "G"),
            vec![space("s1", "Archive")],
        );
        let start = workspace.find_column(&ColumnRef::StartPoint).unwrap().id;

        for hovered in [true, false, true, true, false] {
            workspace.change_hover(start, "g1", LineSide::Left, hovered);
            let line = workspace.line(start, "g1", LineSide::Left).unwrap();
            assert!(!line.hovered);
        }
        let line = workspace.line(start, "g1", LineSide::Left).unwrap();
        assert!(!line.actions_enabled);
        assert!(line.actions.is_empty());
        assert!(workspace.column(column).is_some());
    }

    #[test]
    fn popover_close_defers_hover_clear_until_settle() {
        let (mut workspace, column) = children_workspace();
        workspace.change_hover(column, "g3", LineSide::Left, true);
        workspace.toggle_actions(column, "g3", LineSide::Left, true);
        workspace.change_hover(column, "g3", LineSide::Left, false);
        workspace.toggle_actions(column, "g3", LineSide::Left, false);

        // not cleared synchronously with the close
        assert!(workspace.line(column, "g3", LineSide::Left).unwrap().hovered);
        workspace.settle();
        assert!(!workspace.line(column, "g3", LineSide::Left).unwrap().hovered);
    }

    #[test]
    fn popover_close_with_mouse_over_keeps_hover_across_settle() {
        let (mut workspace, column) = children_workspace();
        workspace.change_hover(column, "g3", LineSide::Left, true);
        workspace.toggle_actions(column, "g3", LineSide::Left, true);
        workspace.toggle_actions(column, "g3", LineSide::Left, false);
        workspace.settle();
        assert!(workspace.line(column, "g3", LineSide::Left).unwrap().hovered);
    }

    #[test]
    fn compute_workspace_replays_script_steps() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.ensure_group("g1", Some("Team".to_string()), None);
        hierarchy.ensure_group("g2", Some("Beta".to_string()), None);
        hierarchy.ensure_group("g3", Some("Alpha".to_string()), None);
        hierarchy.add_relation("g2", "g1", true);
        hierarchy.add_relation("g3", "g1", false);
        hierarchy.start = Some("g1".to_string());
        hierarchy.steps.push(Step::Expand {
            side: RelationSide::Children,
            group_id: "g1".to_string(),
        });
        hierarchy.steps.push(Step::Filter {
            text: "alp".to_string(),
        });

        let workspace = compute_workspace(&hierarchy, &LayoutConfig::default()).unwrap();
        assert_eq!(workspace.columns().len(), 2);
        let children = &workspace.columns()[1];
        assert_eq!(children.kind, ColumnKind::Children);
        assert_eq!(children.state, ColumnState::Ready);
        let names: Vec<&str> = children.boxes.iter().map(|b| b.group.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert!(!children.box_for("g3").unwrap().filtered_out);
        assert!(children.box_for("g2").unwrap().filtered_out);
    }

    #[test]
    fn dangling_relation_target_marks_column_failed() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.ensure_group("g1", Some("Team".to_string()), None);
        hierarchy.ensure_group("g2", Some("Known".to_string()), None);
        hierarchy.add_relation("g2", "g1", true);
        hierarchy.add_relation("ghost", "g1", true);
        hierarchy.start = Some("g1".to_string());
        hierarchy.steps.push(Step::Expand {
            side: RelationSide::Children,
            group_id: "g1".to_string(),
        });

        let workspace = compute_workspace(&hierarchy, &LayoutConfig::default()).unwrap();
        let children = &workspace.columns()[1];
        assert_eq!(
            children.state,
            ColumnState::Failed("unknown entity 'ghost'".to_string())
        );
        // resolvable boxes are retained alongside the failure state
        assert_eq!(children.boxes.len(), 1);
        assert!(children.box_for("g2").is_some());
    }

    #[test]
    fn expansion_with_no_relations_is_an_empty_result() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.ensure_group("g1", Some("Team".to_string()), None);
        hierarchy.start = Some("g1".to_string());
        hierarchy.steps.push(Step::Expand {
            side: RelationSide::Parents,
            group_id: "g1".to_string(),
        });

        let workspace = compute_workspace(&hierarchy, &LayoutConfig::default()).unwrap();
        let parents = &workspace.columns()[0];
        assert_eq!(parents.kind, ColumnKind::Parents);
        assert!(parents.is_empty_result());
    }

    #[test]
    fn compute_workspace_rejects_unknown_start() {
        let mut hierarchy = Hierarchy::new();
        hierarchy.ensure_group("g1", None, None);
        hierarchy.start = Some("nope".to_string());
        assert!(compute_workspace(&hierarchy, &LayoutConfig::default()).is_err());
    }

    #[test]
    fn scroll_is_independent_per_column() {
        let (mut workspace, column) = children_workspace();
        let start = workspace.find_column(&ColumnRef::StartPoint).unwrap().id;
        workspace.set_scroll_top(column, 120.0);
        assert_eq!(workspace.column(column).unwrap().scroll_top, 120.0);
        assert_eq!(workspace.column(start).unwrap().scroll_top, 0.0);
        // scroll offsets never go negative
        workspace.set_scroll_top(column, -10.0);
        assert_eq!(workspace.column(column).unwrap().scroll_top, 0.0);
    }
}
