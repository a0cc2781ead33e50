use crate::model::Group;

use super::group_box::GroupBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub(super) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    StartPoint,
    Parents,
    Children,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Column {
    pub id: ColumnId,
    pub kind: ColumnKind,
    pub related_group: Option<Group>,
    pub boxes: Vec<GroupBox>,
    pub state: ColumnState,
    pub scroll_top: f32,
    pub x: f32,
    pub width: f32,
    pub group_box_x: f32,
}

impl Column {
    pub(super) fn new(id: ColumnId, kind: ColumnKind, related_group: Option<Group>) -> Self {
        let state = match kind {
            ColumnKind::Parents | ColumnKind::Children => ColumnState::Loading,
            ColumnKind::StartPoint | ColumnKind::Empty => ColumnState::Ready,
        };
        Self {
            id,
            kind,
            related_group,
            boxes: Vec::new(),
            state,
            scroll_top: 0.0,
            x: 0.0,
            width: 0.0,
            group_box_x: 0.0,
        }
    }

    // Boxes are replaced wholesale; ordering is total so repeated renders of
    // the same group set never reshuffle.
    pub(super) fn set_groups(&mut self, mut groups: Vec<Group>) {
        groups.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        self.boxes = groups.into_iter().map(GroupBox::new).collect();
        self.state = ColumnState::Ready;
    }

    pub(super) fn set_scroll_top(&mut self, value: f32) {
        self.scroll_top = value.max(0.0);
    }

    pub fn box_for(&self, group_id: &str) -> Option<&GroupBox> {
        self.boxes.iter().find(|b| b.group.id == group_id)
    }

    pub(super) fn box_for_mut(&mut self, group_id: &str) -> Option<&mut GroupBox> {
        self.boxes.iter_mut().find(|b| b.group.id == group_id)
    }

    // Ready with zero boxes renders as "no relations", distinct from Failed.
    pub fn is_empty_result(&self) -> bool {
        self.state == ColumnState::Ready && self.boxes.is_empty()
    }
}
