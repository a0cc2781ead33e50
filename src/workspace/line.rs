use crate::model::{EntityKind, Relation};

use super::actions::{RelationAction, relation_actions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Hidden,
    Idle,
    Hovered,
    ActionsOpen,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub side: LineSide,
    pub relation: Option<Relation>,
    pub visible: bool,
    pub hovered: bool,
    pub mouse_over: bool,
    pub actions_opened: bool,
    pub actions_enabled: bool,
    pub actions: Vec<RelationAction>,
    pub x: f32,
    pub y: f32,
    pub length: f32,
}

impl Line {
    pub(super) fn new(side: LineSide) -> Self {
        Self {
            side,
            relation: None,
            visible: false,
            hovered: false,
            mouse_over: false,
            actions_opened: false,
            actions_enabled: false,
            actions: Vec::new(),
            x: 0.0,
            y: 0.0,
            length: 0.0,
        }
    }

    // Data-driven fields are recomputed on every workspace refresh;
    // interaction state survives unless the line lost its actions.
    pub(super) fn update_relation(&mut self, relation: Option<Relation>, visible: bool) {
        self.actions_enabled =
            matches!(relation.as_ref(), Some(r) if r.parent_kind != EntityKind::Space);
        self.actions = relation_actions(relation.as_ref(), self.actions_enabled);
        self.relation = relation;
        self.visible = visible;
        if !self.actions_enabled {
            self.hovered = false;
            self.actions_opened = false;
        }
        if !self.visible {
            self.hovered = false;
            self.mouse_over = false;
        }
    }

    pub fn change_hover(&mut self, hovered: bool) {
        self.mouse_over = hovered;
        if !self.actions_enabled || self.actions_opened {
            return;
        }
        self.hovered = hovered;
    }

    // Returns true when clearing the hover flag must wait for the next
    // settle(); clearing it synchronously with the popover close flashes the
    // trigger for one frame.
    pub(super) fn toggle_actions(&mut self, opened: bool) -> bool {
        if opened && !self.actions_enabled {
            return false;
        }
        self.actions_opened = opened;
        if opened || self.mouse_over {
            return false;
        }
        self.hovered
    }

    pub(super) fn apply_deferred_hover_clear(&mut self) {
        if !self.mouse_over && !self.actions_opened {
            self.hovered = false;
        }
    }

    pub fn state(&self) -> LineState {
        if self.relation.is_none() {
            LineState::Hidden
        } else if self.actions_opened {
            LineState::ActionsOpen
        } else if self.hovered {
            LineState::Hovered
        } else {
            LineState::Idle
        }
    }
}
