use crate::model::Group;

use super::line::{Line, LineSide};

#[derive(Debug, Clone)]
pub struct GroupBox {
    pub group: Group,
    pub index_in_column: usize,
    pub x: f32,
    pub y: f32,
    pub margin_bottom: f32,
    pub filtered_out: bool,
    pub left_line: Line,
    pub right_line: Line,
}

impl GroupBox {
    // Both lines are created with the box and live exactly as long as it
    // does; refreshes only rewrite their computed fields.
    pub(super) fn new(group: Group) -> Self {
        Self {
            group,
            index_in_column: 0,
            x: 0.0,
            y: 0.0,
            margin_bottom: 0.0,
            filtered_out: false,
            left_line: Line::new(LineSide::Left),
            right_line: Line::new(LineSide::Right),
        }
    }

    pub fn line(&self, side: LineSide) -> &Line {
        match side {
            LineSide::Left => &self.left_line,
            LineSide::Right => &self.right_line,
        }
    }

    pub(super) fn line_mut(&mut self, side: LineSide) -> &mut Line {
        match side {
            LineSide::Left => &mut self.left_line,
            LineSide::Right => &mut self.right_line,
        }
    }
}
