use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Group,
    Space,
}

impl EntityKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "group" => Some(Self::Group),
            "space" => Some(Self::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub child_id: String,
    pub parent_id: String,
    pub parent_kind: EntityKind,
    pub can_view_privileges: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationSide {
    Parents,
    Children,
}

impl RelationSide {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "parents" => Some(Self::Parents),
            "children" => Some(Self::Children),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    StartPoint,
    Expansion {
        side: RelationSide,
        group_id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Expand {
        side: RelationSide,
        group_id: String,
    },
    Collapse {
        side: RelationSide,
        group_id: String,
    },
    Scroll {
        target: ColumnRef,
        value: f32,
    },
    Filter {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub groups: BTreeMap<String, Group>,
    pub relations: Vec<Relation>,
    pub start: Option<String>,
    pub steps: Vec<Step>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_group(&mut self, id: &str, name: Option<String>, kind: Option<EntityKind>) {
        let entry = self.groups.entry(id.to_string()).or_insert(Group {
            id: id.to_string(),
            name: id.to_string(),
            kind: EntityKind::Group,
        });
        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(kind) = kind {
            entry.kind = kind;
        }
    }

    pub fn add_relation(&mut self, child_id: &str, parent_id: &str, can_view_privileges: bool) {
        let parent_kind = self
            .groups
            .get(parent_id)
            .map(|group| group.kind)
            .unwrap_or(EntityKind::Group);
        let relation = Relation {
            child_id: child_id.to_string(),
            parent_id: parent_id.to_string(),
            parent_kind,
            can_view_privileges,
        };
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
    }

    // Entities may be declared after the relations that mention them; the
    // parent kind stored on each relation is re-derived once parsing is done.
    pub fn resolve_parent_kinds(&mut self) {
        let groups = &self.groups;
        for relation in &mut self.relations {
            if let Some(parent) = groups.get(&relation.parent_id) {
                relation.parent_kind = parent.kind;
            }
        }
    }

    pub fn parents_of(&self, id: &str) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|relation| relation.child_id == id)
            .collect()
    }

    pub fn children_of(&self, id: &str) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|relation| relation.parent_id == id)
            .collect()
    }
}
