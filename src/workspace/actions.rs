use crate::model::Relation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ModifyPrivileges,
    RemoveRelation,
}

// Label/icon pairs for the actions popover; execution stays with the host
// application, this crate only reports which actions are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationAction {
    pub kind: ActionKind,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const MODIFY_PRIVILEGES: RelationAction = RelationAction {
    kind: ActionKind::ModifyPrivileges,
    label: "Modify privileges",
    icon: "permissions",
};

pub const REMOVE_RELATION: RelationAction = RelationAction {
    kind: ActionKind::RemoveRelation,
    label: "Remove relation",
    icon: "close",
};

pub(super) fn relation_actions(
    relation: Option<&Relation>,
    actions_enabled: bool,
) -> Vec<RelationAction> {
    let Some(relation) = relation else {
        return Vec::new();
    };
    if !actions_enabled {
        return Vec::new();
    }
    let mut actions = Vec::new();
    if relation.can_view_privileges {
        actions.push(MODIFY_PRIVILEGES);
    }
    actions.push(REMOVE_RELATION);
    actions
}
