use crate::graph::{RoleGraph, RoleView};

/// The roles a user holds, queried together
///
/// A permission is allowed when at least one role grants it and no role
/// refuses it. A refusal anywhere in the set wins over any grant.
#[derive(Debug, Clone)]
pub struct RoleSet<'a> {
    graph: &'a RoleGraph,
    members: Vec<usize>,
}

impl<'a> RoleSet<'a> {
    pub(crate) fn new(graph: &'a RoleGraph, members: Vec<usize>) -> Self {
        Self { graph, members }
    }

    pub fn roles(&self) -> impl Iterator<Item = RoleView<'a>> + '_ {
        self.members
            .iter()
            .filter_map(|&index| self.graph.view(index))
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.roles().map(|role| role.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the combined roles allow `permission`
    pub fn can(&self, permission: &str) -> bool {
        let mut granted = false;
        for role in self.roles() {
            if role.denies(permission, false) {
                return false;
            }
            if !granted && role.grants(permission, false) {
                granted = true;
            }
        }
        granted
    }

    /// Whether any role, including inherited rules, grants `permission`
    pub fn grants(&self, permission: &str) -> bool {
        self.roles().any(|role| role.grants(permission, false))
    }

    /// Whether any role, including inherited rules, refuses `permission`
    pub fn denies(&self, permission: &str) -> bool {
        self.roles().any(|role| role.denies(permission, false))
    }

    /// Values of the restriction `name` across all roles of the set
    ///
    /// Each role contributes only its own restriction; nothing is collected
    /// from parents.
    pub fn restrictions(&self, name: &str) -> Vec<&'a str> {
        self.roles()
            .filter_map(|role| role.restriction(name))
            .collect()
    }
}
