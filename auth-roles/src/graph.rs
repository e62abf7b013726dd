use crate::{
    error::{AuthzError, Result},
    role::Role,
    role_set::RoleSet,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// Users and groups a role is assigned to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Assignment {
    pub(crate) users: Vec<String>,
    pub(crate) groups: Vec<String>,
}

impl Assignment {
    fn matches(&self, username: &str, groups: &[String]) -> bool {
        let username = username.to_lowercase();
        if self
            .users
            .iter()
            .any(|user| user == "*" || user.to_lowercase() == username)
        {
            return true;
        }

        self.groups.iter().any(|assigned| {
            groups
                .iter()
                .any(|group| group.to_lowercase() == assigned.to_lowercase())
        })
    }
}

/// Immutable, validated set of roles for one authorization context
///
/// Parent references are resolved to indices once at construction. Every
/// role's ancestor chain is collected up front so grant and deny checks are a
/// plain loop, and an inheritance cycle is reported as a configuration error
/// instead of recursing forever.
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    roles: Vec<Role>,
    assignments: Vec<Assignment>,
    index: HashMap<String, usize>,
    /// `chains[i]` holds `i` followed by its parent, grandparent, ...
    chains: Vec<Vec<usize>>,
}

impl RoleGraph {
    /// Build a graph from roles whose parents reference each other by name
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Result<Self> {
        let roles: Vec<Role> = roles.into_iter().collect();
        let assignments = vec![Assignment::default(); roles.len()];
        Self::build(roles, assignments)
    }

    pub(crate) fn build(mut roles: Vec<Role>, assignments: Vec<Assignment>) -> Result<Self> {
        let mut index = HashMap::with_capacity(roles.len());
        for (position, role) in roles.iter().enumerate() {
            if index.insert(role.name().to_string(), position).is_some() {
                return Err(AuthzError::DuplicateRole(role.name().to_string()));
            }
        }

        let mut parents: Vec<Option<usize>> = Vec::with_capacity(roles.len());
        for role in &roles {
            let parent = match role.parent() {
                Some(parent) => Some(*index.get(parent).ok_or_else(|| {
                    AuthzError::UnknownParent {
                        role: role.name().to_string(),
                        parent: parent.to_string(),
                    }
                })?),
                None => None,
            };
            parents.push(parent);
        }

        let mut chains = Vec::with_capacity(roles.len());
        for start in 0..roles.len() {
            chains.push(Self::collect_chain(start, &parents, &roles)?);
        }

        let mut back_references: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (child, parent) in parents.iter().enumerate() {
            if let (Some(parent), Some(role)) = (parent, roles.get(child)) {
                back_references
                    .entry(*parent)
                    .or_default()
                    .push(role.name().to_string());
            }
        }
        for (parent, children) in back_references {
            if let Some(role) = roles.get_mut(parent) {
                for child in children {
                    if !role.children().contains(&child) {
                        role.add_child(child);
                    }
                }
            }
        }

        debug!(roles = roles.len(), "Role graph built");

        Ok(Self {
            roles,
            assignments,
            index,
            chains,
        })
    }

    fn collect_chain(start: usize, parents: &[Option<usize>], roles: &[Role]) -> Result<Vec<usize>> {
        let mut chain = vec![start];
        let mut seen = HashSet::from([start]);
        let mut current = start;

        while let Some(Some(parent)) = parents.get(current) {
            if !seen.insert(*parent) {
                let name = roles
                    .get(start)
                    .map(|role| role.name().to_string())
                    .unwrap_or_default();
                return Err(AuthzError::CircularInheritance(name));
            }
            chain.push(*parent);
            current = *parent;
        }

        Ok(chain)
    }

    /// Look up a role by name
    pub fn role(&self, name: &str) -> Option<RoleView<'_>> {
        self.index.get(name).and_then(|&index| self.view(index))
    }

    /// All roles in definition order
    pub fn roles(&self) -> impl Iterator<Item = RoleView<'_>> {
        (0..self.roles.len()).filter_map(move |index| self.view(index))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Combine the named roles into a [`RoleSet`]
    ///
    /// Unknown names are skipped: a user never gains access through a role
    /// that does not exist.
    pub fn role_set<'a, I>(&'a self, names: I) -> RoleSet<'a>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut members = Vec::new();
        for name in names {
            match self.index.get(name.as_ref()) {
                Some(&index) if !members.contains(&index) => members.push(index),
                Some(_) => {}
                None => warn!(role = name.as_ref(), "Skipping unknown role"),
            }
        }
        RoleSet::new(self, members)
    }

    /// Collect every role assigned to `username` directly or through one of
    /// `groups`. Names are compared case-insensitively; `*` assigns a role to
    /// every user.
    pub fn role_set_for(&self, username: &str, groups: &[String]) -> RoleSet<'_> {
        let members = self
            .assignments
            .iter()
            .enumerate()
            .filter(|(_, assignment)| assignment.matches(username, groups))
            .map(|(index, _)| index)
            .collect();
        RoleSet::new(self, members)
    }

    pub(crate) fn view(&self, index: usize) -> Option<RoleView<'_>> {
        self.roles.get(index).map(|role| RoleView {
            graph: self,
            role,
            index,
        })
    }
}

/// A role as seen through its graph, with access to its ancestors
#[derive(Debug, Clone, Copy)]
pub struct RoleView<'a> {
    graph: &'a RoleGraph,
    role: &'a Role,
    index: usize,
}

impl<'a> RoleView<'a> {
    pub fn role(&self) -> &'a Role {
        self.role
    }

    pub fn name(&self) -> &'a str {
        self.role.name()
    }

    pub fn parent(&self) -> Option<RoleView<'a>> {
        self.ancestors().next()
    }

    pub fn children(&self) -> &'a [String] {
        self.role.children()
    }

    /// Parent, grandparent, ... in ascending order
    pub fn ancestors(&self) -> impl Iterator<Item = RoleView<'a>> + 'a {
        let graph = self.graph;
        self.chain_indices()
            .iter()
            .skip(1)
            .filter_map(move |&index| graph.view(index))
    }

    /// Whether this role grants `permission`
    ///
    /// The role's own permissions are consulted first, then those of every
    /// ancestor unless `ignore_parent` is set.
    pub fn grants(&self, permission: &str, ignore_parent: bool) -> bool {
        let depth = if ignore_parent { 1 } else { usize::MAX };
        self.chain()
            .take(depth)
            .any(|role| role.has_permission(permission))
    }

    /// Whether this role refuses `permission`, walking the chain like [`grants`](Self::grants)
    pub fn denies(&self, permission: &str, ignore_parent: bool) -> bool {
        let depth = if ignore_parent { 1 } else { usize::MAX };
        self.chain()
            .take(depth)
            .any(|role| role.has_refusal(permission))
    }

    /// Own restriction named `name`. Restrictions are not inherited.
    pub fn restriction(&self, name: &str) -> Option<&'a str> {
        self.role.restriction(name)
    }

    pub fn restrictions(&self) -> &'a BTreeMap<String, String> {
        self.role.restrictions()
    }

    fn chain_indices(&self) -> &'a [usize] {
        self.graph
            .chains
            .get(self.index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn chain(&self) -> impl Iterator<Item = &'a Role> + 'a {
        let roles = &self.graph.roles;
        self.chain_indices()
            .iter()
            .filter_map(move |&index| roles.get(index))
    }
}
