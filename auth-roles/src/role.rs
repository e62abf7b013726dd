use crate::matcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named set of permissions, refusals and restrictions
///
/// The parent is referenced by name. Grants and refusals of the parent chain
/// are only taken into account once the role is part of a
/// [`RoleGraph`](crate::RoleGraph), which resolves and validates the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: String,
    parent: Option<String>,
    children: Vec<String>,
    permissions: Vec<String>,
    refusals: Vec<String>,
    restrictions: BTreeMap<String, String>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Name of the role privileges are inherited from
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn set_parent(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = Some(parent.into());
        self
    }

    /// Names of the roles inheriting from this one
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn set_children<I, S>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_child(&mut self, child: impl Into<String>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn set_permissions<I, S>(&mut self, permissions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn refusals(&self) -> &[String] {
        &self.refusals
    }

    pub fn set_refusals<I, S>(&mut self, refusals: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refusals = refusals.into_iter().map(Into::into).collect();
        self
    }

    /// All restrictions of this role, keyed by restriction name
    pub fn restrictions(&self) -> &BTreeMap<String, String> {
        &self.restrictions
    }

    /// The restriction registered under `name`, if any
    pub fn restriction(&self, name: &str) -> Option<&str> {
        self.restrictions.get(name).map(String::as_str)
    }

    pub fn set_restrictions<I, K, V>(&mut self, restrictions: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.restrictions = restrictions
            .into_iter()
            .map(|(name, expression)| (name.into(), expression.into()))
            .collect();
        self
    }

    /// Whether one of this role's own permissions matches `permission`
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|granted| matcher::matches(granted, permission))
    }

    /// Whether one of this role's own refusals matches `permission`
    pub fn has_refusal(&self, permission: &str) -> bool {
        self.refusals
            .iter()
            .any(|refused| matcher::matches(refused, permission))
    }
}
