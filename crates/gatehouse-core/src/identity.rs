//! The authenticated caller.
//!
//! An [`Identity`] is created by the authentication guard from verified token
//! claims, attached to the request extensions once, and only read afterwards.
//! It is never persisted.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resolved identity of the caller for the lifetime of one request.
///
/// # Fields
///
/// - `id`: stable subject identifier (`sub` claim)
/// - `email`: caller's email address
/// - `tenant_id`: tenant scope (None for tenant-less, e.g. platform admin, callers)
/// - `roles`: granted role labels, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            tenant_id: None,
            roles: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Check if the identity carries a specific role label
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Check if the identity carries at least one of the given role labels.
    ///
    /// An empty slice never matches.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }

    /// Check if the identity carries every one of the given role labels
    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().all(|r| self.has_role(r.as_ref()))
    }

    /// True when the caller is not scoped to any tenant
    pub fn is_tenantless(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Reads a single field. Returns `None` only for an absent tenant.
    pub fn field(&self, field: IdentityField) -> Option<IdentityValue<'_>> {
        match field {
            IdentityField::Id => Some(IdentityValue::Text(&self.id)),
            IdentityField::Email => Some(IdentityValue::Text(&self.email)),
            IdentityField::TenantId => self.tenant_id.as_deref().map(IdentityValue::Text),
            IdentityField::Roles => Some(IdentityValue::Roles(&self.roles)),
        }
    }
}

/// Selector for one field of an [`Identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Id,
    Email,
    TenantId,
    Roles,
}

impl IdentityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityField::Id => "id",
            IdentityField::Email => "email",
            IdentityField::TenantId => "tenantId",
            IdentityField::Roles => "roles",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown identity field: {0}")]
pub struct UnknownIdentityField(pub String);

impl FromStr for IdentityField {
    type Err = UnknownIdentityField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(IdentityField::Id),
            "email" => Ok(IdentityField::Email),
            "tenantId" => Ok(IdentityField::TenantId),
            "roles" => Ok(IdentityField::Roles),
            other => Err(UnknownIdentityField(other.to_string())),
        }
    }
}

/// Borrowed value of a single identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IdentityValue<'a> {
    Text(&'a str),
    Roles(&'a BTreeSet<String>),
}

impl<'a> IdentityValue<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            IdentityValue::Text(s) => Some(s),
            IdentityValue::Roles(_) => None,
        }
    }

    pub fn as_roles(&self) -> Option<&'a BTreeSet<String>> {
        match self {
            IdentityValue::Roles(r) => Some(r),
            IdentityValue::Text(_) => None,
        }
    }
}
