//! Handler-side access to the authenticated caller.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::Extensions, http::request::Parts};
use serde::Serialize;

use gatehouse_core::{Identity, IdentityField, IdentityValue};

/// What [`current_user`] hands back: the whole identity or one field of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CurrentUserValue<'a> {
    Identity(&'a Identity),
    Field(IdentityValue<'a>),
}

impl<'a> CurrentUserValue<'a> {
    pub fn as_identity(&self) -> Option<&'a Identity> {
        match self {
            CurrentUserValue::Identity(identity) => Some(identity),
            CurrentUserValue::Field(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            CurrentUserValue::Field(value) => value.as_str(),
            CurrentUserValue::Identity(_) => None,
        }
    }
}

/// Reads the identity attached by the authentication guard.
///
/// With no selector the whole identity is returned, otherwise only the selected
/// field. Returns `None` when no identity is attached (public routes) or when
/// the selected field is unset, e.g. `tenantId` on a tenant-less caller.
pub fn current_user(
    extensions: &Extensions,
    field: Option<IdentityField>,
) -> Option<CurrentUserValue<'_>> {
    let identity = extensions.get::<Identity>()?;

    match field {
        None => Some(CurrentUserValue::Identity(identity)),
        Some(field) => identity.field(field).map(CurrentUserValue::Field),
    }
}

/// Extractor yielding the attached identity, if any. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Identity>().cloned()))
    }
}
