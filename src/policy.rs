//! Per-resource access control.
//!
//! Every exposed resource has independent gates for read, create, update and
//! delete. The policy is plain configuration, deserialized from the `[access]`
//! section and handed to the API layer through `AppState`.

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, UserClaims},
};

/// Resources exposed by the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Books,
    Authors,
    Editors,
    Jobs,
    Series,
    Tags,
    Reviews,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Books => "books",
            Resource::Authors => "authors",
            Resource::Editors => "editors",
            Resource::Jobs => "jobs",
            Resource::Series => "series",
            Resource::Tags => "tags",
            Resource::Reviews => "reviews",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn verb(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Create => "add",
            Operation::Update => "modify",
            Operation::Delete => "delete",
        }
    }
}

/// Who may pass a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    Public,
    User,
    Admin,
}

impl Gate {
    fn required_role(&self) -> Option<Role> {
        match self {
            Gate::Public => None,
            Gate::User => Some(Role::User),
            Gate::Admin => Some(Role::Admin),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResourceAccess {
    pub read: Gate,
    pub create: Gate,
    pub update: Gate,
    pub delete: Gate,
}

impl Default for ResourceAccess {
    fn default() -> Self {
        Self {
            read: Gate::Public,
            create: Gate::User,
            update: Gate::User,
            delete: Gate::User,
        }
    }
}

impl ResourceAccess {
    pub fn gate(&self, operation: Operation) -> Gate {
        match operation {
            Operation::Read => self.read,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourcePolicy {
    pub books: ResourceAccess,
    pub authors: ResourceAccess,
    pub editors: ResourceAccess,
    pub jobs: ResourceAccess,
    pub series: ResourceAccess,
    pub tags: ResourceAccess,
    pub reviews: ResourceAccess,
}

impl ResourcePolicy {
    pub fn access(&self, resource: Resource) -> &ResourceAccess {
        match resource {
            Resource::Books => &self.books,
            Resource::Authors => &self.authors,
            Resource::Editors => &self.editors,
            Resource::Jobs => &self.jobs,
            Resource::Series => &self.series,
            Resource::Tags => &self.tags,
            Resource::Reviews => &self.reviews,
        }
    }

    /// Check whether `user` may perform `operation` on `resource`.
    ///
    /// Anonymous callers hitting a non-public gate get an authentication
    /// error, authenticated callers without the role an authorization error.
    pub fn check(
        &self,
        resource: Resource,
        operation: Operation,
        user: Option<&UserClaims>,
    ) -> AppResult<()> {
        let Some(role) = self.access(resource).gate(operation).required_role() else {
            return Ok(());
        };

        let message = format!(
            "Only authenticated users can {} {}.",
            operation.verb(),
            resource.as_str()
        );

        match user {
            None => Err(AppError::Authentication(message)),
            Some(claims) if claims.has_role(role) => Ok(()),
            Some(_) => Err(AppError::Authorization(format!(
                "Role '{}' is required to {} {}",
                role,
                operation.verb(),
                resource.as_str()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: Vec<Role>) -> UserClaims {
        UserClaims {
            sub: "alice".to_string(),
            roles,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_reads_are_public_by_default() {
        let policy = ResourcePolicy::default();
        assert!(policy.check(Resource::Books, Operation::Read, None).is_ok());
        assert!(policy.check(Resource::Tags, Operation::Read, None).is_ok());
    }

    #[test]
    fn test_anonymous_write_is_unauthenticated() {
        let policy = ResourcePolicy::default();
        let err = policy
            .check(Resource::Books, Operation::Create, None)
            .unwrap_err();
        match err {
            AppError::Authentication(msg) => {
                assert_eq!(msg, "Only authenticated users can add books.")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_role_hierarchy() {
        let mut policy = ResourcePolicy::default();
        policy.jobs.delete = Gate::Admin;

        let user = claims(vec![Role::User]);
        let admin = claims(vec![Role::Admin]);

        assert!(policy.check(Resource::Jobs, Operation::Update, Some(&user)).is_ok());
        assert!(matches!(
            policy.check(Resource::Jobs, Operation::Delete, Some(&user)),
            Err(AppError::Authorization(_))
        ));
        assert!(policy.check(Resource::Jobs, Operation::Delete, Some(&admin)).is_ok());
        assert!(policy.check(Resource::Jobs, Operation::Create, Some(&admin)).is_ok());
    }

    #[test]
    fn test_deserialize_partial_section() {
        let policy: ResourcePolicy =
            serde_json::from_str(r#"{"reviews": {"read": "user"}}"#).unwrap();
        assert_eq!(policy.reviews.read, Gate::User);
        assert_eq!(policy.reviews.create, Gate::User);
        assert_eq!(policy.books.read, Gate::Public);
    }
}
