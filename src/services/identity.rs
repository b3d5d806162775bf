//! Identity service client
//!
//! The identity service owns user role sets; the core only asks it to add a
//! role when an application reaches a membership-granting status. The
//! exactly-once guard for that grant lives on the application document, not
//! here.

use serde::Serialize;

use crate::auth::Role;
use crate::effects::RoleGrant;
use crate::types::Result;

/// Client for the identity service's role-grant operation
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire body for a role grant
#[derive(Debug, Serialize)]
struct GrantRoleBody {
    role: Role,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Add `grant.role` to the user's role set
    pub async fn grant_role(&self, grant: &RoleGrant) -> Result<()> {
        self.http
            .post(format!(
                "{}/users/{}/roles",
                self.base_url, grant.user_id
            ))
            .json(&GrantRoleBody { role: grant.role })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
