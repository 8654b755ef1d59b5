//! Well-known role name constants and authorization predicates.
//!
//! Roles are plain strings on the user row, not a hierarchy. Every
//! authorization decision is an explicit predicate evaluated per
//! operation.

use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether the actor may moderate (delete) a resource owned by `owner_id`.
///
/// True when the actor owns the resource or holds the admin role. Edits
/// are stricter than deletes and use [`is_owner`] alone.
pub fn can_moderate(actor_id: DbId, actor_role: &str, owner_id: DbId) -> bool {
    is_owner(actor_id, owner_id) || actor_role == ROLE_ADMIN
}

/// Whether the actor is the owner of the resource.
pub fn is_owner(actor_id: DbId, owner_id: DbId) -> bool {
    actor_id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_owner_can_moderate() {
        let id = Uuid::new_v4();
        assert!(can_moderate(id, ROLE_USER, id));
    }

    #[test]
    fn test_admin_can_moderate_others() {
        let admin = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(can_moderate(admin, ROLE_ADMIN, owner));
    }

    #[test]
    fn test_third_party_user_cannot_moderate() {
        let actor = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(!can_moderate(actor, ROLE_USER, owner));
    }

    #[test]
    fn test_admin_is_not_owner() {
        let admin = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(!is_owner(admin, owner), "ownership is identity, not role");
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("user").is_ok());
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("superuser").is_err());
        assert!(validate_role("ADMIN").is_err(), "roles are lowercase");
    }
}
