//! Post-authentication authorization checks.
//!
//! Every check is a pure comparison over values the caller already holds.
//! A failure is always `Forbidden`: the caller is known but may not act on
//! the resource. "Not authenticated" and "not found" are reported elsewhere.

use std::fmt::Display;

use thiserror::Error;

/// The authenticated caller is not allowed to perform the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Forbidden: {reason}")]
pub struct Forbidden {
    pub reason: String,
}

impl Forbidden {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Succeeds only when the resource is owned by the caller.
pub fn assert_owner<T>(resource_owner_id: &T, caller_id: &T) -> Result<(), Forbidden>
where
    T: PartialEq + Display + ?Sized,
{
    if resource_owner_id == caller_id {
        Ok(())
    } else {
        Err(Forbidden::new(format!(
            "caller {} does not own resource owned by {}",
            caller_id, resource_owner_id
        )))
    }
}

/// Succeeds only when the identity addressed by a path is the caller itself.
pub fn assert_self<T>(path_id: &T, caller_id: &T) -> Result<(), Forbidden>
where
    T: PartialEq + Display + ?Sized,
{
    if path_id == caller_id {
        Ok(())
    } else {
        Err(Forbidden::new(format!(
            "caller {} may not act on identity {}",
            caller_id, path_id
        )))
    }
}

/// Succeeds when `granted` is true; `required` names the missing role.
pub fn assert_role(required: impl Display, granted: bool) -> Result<(), Forbidden> {
    if granted {
        Ok(())
    } else {
        Err(Forbidden::new(format!("role {} required", required)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_owner() {
        assert!(assert_owner(&5, &5).is_ok());
        assert!(matches!(assert_owner(&5, &7), Err(Forbidden { .. })));
    }

    #[test]
    fn test_assert_owner_unsized() {
        assert!(assert_owner("a@example.com", "a@example.com").is_ok());
        assert!(assert_owner("a@example.com", "b@example.com").is_err());
    }

    #[test]
    fn test_assert_self() {
        assert!(assert_self(&42u64, &42u64).is_ok());

        let err = assert_self(&42u64, &43u64).unwrap_err();
        assert!(err.reason.contains("43"));
        assert!(err.to_string().starts_with("Forbidden"));
    }

    #[test]
    fn test_assert_role() {
        assert!(assert_role("ADMIN", true).is_ok());
        assert_eq!(
            assert_role("ADMIN", false),
            Err(Forbidden::new("role ADMIN required"))
        );
    }
}
