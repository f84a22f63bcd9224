use std::collections::BTreeSet;

use crate::models::{Permission, User};

/// 根据角色计算用户的有效权限
pub struct PermissionResolver;

impl PermissionResolver {
    /// 用户所有角色权限的并集
    pub fn resolve(user: &User) -> BTreeSet<Permission> {
        user.roles
            .iter()
            .flat_map(|role| role.permissions.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(roles: Vec<Role>) -> User {
        User {
            id: 1,
            identifier: "alice@example.com".into(),
            verified: true,
            roles,
        }
    }

    #[test]
    fn unions_and_deduplicates() {
        let u = user(vec![
            Role::new(1, "reader", [Permission::ReadCatalog]),
            Role::new(2, "editor", [Permission::ReadCatalog, Permission::UpdateCatalog]),
        ]);

        let permissions = PermissionResolver::resolve(&u);
        assert_eq!(
            permissions,
            BTreeSet::from([Permission::ReadCatalog, Permission::UpdateCatalog])
        );
    }

    #[test]
    fn no_roles_no_permissions() {
        assert!(PermissionResolver::resolve(&user(vec![])).is_empty());
    }
}
