use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 权限
///
/// 序列化为 PascalCase 名称，`roles.permissions` 列中也以这种形式保存
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    Authenticated,
    SuperAdmin,
    Owner,
    Public,
    CreateCatalog,
    ReadCatalog,
    UpdateCatalog,
    DeleteCatalog,
    CreateCustomer,
    ReadCustomer,
    UpdateCustomer,
    DeleteCustomer,
    CreateAdministrator,
    ReadAdministrator,
    UpdateAdministrator,
    DeleteAdministrator,
    CreateOrder,
    ReadOrder,
    UpdateOrder,
    DeleteOrder,
    CreatePromotion,
    ReadPromotion,
    UpdatePromotion,
    DeletePromotion,
    CreateSettings,
    ReadSettings,
    UpdateSettings,
    DeleteSettings,
}

impl Permission {
    pub const ALL: [Permission; 28] = [
        Permission::Authenticated,
        Permission::SuperAdmin,
        Permission::Owner,
        Permission::Public,
        Permission::CreateCatalog,
        Permission::ReadCatalog,
        Permission::UpdateCatalog,
        Permission::DeleteCatalog,
        Permission::CreateCustomer,
        Permission::ReadCustomer,
        Permission::UpdateCustomer,
        Permission::DeleteCustomer,
        Permission::CreateAdministrator,
        Permission::ReadAdministrator,
        Permission::UpdateAdministrator,
        Permission::DeleteAdministrator,
        Permission::CreateOrder,
        Permission::ReadOrder,
        Permission::UpdateOrder,
        Permission::DeleteOrder,
        Permission::CreatePromotion,
        Permission::ReadPromotion,
        Permission::UpdatePromotion,
        Permission::DeletePromotion,
        Permission::CreateSettings,
        Permission::ReadSettings,
        Permission::UpdateSettings,
        Permission::DeleteSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Authenticated => "Authenticated",
            Permission::SuperAdmin => "SuperAdmin",
            Permission::Owner => "Owner",
            Permission::Public => "Public",
            Permission::CreateCatalog => "CreateCatalog",
            Permission::ReadCatalog => "ReadCatalog",
            Permission::UpdateCatalog => "UpdateCatalog",
            Permission::DeleteCatalog => "DeleteCatalog",
            Permission::CreateCustomer => "CreateCustomer",
            Permission::ReadCustomer => "ReadCustomer",
            Permission::UpdateCustomer => "UpdateCustomer",
            Permission::DeleteCustomer => "DeleteCustomer",
            Permission::CreateAdministrator => "CreateAdministrator",
            Permission::ReadAdministrator => "ReadAdministrator",
            Permission::UpdateAdministrator => "UpdateAdministrator",
            Permission::DeleteAdministrator => "DeleteAdministrator",
            Permission::CreateOrder => "CreateOrder",
            Permission::ReadOrder => "ReadOrder",
            Permission::UpdateOrder => "UpdateOrder",
            Permission::DeleteOrder => "DeleteOrder",
            Permission::CreatePromotion => "CreatePromotion",
            Permission::ReadPromotion => "ReadPromotion",
            Permission::UpdatePromotion => "UpdatePromotion",
            Permission::DeletePromotion => "DeletePromotion",
            Permission::CreateSettings => "CreateSettings",
            Permission::ReadSettings => "ReadSettings",
            Permission::UpdateSettings => "UpdateSettings",
            Permission::DeleteSettings => "DeleteSettings",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>().unwrap(), permission);
        }
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&Permission::ReadCatalog).unwrap();
        assert_eq!(json, "\"ReadCatalog\"");
    }

    #[test]
    fn rejects_unknown() {
        assert!("ReadEverything".parse::<Permission>().is_err());
    }
}
