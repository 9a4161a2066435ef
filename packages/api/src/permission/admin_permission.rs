/// Capabilities an admin account can hold. Stored as comma separated names.
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct AdminPermission: i64 {
        const OrdersRead          =   0b00000000_00000000_00000001;
        const OrdersWrite         =   0b00000000_00000000_00000010;
        const NotificationsRead   =   0b00000000_00000000_00000100;
        const NotificationsWrite  =   0b00000000_00000000_00001000;
        const CatalogWrite        =   0b00000000_00000000_00010000;
    }
}

const NAMES: &[(&str, AdminPermission)] = &[
    ("orders.read", AdminPermission::OrdersRead),
    ("orders.write", AdminPermission::OrdersWrite),
    ("notifications.read", AdminPermission::NotificationsRead),
    ("notifications.write", AdminPermission::NotificationsWrite),
    ("catalog.write", AdminPermission::CatalogWrite),
];

impl AdminPermission {
    pub fn from_capability(name: &str) -> Option<AdminPermission> {
        let name = name.trim();
        NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, permission)| *permission)
    }

    /// Parses a stored permission list. Unknown names are skipped.
    pub fn from_list(list: &str) -> AdminPermission {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .fold(AdminPermission::empty(), |acc, name| {
                match AdminPermission::from_capability(name) {
                    Some(permission) => acc | permission,
                    None => {
                        tracing::warn!(capability = name, "Ignoring unknown capability");
                        acc
                    }
                }
            })
    }

    /// Capability names in a stable order.
    pub fn names(&self) -> Vec<&'static str> {
        NAMES
            .iter()
            .filter(|(_, permission)| self.contains(*permission))
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn name(&self) -> String {
        self.names().join(",")
    }
}

pub fn has_admin_permission(permissions: &AdminPermission, permission: AdminPermission) -> bool {
    permissions.contains(permission)
}
