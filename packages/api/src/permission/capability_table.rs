//! Maps gated admin operations onto the capability they require.
//!
//! The mapping is data. It ships in `storefront.config.json` and can be replaced per
//! deployment, so tightening access never touches handler code.

use std::collections::HashMap;

use serde::Deserialize;

use super::admin_permission::AdminPermission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListOrders,
    ViewOrder,
    UpdateOrderStatus,
    ListNotifications,
    UpdateNotifications,
    ManageCatalog,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::ListOrders,
        Operation::ViewOrder,
        Operation::UpdateOrderStatus,
        Operation::ListNotifications,
        Operation::UpdateNotifications,
        Operation::ManageCatalog,
    ];
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityTableError {
    #[error("operation {0:?} has no capability assigned")]
    MissingOperation(Operation),
    #[error("operation {operation:?} names unknown capability {capability:?}")]
    UnknownCapability {
        operation: Operation,
        capability: String,
    },
    #[error("invalid capability table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    required: HashMap<Operation, AdminPermission>,
}

impl CapabilityTable {
    /// Builds a table from `operation -> capability name` pairs.
    ///
    /// Every operation must be mapped, an incomplete table would leave a route either
    /// unreachable or ungated.
    pub fn from_names(names: &HashMap<Operation, String>) -> Result<Self, CapabilityTableError> {
        let mut required = HashMap::with_capacity(names.len());
        for operation in Operation::ALL {
            let capability = names
                .get(&operation)
                .ok_or(CapabilityTableError::MissingOperation(operation))?;
            let permission = AdminPermission::from_capability(capability).ok_or_else(|| {
                CapabilityTableError::UnknownCapability {
                    operation,
                    capability: capability.clone(),
                }
            })?;
            required.insert(operation, permission);
        }
        Ok(Self { required })
    }

    /// Parses a standalone JSON object such as `{"list_orders": "orders.read", ...}`.
    pub fn from_json(json: &str) -> Result<Self, CapabilityTableError> {
        let names: HashMap<Operation, String> = serde_json::from_str(json)?;
        Self::from_names(&names)
    }

    pub fn required(&self, operation: Operation) -> AdminPermission {
        // Construction guarantees every operation is present; `all()` fails closed.
        self.required
            .get(&operation)
            .copied()
            .unwrap_or(AdminPermission::all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "list_orders": "orders.read",
        "view_order": "orders.read",
        "update_order_status": "orders.write",
        "list_notifications": "notifications.read",
        "update_notifications": "notifications.write",
        "manage_catalog": "catalog.write"
    }"#;

    #[test]
    fn parses_complete_table() {
        let table = CapabilityTable::from_json(TABLE).unwrap();
        assert_eq!(
            table.required(Operation::UpdateOrderStatus),
            AdminPermission::OrdersWrite
        );
        assert_eq!(
            table.required(Operation::ViewOrder),
            AdminPermission::OrdersRead
        );
    }

    #[test]
    fn rejects_incomplete_table() {
        let err = CapabilityTable::from_json(r#"{"list_orders": "orders.read"}"#).unwrap_err();
        assert!(matches!(err, CapabilityTableError::MissingOperation(_)));
    }

    #[test]
    fn rejects_unknown_capability() {
        let json = TABLE.replace("catalog.write", "catalog.everything");
        let err = CapabilityTable::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            CapabilityTableError::UnknownCapability {
                operation: Operation::ManageCatalog,
                ..
            }
        ));
    }
}
