pub mod admin_permission;
pub mod capability_table;

pub use admin_permission::{AdminPermission, has_admin_permission};
pub use capability_table::{CapabilityTable, CapabilityTableError, Operation};
