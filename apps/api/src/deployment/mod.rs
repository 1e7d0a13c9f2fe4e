// Deployment description of the single-instance host and the rules that
// keep its pieces pointing at each other

pub mod check;
pub mod database_url;
pub mod errors;
pub mod firewall;
pub mod topology;

pub use check::{check, TopologyViolation};
pub use database_url::DatabaseUrl;
pub use errors::{DeploymentError, DeploymentResult};
pub use firewall::{Cidr, FirewallRule, Protocol};
pub use topology::DeploymentTopology;
