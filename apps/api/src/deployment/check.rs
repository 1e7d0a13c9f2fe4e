use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::database_url::is_loopback_host;
use super::firewall::{Cidr, Protocol};
use super::topology::DeploymentTopology;

/// TCP port for SSH access to the host
pub const SSH_PORT: u16 = 22;

/// Inbound TCP ports the security group must open, and nothing else
pub const EXPECTED_INBOUND_PORTS: [u16; 2] = [SSH_PORT, 8080];

/// A way in which the deployment contradicts itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyViolation {
    DatabaseHostMismatch { expected: String, actual: String },
    DatabasePortMismatch { expected: u16, actual: u16 },
    DatabaseNameMismatch { expected: String, actual: String },
    UnexpectedInboundRule { protocol: Protocol, port: u16 },
    MissingInboundRule { port: u16 },
    RestrictedSource { port: u16, source: Cidr },
    EndpointPortMismatch { endpoint: u16, listen: u16 },
    EndpointHostMismatch { endpoint: String, public_ip: String },
}

impl fmt::Display for TopologyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyViolation::DatabaseHostMismatch { expected, actual } => {
                write!(f, "BDI_DB_URL host {actual} does not reach database host {expected}")
            }
            TopologyViolation::DatabasePortMismatch { expected, actual } => {
                write!(f, "BDI_DB_URL port {actual} does not match the published database port {expected}")
            }
            TopologyViolation::DatabaseNameMismatch { expected, actual } => {
                write!(f, "BDI_DB_URL database {actual} does not match container database {expected}")
            }
            TopologyViolation::UnexpectedInboundRule { protocol, port } => {
                write!(f, "security group opens unexpected inbound {protocol}/{port}")
            }
            TopologyViolation::MissingInboundRule { port } => {
                write!(f, "security group does not open required inbound tcp/{port}")
            }
            TopologyViolation::RestrictedSource { port, source } => {
                write!(f, "security group restricts inbound tcp/{port} to {source}, expected 0.0.0.0/0")
            }
            TopologyViolation::EndpointPortMismatch { endpoint, listen } => {
                write!(f, "public endpoint port {endpoint} does not match API listening port {listen}")
            }
            TopologyViolation::EndpointHostMismatch { endpoint, public_ip } => {
                write!(f, "public endpoint host {endpoint} is not the instance address {public_ip}")
            }
        }
    }
}

impl std::error::Error for TopologyViolation {}

/// Runs every consistency rule over the topology
///
/// An empty result means the deployment is consistent.
pub fn check(topology: &DeploymentTopology) -> Vec<TopologyViolation> {
    let mut violations = Vec::new();
    check_database_binding(topology, &mut violations);
    check_security_group(topology, &mut violations);
    check_public_endpoint(topology, &mut violations);
    violations
}

fn check_database_binding(topology: &DeploymentTopology, out: &mut Vec<TopologyViolation>) {
    let url = &topology.api.db_url;
    let db = &topology.database;

    let same_host = if is_loopback_host(&db.host) {
        url.is_local()
    } else {
        url.host().eq_ignore_ascii_case(&db.host)
    };
    if !same_host {
        out.push(TopologyViolation::DatabaseHostMismatch {
            expected: db.host.clone(),
            actual: url.host().to_string(),
        });
    }

    if url.port() != db.published_port {
        out.push(TopologyViolation::DatabasePortMismatch {
            expected: db.published_port,
            actual: url.port(),
        });
    }

    if url.database() != db.name {
        out.push(TopologyViolation::DatabaseNameMismatch {
            expected: db.name.clone(),
            actual: url.database().to_string(),
        });
    }
}

fn check_security_group(topology: &DeploymentTopology, out: &mut Vec<TopologyViolation>) {
    // port -> sources of the tcp rules opening it
    let mut expected_sources: BTreeMap<u16, Vec<Cidr>> = BTreeMap::new();
    let mut unexpected = BTreeSet::new();

    for rule in &topology.security_group.inbound {
        let expected = rule.protocol == Protocol::Tcp && EXPECTED_INBOUND_PORTS.contains(&rule.port);
        if expected {
            expected_sources.entry(rule.port).or_default().push(rule.source);
        } else {
            unexpected.insert((rule.port, rule.protocol));
        }
    }

    for (port, protocol) in unexpected {
        out.push(TopologyViolation::UnexpectedInboundRule { protocol, port });
    }

    for port in EXPECTED_INBOUND_PORTS {
        match expected_sources.get(&port) {
            None => out.push(TopologyViolation::MissingInboundRule { port }),
            Some(sources) if !sources.iter().any(Cidr::is_any) => {
                out.push(TopologyViolation::RestrictedSource {
                    port,
                    source: sources[0],
                });
            }
            Some(_) => {}
        }
    }
}

fn check_public_endpoint(topology: &DeploymentTopology, out: &mut Vec<TopologyViolation>) {
    let endpoint = &topology.api.public_endpoint;

    // port_or_known_default only fails for schemes without a default
    let endpoint_port = endpoint.port_or_known_default().unwrap_or(0);
    if endpoint_port != topology.api.listen_port {
        out.push(TopologyViolation::EndpointPortMismatch {
            endpoint: endpoint_port,
            listen: topology.api.listen_port,
        });
    }

    let public_ip = topology.host.public_ip.to_string();
    let endpoint_host = endpoint
        .host_str()
        .unwrap_or_default()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    if endpoint_host != public_ip {
        out.push(TopologyViolation::EndpointHostMismatch {
            endpoint: endpoint_host,
            public_ip,
        });
    }
}
