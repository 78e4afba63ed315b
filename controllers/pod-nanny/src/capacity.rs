//! Cluster capacity sampling.
//!
//! Lists the cluster's nodes and totals their CPU capacity, split into all
//! nodes and schedulable (not cordoned) nodes.

use crate::error::ControllerError;
use cluster_client::ClusterClientTrait;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::{debug, warn};

const MILLIS_PER_CORE: u64 = 1000;

/// Point-in-time measurement of cluster size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClusterCapacitySnapshot {
    pub total_nodes: u32,
    pub schedulable_nodes: u32,
    pub total_cores: u32,
    pub schedulable_cores: u32,
}

/// Count nodes and cores in the cluster.
///
/// Read-only. Fails when a node advertises an unparsable CPU quantity or
/// when either core total is not a whole number that fits a `u32`.
pub async fn sample_capacity<C>(client: &C) -> Result<ClusterCapacitySnapshot, ControllerError>
where
    C: ClusterClientTrait + ?Sized,
{
    let nodes = client.list_nodes().await?;

    let mut schedulable_nodes: u32 = 0;
    let mut total_millis: u64 = 0;
    let mut schedulable_millis: u64 = 0;

    for node in &nodes {
        let millis = match &node.cpu {
            Some(quantity) => cpu_millis(quantity).ok_or_else(|| {
                ControllerError::Capacity(format!(
                    "node {} has unparsable cpu capacity {:?}",
                    node.name, quantity.0
                ))
            })?,
            None => {
                warn!("Node {} does not report cpu capacity, counting 0 cores", node.name);
                0
            }
        };

        total_millis = total_millis.checked_add(millis).ok_or_else(overflow)?;
        if !node.unschedulable {
            schedulable_nodes += 1;
            schedulable_millis = schedulable_millis.checked_add(millis).ok_or_else(overflow)?;
        }
    }

    let snapshot = ClusterCapacitySnapshot {
        total_nodes: u32::try_from(nodes.len())
            .map_err(|_| ControllerError::Capacity(format!("{} nodes is too many to count", nodes.len())))?,
        schedulable_nodes,
        total_cores: whole_cores(total_millis)?,
        schedulable_cores: whole_cores(schedulable_millis)?,
    };
    debug!(
        total_nodes = snapshot.total_nodes,
        schedulable_nodes = snapshot.schedulable_nodes,
        total_cores = snapshot.total_cores,
        schedulable_cores = snapshot.schedulable_cores,
        "Sampled cluster capacity"
    );
    Ok(snapshot)
}

fn overflow() -> ControllerError {
    ControllerError::Capacity("core count overflowed while summing node capacity".to_string())
}

fn whole_cores(millis: u64) -> Result<u32, ControllerError> {
    if millis % MILLIS_PER_CORE != 0 {
        return Err(ControllerError::Capacity(format!(
            "unable to compute an integer number of cores from {}m",
            millis
        )));
    }
    u32::try_from(millis / MILLIS_PER_CORE).map_err(|_| {
        ControllerError::Capacity(format!("{}m is too many cores to represent", millis))
    })
}

/// Parse a CPU quantity into millicores.
///
/// Accepts the Kubernetes quantity forms: plain and decimal numbers, decimal
/// SI suffixes (`n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`), binary suffixes (`Ki` to
/// `Ei`) and decimal exponents (`1e3`). Sub-millicore remainders round up,
/// as the API server does. Negative or malformed quantities yield `None`.
pub fn cpu_millis(quantity: &Quantity) -> Option<u64> {
    let s = quantity.0.trim();
    let s = s.strip_prefix('+').unwrap_or(s);

    let number_len = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(number_len);

    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa: u128 = 0;
    for digit in int_part.bytes().chain(frac_part.bytes()) {
        if !digit.is_ascii_digit() {
            return None;
        }
        mantissa = mantissa
            .checked_mul(10)?
            .checked_add(u128::from(digit - b'0'))?;
    }
    let mut exponent = -i32::try_from(frac_part.len()).ok()?;

    let (decimal, binary) = suffix_scale(suffix)?;
    exponent += decimal + 3; // to millicores
    mantissa = mantissa.checked_mul(binary)?;

    let millis = if exponent >= 0 {
        mantissa.checked_mul(10u128.checked_pow(exponent.unsigned_abs())?)?
    } else {
        match 10u128.checked_pow(exponent.unsigned_abs()) {
            Some(divisor) => mantissa.div_ceil(divisor),
            // Any non-zero remainder this small still rounds up to 1m
            None => u128::from(mantissa > 0),
        }
    };
    u64::try_from(millis).ok()
}

/// Decimal exponent and binary multiplier for a quantity suffix
fn suffix_scale(suffix: &str) -> Option<(i32, u128)> {
    let scale = match suffix {
        "" => (0, 1),
        "n" => (-9, 1),
        "u" => (-6, 1),
        "m" => (-3, 1),
        "k" => (3, 1),
        "M" => (6, 1),
        "G" => (9, 1),
        "T" => (12, 1),
        "P" => (15, 1),
        "E" => (18, 1),
        "Ki" => (0, 1 << 10),
        "Mi" => (0, 1 << 20),
        "Gi" => (0, 1 << 30),
        "Ti" => (0, 1 << 40),
        "Pi" => (0, 1 << 50),
        "Ei" => (0, 1 << 60),
        _ => {
            let exp = suffix.strip_prefix(['e', 'E'])?;
            (exp.parse::<i32>().ok().filter(|e| e.abs() <= 64)?, 1)
        }
    };
    Some(scale)
}
