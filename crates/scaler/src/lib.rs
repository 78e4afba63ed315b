//! Pod Nanny Scaling Parameters
//!
//! Types and pure logic for turning cluster capacity into a replica count.
//!
//! The scaling parameters live in a JSON document, usually mounted into the
//! nanny's pod from a ConfigMap volume:
//!
//! ```json
//! {
//!   "replicas": {
//!     "cores_per_replica": { "0": 1, "4": 2, "8": 4 }
//!   }
//! }
//! ```
//!
//! Each entry maps a schedulable core threshold to the replica count that
//! applies once the cluster reaches it.
//!
//! # Example
//!
//! ```
//! use scaler::{compute_target, ScalerParams};
//!
//! let params = ScalerParams::from_json(
//!     r#"{"replicas": {"cores_per_replica": {"0": 1, "4": 2, "8": 4}}}"#,
//! ).unwrap();
//! let ladder = params.ladder().unwrap();
//!
//! assert_eq!(compute_target(&ladder, 3, 10), 4);
//! ```

pub mod error;
pub mod ladder;
pub mod params;

pub use error::ParamsError;
pub use ladder::{compute_target, ScalingLadder};
pub use params::{load_ladder, ReplicaParams, ScalerParams};
