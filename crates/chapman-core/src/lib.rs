//! Taxonomy and primitives for closed-form propagation of Ito diffusions:
//! advance a state sample, or its full Gaussian law, from one time to
//! another in a single exact step, with no numerical integration.

pub mod cache;
pub mod distribution;
pub mod error;
pub mod linalg;
pub mod process;
pub mod time;
pub mod variates;

// Core types
pub use distribution::Gaussian;
pub use error::{Error, Result};
pub use time::{Time, TimePoint, TimeUnit};
pub use variates::VariateGenerator;

// Capability traits and the generic sampler built on them
pub use process::{
    propagate_via_distribution, ItoProcess, MarkovProcess, Process, SolvedItoMarkovProcess,
    SolvedItoProcess,
};

// Memo slots
pub use cache::{DistributionCache, FactorCache};
