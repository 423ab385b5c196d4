pub mod ornstein_uhlenbeck;
pub mod wiener;

pub use ornstein_uhlenbeck::OrnsteinUhlenbeckProcess;
pub use wiener::WienerProcess;
