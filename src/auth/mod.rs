// Authorization layer - per-request token verification and permission checks
pub mod policy_gate;

pub use policy_gate::PolicyGate;
