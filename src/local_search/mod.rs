//! Local search neighborhood operators for improving constructed VRP
//! solutions (spec §4.6, §4.7).
//!
//! - [`two_opt_improve()`] — intra-route edge reversal
//! - [`or_opt_improve()`] — intra-route short-segment relocation
//! - [`relocate_intra_improve()`] — intra-route single-job relocation
//! - [`relocate_improve()`] — inter-route single-job relocation
//! - [`cross_exchange_improve()`] — inter-route tail-segment swap (2-opt*)
//! - [`run_local_search()`] — fixed-order round-robin driver over all of the
//!   above, bounded by depth and wall-clock deadline

pub mod cross_exchange;
pub mod driver;
pub mod or_opt;
pub mod relocate;
pub mod two_opt;

pub use cross_exchange::cross_exchange_improve;
pub use driver::{run_local_search, tw_route_is_feasible};
pub use or_opt::or_opt_improve;
pub use relocate::{relocate_improve, relocate_intra_improve};
pub use two_opt::two_opt_improve;
