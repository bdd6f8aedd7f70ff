//! Constructive heuristics for building initial VRP solutions (spec §4.5).
//!
//! - [`params`] — parameter-point enums (`InitStrategy`, `SortStrategy`,
//!   `HeuristicKind`) and the curated parameter-point lists per problem kind.
//! - [`solomon_i1`] — Basic and Dynamic Solomon-I1 insertion with regret
//!   scoring, generic over any `RouteCapacity` route type.

pub mod params;
pub mod solomon_i1;

pub use params::{curated_parameter_points, HeuristicKind, InitStrategy, ParameterPoint, ProblemKind, SortStrategy};
pub use solomon_i1::{construct_basic, construct_dynamic};
