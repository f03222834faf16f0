pub mod coordinates;
pub mod geo;
pub mod graph;
pub mod route;

pub use coordinates::Coordinates;
pub use graph::{GraphSnapshot, StreetGraph, StreetGraphBuilder};
pub use route::{Preference, Route, RouteCandidate, RouteFeatures, RouteSet};
