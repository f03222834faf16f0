pub mod geodesy;
pub mod graph_provider;
pub mod overpass;
pub mod route_generator;
