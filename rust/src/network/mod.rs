//! Network graph of candidate segments rooted at the source substation.

mod arena;
mod graph;
mod paths;

pub use arena::{NodeArena, NodeId};
pub use graph::{BuildingCategory, Edge, NetworkGraph, SiteBuilding};
pub use paths::ShortestPathTree;
