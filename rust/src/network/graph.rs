//! Arena-backed network graph with load-time validation.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::cost_model::{normalize_label, InfraType};
use crate::error::PlanningError;
use crate::models::{Building, Segment};

use super::arena::{NodeArena, NodeId};

/// Building category, ordered by connection priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildingCategory {
    Residential,
    School,
    Hospital,
}

impl BuildingCategory {
    /// Priority class: hospital (3) > school (2) > residential (1). 0 means "no building".
    pub fn priority_class(&self) -> u8 {
        match self {
            BuildingCategory::Residential => 1,
            BuildingCategory::School => 2,
            BuildingCategory::Hospital => 3,
        }
    }

    /// Per-house weight used for the reported priority score.
    pub fn weight(&self) -> f64 {
        match self {
            BuildingCategory::Residential => 10.0,
            BuildingCategory::School => 50.0,
            BuildingCategory::Hospital => 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingCategory::Residential => "residential",
            BuildingCategory::School => "school",
            BuildingCategory::Hospital => "hospital",
        }
    }
}

impl fmt::Display for BuildingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingCategory {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "residential" | "habitation" | "house" => Ok(BuildingCategory::Residential),
            "school" | "ecole" => Ok(BuildingCategory::School),
            "hospital" | "hopital" => Ok(BuildingCategory::Hospital),
            _ => Err(PlanningError::InvalidCategory(s.to_string())),
        }
    }
}

/// A validated building attached to a graph node.
#[derive(Clone, Debug)]
pub struct SiteBuilding {
    pub id: String,
    pub node: NodeId,
    pub category: BuildingCategory,
    pub houses: u32,
}

impl SiteBuilding {
    pub fn priority_score(&self) -> f64 {
        self.category.weight() * self.houses as f64
    }
}

/// A validated segment between two graph nodes.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: String,
    pub a: NodeId,
    pub b: NodeId,
    pub length_m: f64,
    pub infra: InfraType,
}

impl Edge {
    /// The endpoint opposite `node`.
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if node == self.a {
            self.b
        } else {
            self.a
        }
    }
}

/// Undirected network of candidate segments rooted at the source substation.
///
/// Nodes and edges live in flat vectors; "connected" state is always held by the
/// caller as a per-node flag vector, never inside the graph.
#[derive(Clone, Debug)]
pub struct NetworkGraph {
    nodes: NodeArena,
    source: NodeId,
    edges: Vec<Edge>,
    buildings: Vec<SiteBuilding>,
}

impl NetworkGraph {
    /// Build and validate a graph from loader records.
    ///
    /// # Errors
    /// * `InvalidType` / `InvalidCategory` for unknown labels
    /// * `InvalidSegment` for non-positive lengths or self-loops
    /// * `DuplicateId` for repeated building or segment ids
    /// * `EmptyNetwork` when segments and buildings do not justify each other
    /// * `Disconnected` when a building or segment cannot be reached from the source
    pub fn new(
        buildings: &[Building],
        segments: &[Segment],
        source: &str,
    ) -> Result<Self, PlanningError> {
        if source.trim().is_empty() {
            return Err(PlanningError::InvalidConfig(
                "source node id is empty".to_string(),
            ));
        }

        let mut nodes = NodeArena::with_capacity(segments.len() + 1);
        let source_id = nodes.node(source);

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut edges = Vec::with_capacity(segments.len());
        for segment in segments {
            if !seen.insert(segment.id.as_str()) {
                return Err(PlanningError::DuplicateId {
                    kind: "segment",
                    id: segment.id.clone(),
                });
            }
            if !segment.length_m.is_finite() || segment.length_m <= 0.0 {
                return Err(PlanningError::InvalidSegment {
                    id: segment.id.clone(),
                    reason: format!("length must be positive, got {}", segment.length_m),
                });
            }
            if segment.node_a == segment.node_b {
                return Err(PlanningError::InvalidSegment {
                    id: segment.id.clone(),
                    reason: format!("both endpoints are {}", segment.node_a),
                });
            }
            let infra: InfraType = segment.infra_type.parse()?;
            let a = nodes.node(&segment.node_a);
            let b = nodes.node(&segment.node_b);
            nodes.attach_segment(edges.len(), a, b);
            edges.push(Edge {
                id: segment.id.clone(),
                a,
                b,
                length_m: segment.length_m,
                infra,
            });
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut sites = Vec::with_capacity(buildings.len());
        for building in buildings {
            if !seen.insert(building.id.as_str()) {
                return Err(PlanningError::DuplicateId {
                    kind: "building",
                    id: building.id.clone(),
                });
            }
            let category: BuildingCategory = building.category.parse()?;
            let node = nodes.node(&building.node);
            nodes.attach_building(sites.len(), node);
            sites.push(SiteBuilding {
                id: building.id.clone(),
                node,
                category,
                houses: building.houses,
            });
        }

        if edges.is_empty() {
            if let Some(stranded) = sites.iter().find(|b| b.node != source_id) {
                return Err(PlanningError::EmptyNetwork(format!(
                    "no segments to connect building {}",
                    stranded.id
                )));
            }
        } else if sites.iter().all(|b| b.node == source_id) {
            return Err(PlanningError::EmptyNetwork(format!(
                "{} segments but no buildings beyond the source to serve",
                edges.len()
            )));
        }

        let graph = Self {
            nodes,
            source: source_id,
            edges,
            buildings: sites,
        };
        graph.check_connected()?;
        Ok(graph)
    }

    /// Breadth-first reachability over every segment.
    fn check_connected(&self) -> Result<(), PlanningError> {
        let all_built = vec![true; self.edges.len()];
        let reached = self.connected_component(&all_built);

        let mut unreachable: Vec<String> = self
            .buildings
            .iter()
            .filter(|b| !reached[b.node as usize])
            .map(|b| b.id.clone())
            .collect();
        unreachable.extend(
            self.edges
                .iter()
                .filter(|e| !reached[e.a as usize] && !reached[e.b as usize])
                .map(|e| e.id.clone()),
        );

        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::Disconnected {
                source_node: self.node_name(self.source).to_string(),
                unreachable,
            })
        }
    }

    /// Nodes reachable from the source using only segments flagged in `built`.
    ///
    /// `built` is indexed by segment position; the source is always included.
    pub fn connected_component(&self, built: &[bool]) -> Vec<bool> {
        let mut reached = vec![false; self.nodes.len()];
        reached[self.source as usize] = true;
        let mut queue = VecDeque::from([self.source]);

        while let Some(node) = queue.pop_front() {
            for &edge_idx in self.nodes.incident(node) {
                if !built.get(edge_idx).copied().unwrap_or(false) {
                    continue;
                }
                let next = self.edges[edge_idx].other_end(node);
                if !reached[next as usize] {
                    reached[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }

        reached
    }

    /// Whether a segment could be started given the segments already built.
    pub fn is_eligible(&self, edge_idx: usize, built: &[bool]) -> bool {
        let connected = self.connected_component(built);
        self.touches_connected(edge_idx, &connected)
    }

    /// Whether either endpoint of a segment is flagged in `connected`.
    #[inline]
    pub fn touches_connected(&self, edge_idx: usize, connected: &[bool]) -> bool {
        let edge = &self.edges[edge_idx];
        connected[edge.a as usize] || connected[edge.b as usize]
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_name(&self, id: NodeId) -> &str {
        self.nodes.name(id)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes.lookup(name)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Segment indices touching a node.
    pub fn incident(&self, node: NodeId) -> &[usize] {
        self.nodes.incident(node)
    }

    pub fn buildings(&self) -> &[SiteBuilding] {
        &self.buildings
    }

    /// Buildings attached to a node.
    pub fn buildings_at(&self, node: NodeId) -> impl Iterator<Item = &SiteBuilding> {
        self.nodes
            .buildings(node)
            .iter()
            .map(move |&idx| &self.buildings[idx])
    }

    /// Highest priority class among buildings at a node (0 if none).
    pub fn node_priority(&self, node: NodeId) -> u8 {
        self.buildings_at(node)
            .map(|b| b.category.priority_class())
            .max()
            .unwrap_or(0)
    }

    /// Hospitals, sorted by id for deterministic processing.
    pub fn hospitals(&self) -> Vec<&SiteBuilding> {
        let mut hospitals: Vec<&SiteBuilding> = self
            .buildings
            .iter()
            .filter(|b| b.category == BuildingCategory::Hospital)
            .collect();
        hospitals.sort_by(|a, b| a.id.cmp(&b.id));
        hospitals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: &str, a: &str, b: &str, length: f64, infra: &str) -> Segment {
        Segment::new(
            id.to_string(),
            a.to_string(),
            b.to_string(),
            length,
            infra.to_string(),
        )
    }

    fn bldg(id: &str, node: &str, category: &str) -> Building {
        Building::new(id.to_string(), node.to_string(), category.to_string(), 1)
    }

    fn star_network() -> (Vec<Building>, Vec<Segment>) {
        let buildings = vec![
            bldg("home", "n1", "residential"),
            bldg("school", "n3", "école"),
            bldg("hospital", "n2", "hôpital"),
        ];
        let segments = vec![
            seg("s1", "src", "n1", 10.0, "aerial"),
            seg("s2", "src", "n2", 20.0, "conduit"),
            seg("s3", "n1", "n3", 5.0, "semi-aerial"),
        ];
        (buildings, segments)
    }

    #[test]
    fn test_load_valid_network() {
        let (buildings, segments) = star_network();
        let graph = NetworkGraph::new(&buildings, &segments, "src").unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node_name(graph.source()), "src");
        assert_eq!(graph.incident(graph.source()).len(), 2);
        assert_eq!(graph.hospitals().len(), 1);
        assert_eq!(graph.edge(2).infra, InfraType::SemiAerial);

        let n3 = graph.node_id("n3").unwrap();
        assert_eq!(graph.node_priority(n3), 2);
    }

    #[test]
    fn test_connected_component_tracks_built_segments() {
        let (buildings, segments) = star_network();
        let graph = NetworkGraph::new(&buildings, &segments, "src").unwrap();
        let n1 = graph.node_id("n1").unwrap() as usize;
        let n3 = graph.node_id("n3").unwrap() as usize;

        let nothing = vec![false; 3];
        let reached = graph.connected_component(&nothing);
        assert!(reached[graph.source() as usize]);
        assert!(!reached[n1]);

        // s3 alone is built but floats off the source
        let only_s3 = vec![false, false, true];
        let reached = graph.connected_component(&only_s3);
        assert!(!reached[n1]);
        assert!(!reached[n3]);

        let s1_s3 = vec![true, false, true];
        let reached = graph.connected_component(&s1_s3);
        assert!(reached[n1]);
        assert!(reached[n3]);
    }

    #[test]
    fn test_is_eligible() {
        let (buildings, segments) = star_network();
        let graph = NetworkGraph::new(&buildings, &segments, "src").unwrap();

        let nothing = vec![false; 3];
        assert!(graph.is_eligible(0, &nothing));
        assert!(graph.is_eligible(1, &nothing));
        assert!(!graph.is_eligible(2, &nothing));

        let s1 = vec![true, false, false];
        assert!(graph.is_eligible(2, &s1));
    }

    #[test]
    fn test_disconnected_building() {
        let buildings = vec![bldg("home", "n1", "residential"), bldg("far", "n9", "school")];
        let segments = vec![seg("s1", "src", "n1", 10.0, "aerial")];
        match NetworkGraph::new(&buildings, &segments, "src") {
            Err(PlanningError::Disconnected { unreachable, .. }) => {
                assert_eq!(unreachable, vec!["far".to_string()]);
            }
            other => panic!("expected Disconnected, got {:?}", other),
        }
    }

    #[test]
    fn test_floating_segment_is_disconnected() {
        let buildings = vec![bldg("home", "n1", "residential")];
        let segments = vec![
            seg("s1", "src", "n1", 10.0, "aerial"),
            seg("island", "x1", "x2", 4.0, "aerial"),
        ];
        match NetworkGraph::new(&buildings, &segments, "src") {
            Err(PlanningError::Disconnected { unreachable, .. }) => {
                assert_eq!(unreachable, vec!["island".to_string()]);
            }
            other => panic!("expected Disconnected, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_labels() {
        let buildings = vec![bldg("home", "n1", "residential")];
        let segments = vec![seg("s1", "src", "n1", 10.0, "copper")];
        assert_eq!(
            NetworkGraph::new(&buildings, &segments, "src").unwrap_err(),
            PlanningError::InvalidType("copper".to_string())
        );

        let buildings = vec![bldg("mall", "n1", "shopping")];
        let segments = vec![seg("s1", "src", "n1", 10.0, "aerial")];
        assert_eq!(
            NetworkGraph::new(&buildings, &segments, "src").unwrap_err(),
            PlanningError::InvalidCategory("shopping".to_string())
        );
    }

    #[test]
    fn test_invalid_segments() {
        let buildings = vec![bldg("home", "n1", "residential")];

        let zero = vec![seg("s1", "src", "n1", 0.0, "aerial")];
        assert!(matches!(
            NetworkGraph::new(&buildings, &zero, "src"),
            Err(PlanningError::InvalidSegment { .. })
        ));

        let looped = vec![seg("s1", "n1", "n1", 3.0, "aerial")];
        assert!(matches!(
            NetworkGraph::new(&buildings, &looped, "src"),
            Err(PlanningError::InvalidSegment { .. })
        ));

        let duplicated = vec![
            seg("s1", "src", "n1", 3.0, "aerial"),
            seg("s1", "src", "n1", 4.0, "aerial"),
        ];
        assert_eq!(
            NetworkGraph::new(&buildings, &duplicated, "src").unwrap_err(),
            PlanningError::DuplicateId {
                kind: "segment",
                id: "s1".to_string()
            }
        );
    }

    #[test]
    fn test_empty_network_rules() {
        // Nothing at all is the trivial valid case
        assert!(NetworkGraph::new(&[], &[], "src").is_ok());

        // A building sitting on the substation needs no segments
        let on_source = vec![bldg("depot", "src", "residential")];
        assert!(NetworkGraph::new(&on_source, &[], "src").is_ok());

        // Buildings but no segments
        let buildings = vec![bldg("home", "n1", "residential")];
        assert!(matches!(
            NetworkGraph::new(&buildings, &[], "src"),
            Err(PlanningError::EmptyNetwork(_))
        ));

        // Segments with nothing to serve
        let segments = vec![seg("s1", "src", "n1", 10.0, "aerial")];
        assert!(matches!(
            NetworkGraph::new(&[], &segments, "src"),
            Err(PlanningError::EmptyNetwork(_))
        ));

        // Segments whose only building already sits on the substation
        assert!(matches!(
            NetworkGraph::new(&on_source, &segments, "src"),
            Err(PlanningError::EmptyNetwork(_))
        ));
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(
            "Habitation".parse::<BuildingCategory>().unwrap(),
            BuildingCategory::Residential
        );
        assert_eq!(
            "ECOLE".parse::<BuildingCategory>().unwrap(),
            BuildingCategory::School
        );
        assert_eq!(
            "Hôpital".parse::<BuildingCategory>().unwrap(),
            BuildingCategory::Hospital
        );
        assert!(BuildingCategory::Hospital.priority_class() > BuildingCategory::School.priority_class());
        assert!(BuildingCategory::School.priority_class() > BuildingCategory::Residential.priority_class());
    }
}
