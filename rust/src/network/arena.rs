//! Node arena: dense ids for the loader's node references.
//!
//! Every per-node fact the planner needs (name, incident segments, attached
//! buildings) lives in a flat vector indexed by [`NodeId`]. Nodes hold no
//! references to each other; segments and buildings are referred to by index.

use rustc_hash::FxHashMap;

/// Dense node id (u32 keeps per-node vectors compact).
pub type NodeId = u32;

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    index: FxHashMap<String, NodeId>,
    names: Vec<String>,
    incident: Vec<Vec<usize>>,
    buildings: Vec<Vec<usize>>,
}

impl NodeArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            names: Vec::with_capacity(capacity),
            incident: Vec::with_capacity(capacity),
            buildings: Vec::with_capacity(capacity),
        }
    }

    /// Node for `name`, allocated with empty lists on first sight.
    pub fn node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len() as NodeId;
        self.names.push(name.to_string());
        self.incident.push(Vec::new());
        self.buildings.push(Vec::new());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Register segment `edge_idx` on both of its endpoints.
    pub fn attach_segment(&mut self, edge_idx: usize, a: NodeId, b: NodeId) {
        self.incident[a as usize].push(edge_idx);
        self.incident[b as usize].push(edge_idx);
    }

    pub fn attach_building(&mut self, building_idx: usize, node: NodeId) {
        self.buildings[node as usize].push(building_idx);
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> &str {
        self.names.get(id as usize).map_or("?", String::as_str)
    }

    #[inline]
    pub fn incident(&self, id: NodeId) -> &[usize] {
        &self.incident[id as usize]
    }

    #[inline]
    pub fn buildings(&self, id: NodeId) -> &[usize] {
        &self.buildings[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
