//! Frame driver: owns the swarm and steps it frame by frame
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - the visible `Frame`
//! - the node arena and the live edge / file / person collections
//! - the physics engine the frames are run through
//!
//! `Scenario::step` calls the engine phases in their fixed order; nothing
//! else in the crate decides the order of a frame.

use std::collections::HashMap;
use std::mem;

use log::{debug, info};

use crate::configuration::config::{EdgeConfig, FrameConfig, NodeConfig, ScenarioConfig};
use crate::error::ScenarioError;
use crate::simulation::engine::{ForceEngine, PhysicsEngine};
use crate::simulation::lifecycle::drop_orphaned_edges;
use crate::simulation::states::{Edge, Frame, Node, NodeArena, NodeId, NodeKind, People};
use crate::simulation::vector::NVec2;

pub struct Scenario<E: PhysicsEngine = ForceEngine> {
    pub frame: Frame,
    pub nodes: NodeArena,
    pub edges: Vec<Edge>,
    pub files: Vec<NodeId>,
    pub people: People,
    pub engine: E,
    pub frames_run: u64,
}

impl<E: PhysicsEngine> Scenario<E> {
    pub fn new(frame: Frame, engine: E) -> Self {
        let people = People::new(engine.person_order());
        Self {
            frame,
            nodes: NodeArena::new(),
            edges: Vec::new(),
            files: Vec::new(),
            people,
            engine,
            frames_run: 0,
        }
    }

    /// Add a person exactly as given
    pub fn insert_person(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.people.push(id, &self.nodes);
        id
    }

    /// Add a file exactly as given
    pub fn insert_file(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.files.push(id);
        id
    }

    /// Add a new person at the engine's start location and velocity
    pub fn admit_person(&mut self, mut node: Node) -> NodeId {
        node.x = self.engine.p_start_location(&self.frame);
        node.v = self.engine.p_start_velocity(node.m);
        self.insert_person(node)
    }

    /// Add a new file at the engine's start location and velocity
    pub fn admit_file(&mut self, mut node: Node) -> NodeId {
        node.x = self.engine.f_start_location(&self.frame);
        node.v = self.engine.f_start_velocity(node.m);
        self.insert_file(node)
    }

    pub fn link(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Node is still in its live collection
    pub fn is_live(&self, id: NodeId) -> bool {
        match self.nodes.get(id).map(|n| n.kind) {
            Some(NodeKind::Person) => self.people.contains(id),
            Some(NodeKind::File) => self.files.contains(&id),
            None => false,
        }
    }

    /// A person changed a file again: restore both to full life, record the
    /// change size on the file, and refresh their edge or link a new one
    ///
    /// Expired nodes are never revived; returns `false` and changes nothing
    /// if either end is no longer live.
    pub fn record_change(&mut self, person: NodeId, file: NodeId, weight: i32) -> bool {
        if !(self.is_live(person) && self.is_live(file)) {
            debug!(person = person.0, file = file.0; "Change on expired node ignored");
            return false;
        }

        self.nodes[person].freshen();
        let target = &mut self.nodes[file];
        target.freshen();
        target.change_magnitude = weight;

        match self
            .edges
            .iter()
            .position(|e| e.from == person && e.to == file)
        {
            Some(i) => {
                let edge = &mut self.edges[i];
                edge.weight = weight;
                edge.freshen();
            }
            None => self.link(Edge::new(person, file, weight)),
        }
        true
    }

    /// Nothing is left alive to simulate
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.files.is_empty() && self.people.is_empty()
    }

    /// Run one frame through every engine phase, in order
    pub fn step(&mut self) {
        let order = self.people.order();
        let mut edges = mem::take(&mut self.edges);
        let mut files = mem::take(&mut self.files);
        let mut people = mem::replace(&mut self.people, People::new(order));

        self.engine.initialize_frame();

        edges = self.engine.on_relax_edges(&mut self.nodes, edges);
        files = self.engine.on_relax_nodes(&mut self.nodes, files);
        people = self.engine.on_relax_people(&mut self.nodes, people);

        self.edges = self.engine.on_update_edges(edges);
        self.files = self.engine.on_update_nodes(&self.frame, &mut self.nodes, files);
        self.people = self.engine.on_update_people(&self.frame, &mut self.nodes, people);

        let orphaned = drop_orphaned_edges(&mut self.edges, &self.files, &self.people);
        if orphaned > 0 {
            debug!(dropped = orphaned; "Dropped edges of expired nodes");
        }

        self.engine.finalize_frame();
        self.frames_run += 1;
    }

    /// Step up to `frames` times, stopping early once nothing is alive
    /// Returns the number of frames actually run
    pub fn run(&mut self, frames: u32) -> u32 {
        for i in 0..frames {
            if self.is_empty() {
                info!(frame = i; "Simulation emptied, stopping early");
                return i;
            }
            self.step();
            debug!(
                frame = self.frames_run,
                edges = self.edges.len(),
                files = self.files.len(),
                people = self.people.len();
                "Frame done"
            );
        }
        frames
    }
}

impl Scenario<ForceEngine> {
    /// Build a runnable scenario from its configuration
    pub fn build(cfg: &ScenarioConfig) -> Result<Self, ScenarioError> {
        let FrameConfig { width, height } = cfg.frame;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ScenarioError::BadFrame { width, height });
        }

        let engine = ForceEngine::setup(&cfg.engine.to_options()?)?;
        let mut scenario = Scenario::new(Frame::new(width, height), engine);
        let mut by_name: HashMap<&str, NodeId> = HashMap::new();

        for nc in &cfg.persons {
            let id = scenario.insert_configured(nc, Node::person(&nc.name))?;
            if by_name.insert(&nc.name, id).is_some() {
                return Err(ScenarioError::DuplicateNode(nc.name.clone()));
            }
        }
        for nc in &cfg.files {
            let id = scenario.insert_configured(nc, Node::file(&nc.name))?;
            if by_name.insert(&nc.name, id).is_some() {
                return Err(ScenarioError::DuplicateNode(nc.name.clone()));
            }
        }
        for ec in &cfg.edges {
            let edge = scenario.resolve_edge(ec, &by_name)?;
            scenario.link(edge);
        }

        info!(
            persons = scenario.people.len(),
            files = scenario.files.len(),
            edges = scenario.edges.len();
            "Scenario built"
        );
        Ok(scenario)
    }

    fn insert_configured(&mut self, nc: &NodeConfig, mut node: Node) -> Result<NodeId, ScenarioError> {
        if let Some(m) = nc.m {
            node.m = finite(&nc.name, "m", m)?;
        }
        if let Some(max_speed) = nc.max_speed {
            node.max_speed = finite(&nc.name, "max_speed", max_speed)?;
        }
        if let Some(life) = nc.life {
            node.life = life.min(node.life_init);
        }
        if let Some(change) = nc.change {
            node.change_magnitude = change;
        }

        let kind = node.kind;
        node.x = match &nc.x {
            Some(x) => vec2(&nc.name, "x", x)?,
            None => match kind {
                NodeKind::Person => self.engine.p_start_location(&self.frame),
                NodeKind::File => self.engine.f_start_location(&self.frame),
            },
        };
        node.x = self.frame.clamp(node.x);
        node.v = match &nc.v {
            Some(v) => vec2(&nc.name, "v", v)?,
            None => match kind {
                NodeKind::Person => self.engine.p_start_velocity(node.m),
                NodeKind::File => self.engine.f_start_velocity(node.m),
            },
        };

        Ok(match kind {
            NodeKind::Person => self.insert_person(node),
            NodeKind::File => self.insert_file(node),
        })
    }

    fn resolve_edge(&self, ec: &EdgeConfig, by_name: &HashMap<&str, NodeId>) -> Result<Edge, ScenarioError> {
        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ScenarioError::UnknownNode(name.to_string()))
        };
        let from = lookup(&ec.from)?;
        let to = lookup(&ec.to)?;
        if self.nodes[from].kind != NodeKind::Person || self.nodes[to].kind != NodeKind::File {
            return Err(ScenarioError::EdgeKinds {
                from: ec.from.clone(),
                to: ec.to.clone(),
            });
        }

        let mut edge = Edge::new(from, to, ec.weight);
        if let Some(len) = ec.len {
            edge.len = finite(&format!("{} -> {}", ec.from, ec.to), "len", len)?;
        }
        if let Some(life) = ec.life {
            edge.life = life.min(edge.life_init);
        }
        Ok(edge)
    }
}

fn finite(name: &str, field: &'static str, value: f32) -> Result<f32, ScenarioError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScenarioError::NotFinite {
            name: name.to_string(),
            field,
        })
    }
}

fn vec2(name: &str, field: &'static str, xs: &[f32]) -> Result<NVec2, ScenarioError> {
    match xs {
        [x, y] => Ok(NVec2::new(finite(name, field, *x)?, finite(name, field, *y)?)),
        _ => Err(ScenarioError::BadVector {
            name: name.to_string(),
            field,
            len: xs.len(),
        }),
    }
}
