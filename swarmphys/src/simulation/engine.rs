//! Physics engine contract and its configurable implementation
//!
//! [`PhysicsEngine`] is the boundary the driver talks to once per frame:
//! `initialize_frame`, the relax calls, the update calls, `finalize_frame`.
//! [`ForceEngine`] implements it for every [`Variant`] by expanding the
//! variant into a [`Policy`] bundle instead of duplicating the force code.

use std::collections::HashMap;

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::error::ConfigError;
use crate::simulation::forces::{EdgeForce, NodeRepulsion, WeightSource};
use crate::simulation::integrator::{apply_force_to_velocity, apply_velocity_to_position, VelocityPolicy};
use crate::simulation::lifecycle::{clamp_into, filter_edges, filter_nodes, filter_people, DecayPolicy};
use crate::simulation::params::{Parameters, ENGINE};
use crate::simulation::states::{Edge, Frame, NodeArena, NodeId, People, PersonOrder};
use crate::simulation::vector::NVec2;

/// Velocity damping applied to every person after repulsion (decay variant)
pub const PERSON_DAMPING: f32 = 1.0 / 12.0;

/// Per-frame contract between the driver and a physics engine
///
/// The driver owns the arena and the live collections. Relax calls only touch
/// velocities and hand the collection back unchanged; update calls move,
/// clamp and age the entities and hand back the survivors.
pub trait PhysicsEngine {
    fn initialize_frame(&mut self);

    fn finalize_frame(&mut self);

    fn on_relax_edges(&mut self, nodes: &mut NodeArena, edges: Vec<Edge>) -> Vec<Edge>;

    fn on_relax_nodes(&mut self, nodes: &mut NodeArena, files: Vec<NodeId>) -> Vec<NodeId>;

    fn on_relax_people(&mut self, nodes: &mut NodeArena, people: People) -> People;

    fn on_update_edges(&mut self, edges: Vec<Edge>) -> Vec<Edge>;

    fn on_update_nodes(&mut self, frame: &Frame, nodes: &mut NodeArena, files: Vec<NodeId>) -> Vec<NodeId>;

    fn on_update_people(&mut self, frame: &Frame, nodes: &mut NodeArena, people: People) -> People;

    fn p_start_location(&mut self, frame: &Frame) -> NVec2;

    fn f_start_location(&mut self, frame: &Frame) -> NVec2;

    fn p_start_velocity(&mut self, mass: f32) -> NVec2;

    fn f_start_velocity(&mut self, mass: f32) -> NVec2;

    /// Order the driver should use for its live person collection
    fn person_order(&self) -> PersonOrder;
}

/// The two engine flavours selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Rotated edge forces, remapped person speed, nothing ever expires
    Orbit,
    /// Straight edge forces, hard speed cap with drag, everything fades out
    Decay,
}

impl Variant {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "orbit" | "circle" => Ok(Variant::Orbit),
            "decay" | "wiki" => Ok(Variant::Decay),
            _ => Err(ConfigError::UnknownVariant(name.to_string())),
        }
    }

    /// Variant named by the `engine` option, `Decay` when absent
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        options
            .get(ENGINE)
            .map_or(Ok(Variant::Decay), |name| Self::from_name(name))
    }

    pub fn policy(self, params: &Parameters) -> Policy {
        match self {
            Variant::Orbit => Policy {
                rotate_edge_force: true,
                weight_source: WeightSource::TargetChange,
                person_velocity: VelocityPolicy::CapAndRemap,
                file_velocity: VelocityPolicy::HardCap { drag: None },
                person_damping: None,
                decay: DecayPolicy::Steady,
                person_order: PersonOrder::LifeAscending,
            },
            Variant::Decay => Policy {
                rotate_edge_force: false,
                weight_source: WeightSource::EdgeWeight,
                person_velocity: VelocityPolicy::HardCap { drag: Some(params.drag) },
                file_velocity: VelocityPolicy::HardCap { drag: Some(params.drag) },
                person_damping: Some(PERSON_DAMPING),
                decay: DecayPolicy::Expire,
                person_order: PersonOrder::Insertion,
            },
        }
    }
}

/// Strategy bundle that distinguishes one engine flavour from another
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub rotate_edge_force: bool,
    pub weight_source: WeightSource,
    pub person_velocity: VelocityPolicy,
    pub file_velocity: VelocityPolicy,
    pub person_damping: Option<f32>,
    pub decay: DecayPolicy,
    pub person_order: PersonOrder,
}

/// Force-directed engine driven by a [`Policy`]
pub struct ForceEngine {
    params: Parameters,
    policy: Policy,
    edge_force: EdgeForce,
    repulsion: NodeRepulsion,
    rng: ChaCha12Rng,
    forces: Vec<NVec2>, // per-node force buffer, reused across calls
}

impl ForceEngine {
    /// Build an engine from the flat `name -> value` option map
    /// Fails before any frame can run if an option does not parse
    pub fn setup(options: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let variant = Variant::from_options(options)?;
        let params = Parameters::from_options(options)?;
        debug!(
            variant:? = variant,
            edge_multiplier = params.edge_multiplier,
            calculation_randomizer = params.calculation_randomizer,
            nodes_multiplier = params.nodes_multiplier,
            speed_multiplier = params.speed_multiplier,
            drag = params.drag;
            "Physics engine configured"
        );
        Ok(Self::new(variant, params))
    }

    pub fn new(variant: Variant, params: Parameters) -> Self {
        let policy = variant.policy(&params);
        Self::with_policy(policy, params)
    }

    pub fn with_policy(policy: Policy, params: Parameters) -> Self {
        let rng = match params.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_rng(&mut rand::rng()),
        };
        Self {
            edge_force: EdgeForce {
                edge_multiplier: params.edge_multiplier,
                weight_source: policy.weight_source,
                rotate: policy.rotate_edge_force,
            },
            repulsion: NodeRepulsion {
                nodes_multiplier: params.nodes_multiplier,
                randomizer: params.calculation_randomizer,
            },
            params,
            policy,
            rng,
            forces: Vec::new(),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn edge_force(&self) -> &EdgeForce {
        &self.edge_force
    }

    pub fn repulsion(&self) -> &NodeRepulsion {
        &self.repulsion
    }

    /// Fold pairwise repulsion within `ids` into their velocities
    fn relax_group(&mut self, nodes: &mut NodeArena, ids: &[NodeId]) {
        self.forces.clear();
        self.forces.resize(ids.len(), NVec2::zeros());
        self.repulsion
            .accumulate(ids, nodes, &mut self.rng, &mut self.forces);

        for (&id, &force) in ids.iter().zip(self.forces.iter()) {
            apply_force_to_velocity(&mut nodes[id], force, self.params.speed_multiplier);
        }
    }

    fn start_velocity(&mut self, mass: f32) -> NVec2 {
        NVec2::new(
            mass * self.rng.random_range(-1.0f32..=1.0),
            mass * self.rng.random_range(-1.0f32..=1.0),
        )
    }
}

impl PhysicsEngine for ForceEngine {
    fn initialize_frame(&mut self) {}

    fn finalize_frame(&mut self) {}

    fn on_relax_edges(&mut self, nodes: &mut NodeArena, edges: Vec<Edge>) -> Vec<Edge> {
        let k = self.params.speed_multiplier;
        for edge in &edges {
            let force = self.edge_force.signed(edge, nodes);
            trace!(
                from = nodes[edge.from].name.as_str(),
                to = nodes[edge.to].name.as_str(),
                force = force.norm();
                "Edge force"
            );
            apply_force_to_velocity(&mut nodes[edge.to], force, k);
            apply_force_to_velocity(&mut nodes[edge.from], -force, k);
        }
        edges
    }

    fn on_relax_nodes(&mut self, nodes: &mut NodeArena, files: Vec<NodeId>) -> Vec<NodeId> {
        self.relax_group(nodes, &files);
        files
    }

    fn on_relax_people(&mut self, nodes: &mut NodeArena, people: People) -> People {
        let ids = people.ids();
        self.relax_group(nodes, &ids);
        if let Some(damping) = self.policy.person_damping {
            for &id in &ids {
                nodes[id].v *= damping;
            }
        }
        people
    }

    fn on_update_edges(&mut self, edges: Vec<Edge>) -> Vec<Edge> {
        let before = edges.len();
        let survivors = filter_edges(edges, self.policy.decay);
        trace!(before = before, after = survivors.len(); "Edges updated");
        survivors
    }

    fn on_update_nodes(&mut self, frame: &Frame, nodes: &mut NodeArena, files: Vec<NodeId>) -> Vec<NodeId> {
        let before = files.len();
        let velocity = self.policy.file_velocity;
        let survivors = filter_nodes(files, nodes, self.policy.decay, |node| {
            apply_velocity_to_position(node, velocity);
            clamp_into(node, frame);
        });
        trace!(before = before, after = survivors.len(); "Files updated");
        survivors
    }

    fn on_update_people(&mut self, frame: &Frame, nodes: &mut NodeArena, people: People) -> People {
        let before = people.len();
        let velocity = self.policy.person_velocity;
        let survivors = filter_people(people, nodes, self.policy.decay, |node| {
            apply_velocity_to_position(node, velocity);
            clamp_into(node, frame);
        });
        trace!(before = before, after = survivors.len(); "People updated");
        survivors
    }

    fn p_start_location(&mut self, frame: &Frame) -> NVec2 {
        NVec2::new(
            frame.width() * self.rng.random::<f32>(),
            frame.height() * self.rng.random::<f32>(),
        )
    }

    fn f_start_location(&mut self, frame: &Frame) -> NVec2 {
        frame.center()
    }

    fn p_start_velocity(&mut self, mass: f32) -> NVec2 {
        self.start_velocity(mass)
    }

    fn f_start_velocity(&mut self, mass: f32) -> NVec2 {
        self.start_velocity(mass)
    }

    fn person_order(&self) -> PersonOrder {
        self.policy.person_order
    }
}
