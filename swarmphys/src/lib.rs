pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::vector::NVec2;
pub use simulation::states::{Edge, Frame, Node, NodeArena, NodeId, NodeKind, People, PersonOrder};
pub use simulation::forces::{EdgeForce, NodeRepulsion, WeightSource};
pub use simulation::integrator::{apply_force_to_velocity, apply_velocity_to_position, VelocityPolicy};
pub use simulation::lifecycle::DecayPolicy;
pub use simulation::params::Parameters;
pub use simulation::engine::{ForceEngine, PhysicsEngine, Policy, Variant};
pub use simulation::scenario::Scenario;

pub use configuration::config::{EdgeConfig, EngineConfig, FrameConfig, NodeConfig, ScenarioConfig};

pub use error::{ConfigError, ScenarioError};

pub use benchmark::benchmark::bench_frames;
