//! Force contributors for the swarm engine
//!
//! Two force laws drive the layout:
//! - [`EdgeForce`]: spring-like pull/push along a person-file edge
//! - [`NodeRepulsion`]: short-range repulsion between nodes of the same kind

use rand::Rng;

use crate::simulation::states::{Edge, NodeArena, NodeId};
use crate::simulation::vector::{rotate_quarter_turn, with_length, NVec2};

/// Squared distance beyond which two nodes stop repelling each other
pub const REPULSION_CUTOFF_SQ: f32 = 10_000.0;

/// Where the strength of an edge force comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSource {
    /// `|edge.weight|`
    EdgeWeight,
    /// `|change_magnitude|` of the edge's file (`to`) node
    TargetChange,
}

/// Spring force along an edge
pub struct EdgeForce {
    pub edge_multiplier: f32,
    pub weight_source: WeightSource,
    pub rotate: bool, // turn the force 90 degrees for orbiting motion
}

impl EdgeForce {
    fn strength(&self, edge: &Edge, nodes: &NodeArena) -> f32 {
        match self.weight_source {
            WeightSource::EdgeWeight => edge.weight.unsigned_abs() as f32,
            WeightSource::TargetChange => nodes[edge.to].change_magnitude.unsigned_abs() as f32,
        }
    }

    /// Force felt by the `to` end of `edge`; the `from` end feels the negation
    ///
    /// The sign of `edge.weight` is not applied here, see [`EdgeForce::signed`].
    /// Coincident endpoints have no direction and yield the zero vector.
    pub fn along_edge(&self, edge: &Edge, nodes: &NodeArena) -> NVec2 {
        let delta = nodes[edge.to].x - nodes[edge.from].x;
        let distance = delta.norm();

        let force = if distance > 0.0 {
            let scaled = with_length(delta, self.strength(edge, nodes));
            // grows as the edge drifts away from its rest length,
            // and fades out as the edge ages
            let delta_distance = (edge.len - distance) / (3.0 * distance) * edge.fade();
            scaled * (delta_distance * self.edge_multiplier)
        } else {
            NVec2::zeros()
        };

        if self.rotate {
            rotate_quarter_turn(force)
        } else {
            force
        }
    }

    /// Signed force on the `to` end, ready to apply as an action/reaction pair
    pub fn signed(&self, edge: &Edge, nodes: &NodeArena) -> NVec2 {
        let force = self.along_edge(edge, nodes);
        if edge.weight < 0 {
            -force
        } else {
            force
        }
    }
}

/// Repulsion between two nodes of the same kind
pub struct NodeRepulsion {
    pub nodes_multiplier: f32,
    pub randomizer: f32, // upper bound of the collision push
}

impl NodeRepulsion {
    /// Force on `a` due to `b`
    ///
    /// - coincident nodes get a random push with both components in `[0, randomizer)`
    /// - nodes closer than the cutoff repel along `a - b`, scaled by `1 / |a - b|^2`
    /// - nodes further apart do not interact
    pub fn between<R: Rng>(&self, a: NVec2, b: NVec2, rng: &mut R) -> NVec2 {
        let delta = a - b;
        let len_sq = delta.norm_squared();

        if len_sq == 0.0 {
            if self.randomizer > 0.0 {
                NVec2::new(
                    rng.random_range(0.0..self.randomizer),
                    rng.random_range(0.0..self.randomizer),
                )
            } else {
                NVec2::zeros()
            }
        } else if len_sq < REPULSION_CUTOFF_SQ {
            delta * (self.nodes_multiplier / len_sq)
        } else {
            NVec2::zeros()
        }
    }

    /// Sum the repulsion felt by every node in `ids` into `out[i]`
    /// Each unordered pair is visited once; `ids[j]` receives the reaction
    pub fn accumulate<R: Rng>(
        &self,
        ids: &[NodeId],
        nodes: &NodeArena,
        rng: &mut R,
        out: &mut [NVec2],
    ) {
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }

        let n = ids.len();
        for i in 0..n {
            let xi = nodes[ids[i]].x;
            for j in (i + 1)..n {
                let xj = nodes[ids[j]].x;
                let f = self.between(xi, xj, rng);
                out[i] += f;
                out[j] -= f;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;
    use crate::simulation::states::Node;

    fn edge_between(from: NVec2, to: NVec2, weight: i32) -> (NodeArena, Edge) {
        let mut nodes = NodeArena::new();
        let p = nodes.insert(Node::person("p").at(from));
        let f = nodes.insert(Node::file("f").at(to));
        (nodes, Edge::new(p, f, weight).with_len(50.0))
    }

    #[test]
    fn rotated_force_is_perpendicular_to_edge() {
        let (nodes, edge) = edge_between(NVec2::zeros(), NVec2::new(100.0, 0.0), 10);
        let force = EdgeForce {
            edge_multiplier: 1.0,
            weight_source: WeightSource::EdgeWeight,
            rotate: true,
        }
        .along_edge(&edge, &nodes);
        assert!(force.x.abs() < 1e-6);
        assert!(force.y.abs() > 0.0);
    }

    #[test]
    fn target_change_supplies_strength() {
        let (mut nodes, edge) = edge_between(NVec2::zeros(), NVec2::new(100.0, 0.0), 1);
        nodes[edge.to].change_magnitude = -20;
        let law = EdgeForce {
            edge_multiplier: 1.0,
            weight_source: WeightSource::TargetChange,
            rotate: false,
        };
        // 20 * (50 - 100) / 300
        let expected = -20.0 / 6.0;
        assert!((law.along_edge(&edge, &nodes).x - expected).abs() < 1e-4);
    }

    #[test]
    fn negative_weight_flips_direction() {
        let (nodes, edge) = edge_between(NVec2::zeros(), NVec2::new(100.0, 0.0), -10);
        let law = EdgeForce {
            edge_multiplier: 1.0,
            weight_source: WeightSource::EdgeWeight,
            rotate: false,
        };
        assert_eq!(law.signed(&edge, &nodes), -law.along_edge(&edge, &nodes));
    }

    #[test]
    fn accumulate_is_action_reaction() {
        let mut nodes = NodeArena::new();
        let ids = vec![
            nodes.insert(Node::file("a").at(NVec2::new(10.0, 10.0))),
            nodes.insert(Node::file("b").at(NVec2::new(20.0, 10.0))),
            nodes.insert(Node::file("c").at(NVec2::new(10.0, 30.0))),
        ];
        let law = NodeRepulsion {
            nodes_multiplier: 1.0,
            randomizer: 0.01,
        };
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let mut out = vec![NVec2::zeros(); ids.len()];
        law.accumulate(&ids, &nodes, &mut rng, &mut out);

        let net: NVec2 = out.iter().sum();
        assert!(net.norm() < 1e-6, "net force not zero: {net:?}");
        assert!(out[0].x < 0.0, "a should be pushed away from b");
    }
}
