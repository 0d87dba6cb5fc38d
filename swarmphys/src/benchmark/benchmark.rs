use std::time::Instant;

use crate::simulation::engine::{ForceEngine, Variant};
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Edge, Frame, Node, NodeId};
use crate::simulation::vector::NVec2;

/// Helper to build a swarm of `n` persons and `n` files, each person linked
/// to one file, on a 1000x1000 frame
fn make_scenario(n: usize, variant: Variant) -> Scenario {
    let params = Parameters {
        seed: Some(42),
        ..Parameters::default()
    };
    let mut scenario = Scenario::new(Frame::new(1000.0, 1000.0), ForceEngine::new(variant, params));

    let mut persons: Vec<NodeId> = Vec::with_capacity(n);
    for i in 0..n {
        let i_f = i as f32;
        // deterministic positions, no rand needed
        let x = NVec2::new(
            500.0 + (i_f * 0.37).sin() * 400.0,
            500.0 + (i_f * 0.13).cos() * 400.0,
        );
        persons.push(scenario.insert_person(Node::person(format!("p{i}")).at(x)));
    }
    for (i, &p) in persons.iter().enumerate() {
        let i_f = i as f32;
        let x = NVec2::new(
            500.0 + (i_f * 0.07).sin() * 450.0,
            500.0 + (i_f * 0.29).cos() * 450.0,
        );
        let mut file = Node::file(format!("f{i}")).at(x);
        file.change_magnitude = 1 + (i % 10) as i32;
        let f = scenario.insert_file(file);
        scenario.link(Edge::new(p, f, 1 + (i % 10) as i32));
    }
    scenario
}

/// Time full frames for a range of swarm sizes
/// Output is CSV so it can be pasted straight into a spreadsheet
pub fn bench_frames() {
    println!("N,decay_ms,orbit_ms");

    for n in [100, 200, 400, 800, 1600] {
        // Small n: average over more frames to smooth noise
        let frames = if n <= 400 { 20 } else { 3 };

        let mut decay = make_scenario(n, Variant::Decay);
        decay.step(); // warm-up
        let t0 = Instant::now();
        for _ in 0..frames {
            decay.step();
        }
        let ms_decay = t0.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        let mut orbit = make_scenario(n, Variant::Orbit);
        orbit.step();
        let t1 = Instant::now();
        for _ in 0..frames {
            orbit.step();
        }
        let ms_orbit = t1.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!("{},{:.6},{:.6}", n, ms_decay, ms_orbit);
    }
}
