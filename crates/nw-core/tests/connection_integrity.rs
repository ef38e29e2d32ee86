//! Integration tests: connection graph integrity under arbitrary edits.
//!
//! Drives a `Document` through long pseudo-random sequences of connect,
//! disconnect, delete and create operations and checks after every step that
//! edges, weighted inputs, lanes and selection still agree.

use nw_core::{ConnectionRejection, Document, EntityId, EntityKind, Lane, Payload, Point};

/// Small deterministic generator so failures reproduce exactly.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn spawn(doc: &mut Document, rng: &mut Lcg) -> EntityId {
    let kind = EntityKind::ALL[rng.below(EntityKind::ALL.len())];
    let lane = if rng.below(2) == 0 { Lane::Nodes } else { Lane::Assets };
    doc.create_entity(Payload::default_for(kind), Point::ZERO, lane)
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = Lcg(seed);
    let mut doc = Document::default();
    let mut ids: Vec<EntityId> = (0..6).map(|_| spawn(&mut doc, &mut rng)).collect();

    for step in 0..steps {
        // Include dead ids on purpose: every operation must tolerate them.
        let a = ids[rng.below(ids.len())];
        let b = ids[rng.below(ids.len())];
        match rng.below(10) {
            0..=4 => {
                let _ = doc.connect(a, b);
            }
            5 | 6 => {
                doc.disconnect(a, b);
            }
            7 => {
                doc.delete_entity(a);
            }
            8 => {
                let _ = doc.toggle_selection(a);
            }
            _ => ids.push(spawn(&mut doc, &mut rng)),
        }
        assert!(
            doc.is_consistent(),
            "inconsistent after step {step} (seed {seed})"
        );
    }
}

#[test]
fn random_sequences_stay_consistent() {
    for seed in [1, 7, 42, 1234, 0xDEAD_BEEF] {
        run_sequence(seed, 400);
    }
}

#[test]
fn deleted_endpoint_rejects_connect() {
    let mut doc = Document::default();
    let text = doc.create_entity(Payload::default_for(EntityKind::Text), Point::ZERO, Lane::Nodes);
    let mix = doc.create_entity(Payload::default_for(EntityKind::Mix), Point::ZERO, Lane::Nodes);
    doc.delete_entity(text);
    assert_eq!(
        doc.connect(text, mix),
        Err(ConnectionRejection::UnknownEndpoint)
    );
    assert!(doc.entity(mix).unwrap().payload().inputs().is_empty());
}

#[test]
fn disconnect_all_clears_weighted_inputs_downstream() {
    let mut doc = Document::default();
    let a = doc.create_entity(Payload::default_for(EntityKind::Text), Point::ZERO, Lane::Nodes);
    let b = doc.create_entity(Payload::default_for(EntityKind::Image), Point::ZERO, Lane::Nodes);
    let mix = doc.create_entity(Payload::default_for(EntityKind::Mix), Point::ZERO, Lane::Nodes);
    let out = doc.create_entity(
        Payload::default_for(EntityKind::AiOutputImage),
        Point::ZERO,
        Lane::Assets,
    );
    doc.connect(a, mix).unwrap();
    doc.connect(b, mix).unwrap();
    doc.connect(mix, out).unwrap();

    assert_eq!(doc.disconnect_all(mix), 3);
    assert_eq!(doc.connection_count(), 0);
    assert!(doc.entity(mix).unwrap().payload().inputs().is_empty());
    assert!(doc.is_consistent());
}
