//! Integration tests: the collaborator contract as seen by a host.

use nw_assist::{AssistRequest, AssistResponse, Collaborator, EntitySummary, MockCollaborator};
use nw_core::{Document, EntityKind, Lane, Payload, Point};

/// A collaborator that always answers the same thing.
struct Echo;

impl Collaborator for Echo {
    fn respond(&self, request: &AssistRequest) -> AssistResponse {
        AssistResponse::Message(format!("echo: {}", request.prompt))
    }
}

#[test]
fn collaborators_are_object_safe() {
    let all: Vec<Box<dyn Collaborator>> = vec![Box::new(Echo), Box::new(MockCollaborator::new())];
    let req = AssistRequest {
        prompt: "hi".into(),
        context: vec![],
    };
    let answers: Vec<AssistResponse> = all.iter().map(|c| c.respond(&req)).collect();
    assert_eq!(answers[0], AssistResponse::Message("echo: hi".into()));
    assert!(matches!(answers[1], AssistResponse::Message(_)));
}

#[test]
fn request_serializes_for_the_host() {
    let mut doc = Document::default();
    let id = doc.create_entity(
        Payload::Color {
            color: nw_core::Color::from_hex("#ff0000").unwrap(),
            opacity: 40,
        },
        Point::ZERO,
        Lane::Nodes,
    );
    let req = AssistRequest {
        prompt: "describe".into(),
        context: vec![EntitySummary::of(doc.entity(id).unwrap())],
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["prompt"], "describe");
    assert_eq!(json["context"][0]["id"], id.raw());
    assert_eq!(json["context"][0]["kind"], "color");
    assert_eq!(json["context"][0]["detail"]["type"], "color");
    assert_eq!(json["context"][0]["detail"]["color"], "#FF0000");
    assert_eq!(json["context"][0]["detail"]["opacity"], 40);
}

#[test]
fn response_serializes_with_type_tag() {
    let resp = MockCollaborator::new().respond(&AssistRequest {
        prompt: "@3d".into(),
        context: vec![],
    });
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["type"], "new-entities");
    assert_eq!(json["value"][0]["payload"]["kind"], EntityKind::AiOutput3d.name());
}

#[test]
fn host_backend_response_parses() {
    let json = r#"{
        "type": "new-entities",
        "value": [
            {"payload": {"kind": "generic-asset", "label": "moodboard"}},
            {"payload": {"kind": "text", "content": "a caption"}}
        ]
    }"#;
    let resp: AssistResponse = serde_json::from_str(json).unwrap();
    let AssistResponse::NewEntities(specs) = resp else {
        panic!("expected new entities");
    };
    let kinds: Vec<EntityKind> = specs.iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, vec![EntityKind::GenericAsset, EntityKind::Text]);

    let msg: AssistResponse = serde_json::from_str(r#"{"type":"message","value":"ok"}"#).unwrap();
    assert_eq!(msg, AssistResponse::Message("ok".into()));
}
