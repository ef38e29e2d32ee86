pub mod chat;
pub mod gesture;
pub mod input;
pub mod mutation;
pub mod session;
pub mod snapshot;
pub mod tools;

pub use chat::{ChatLog, ChatMessage, RequestToken, Sender};
pub use gesture::{Gesture, GestureMachine};
pub use input::InputEvent;
pub use mutation::EditMutation;
pub use session::{OutputKind, PendingRequest, Session};
pub use snapshot::SceneSnapshot;
pub use tools::ToolKind;
