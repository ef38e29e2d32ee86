pub mod directive;
pub mod mock;
pub mod request;
pub mod summary;

pub use directive::{Directive, MAX_IMAGES, find_directive};
pub use mock::{FALLBACK_MESSAGE, MockCollaborator};
pub use request::{AssistRequest, AssistResponse, Collaborator, EntitySpec};
pub use summary::{EntitySummary, SummaryDetail};
