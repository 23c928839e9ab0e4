//! Domain types shared by the orchestrator and its collaborators

mod ids;
mod request;
mod track;

pub use ids::{ChannelId, CommunityId, MessageId, PlaybackToken, UserId};
pub use request::{Destination, MessageRef, Origin, PlayRequest};
pub use track::Track;
