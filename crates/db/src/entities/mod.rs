//! Database entities.

pub mod follow_edge;
pub mod like;
pub mod media;
pub mod post;
pub mod user;

pub use follow_edge::Entity as FollowEdge;
pub use like::Entity as Like;
pub use media::Entity as Media;
pub use post::Entity as Post;
pub use user::Entity as User;
