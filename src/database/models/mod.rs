pub mod activity;
pub mod collaborator;
pub mod itinerary;
pub mod notification;
pub mod user;

pub use activity::Activity;
pub use collaborator::{Collaborator, CollaboratorWithUser, Role};
pub use itinerary::Itinerary;
pub use notification::Notification;
pub use user::User;
