pub use super::bag::Entity as Bag;
pub use super::bag_club::Entity as BagClub;
pub use super::club::Entity as Club;
pub use super::course::Entity as Course;
pub use super::event::Entity as Event;
pub use super::event_participant::Entity as EventParticipant;
pub use super::hole::Entity as Hole;
pub use super::profile::Entity as Profile;
pub use super::series::Entity as Series;
pub use super::series_participant::Entity as SeriesParticipant;
pub use super::tee_set::Entity as TeeSet;
pub use super::tee_set_distance::Entity as TeeSetDistance;
