// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Account, Coordinates, Credentials, FriendSample, LocatedPoint};
pub use requests::MapFormRequest;
pub use responses::HealthResponse;
