pub mod auth;

pub mod users;

pub mod photos;

pub mod metrics;

pub mod votes;

pub mod results;

pub mod uploads;

pub use auth::configure_auth_routes;
pub use metrics::configure_metric_routes;
pub use photos::configure_photo_routes;
pub use results::configure_result_routes;
pub use uploads::configure_upload_routes;
pub use users::configure_user_routes;
pub use votes::configure_vote_routes;
