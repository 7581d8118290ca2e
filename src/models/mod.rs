pub mod event;
pub mod graphql;
pub mod projects;
