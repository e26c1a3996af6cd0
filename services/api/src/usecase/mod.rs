pub mod actor;
pub mod authcode;
pub mod course;
pub mod element;
pub mod evaluation;
pub mod preference;
pub mod profile;
pub mod schedule;
pub mod signup;
pub mod submission;
pub mod token;
pub mod unit;
pub mod verify_email;
