mod helpers;

mod evaluation_test;
mod guard_test;
mod profile_test;
mod submission_test;
mod token_test;
