use sea_orm_migration::prelude::*;

mod m20260801_000001_create_identities;
mod m20260801_000002_create_profiles;
mod m20260801_000003_create_auth_codes;
mod m20260801_000004_create_courses;
mod m20260801_000005_create_course_teachers;
mod m20260801_000006_create_course_students;
mod m20260801_000007_create_competency_units;
mod m20260801_000008_create_competency_elements;
mod m20260801_000009_create_evaluation_schedules;
mod m20260801_000010_create_evaluations;
mod m20260801_000011_create_submissions;
mod m20260801_000012_create_preferences;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_identities::Migration),
            Box::new(m20260801_000002_create_profiles::Migration),
            Box::new(m20260801_000003_create_auth_codes::Migration),
            Box::new(m20260801_000004_create_courses::Migration),
            Box::new(m20260801_000005_create_course_teachers::Migration),
            Box::new(m20260801_000006_create_course_students::Migration),
            Box::new(m20260801_000007_create_competency_units::Migration),
            Box::new(m20260801_000008_create_competency_elements::Migration),
            Box::new(m20260801_000009_create_evaluation_schedules::Migration),
            Box::new(m20260801_000010_create_evaluations::Migration),
            Box::new(m20260801_000011_create_submissions::Migration),
            Box::new(m20260801_000012_create_preferences::Migration),
        ]
    }
}
