pub mod cardio_programs;
pub mod cardio_sessions;
pub mod cardio_weeks;
pub mod community_programs;
pub mod exercises;
pub mod prescribed_sets;
pub mod program_weeks;
pub mod programs;
pub mod workouts;
