mod jobs;
mod services;

pub use jobs::build_job_runner;
pub use services::Services;
