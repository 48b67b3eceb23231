// Run every job, optionally on a dedicated worker pool

use tracing::warn;

use crate::convert::CancellationToken;
use crate::pipeline::job_runner::{JobConfig, JobResult, run_job};

/// Run multiple jobs, collecting results.
/// One job failure does NOT prevent other jobs from running.
///
/// `workers == 0` uses rayon's global pool.
pub fn run_all_jobs(
    jobs: &[JobConfig],
    workers: usize,
    token: &CancellationToken,
) -> Vec<crate::error::Result<JobResult>> {
    let run = || -> Vec<crate::error::Result<JobResult>> {
        jobs.iter().map(|job| run_job(job, token)).collect()
    };

    if workers == 0 {
        return run();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            warn!(workers, error = %e, "failed to build worker pool, using the global pool");
            run()
        }
    }
}
