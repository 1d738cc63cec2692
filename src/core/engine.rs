use crate::domain::model::RunReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct SmokeEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SmokeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        println!("Starting smoke run...");

        println!("Preparing batches...");
        let batches = self.pipeline.prepare().await?;
        println!("Prepared {} batches", batches.len());
        self.monitor.log_stats("Prepare");

        println!("Executing batches...");
        let mut report = self.pipeline.execute(batches.clone()).await?;
        println!(
            "Executed {} commands across {} batches",
            report.total_commands,
            report.batch_count()
        );
        self.monitor.log_stats("Execute");

        let verified = self.pipeline.verify(&batches).await?;
        report.verified_keys = verified;
        if verified > 0 {
            println!("Verified {} keys", verified);
        }
        self.monitor.log_stats("Verify");

        self.monitor.log_final_stats();
        Ok(report)
    }
}
