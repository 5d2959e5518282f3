//! Worker pool engine.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use automl_api::{
    AutoMLConfig, Engine, EvaluationComputation, ScoringComputation, TrainingComputation,
};
use automl_spi::{
    AutoMLError, EngineComputation, FeatureTable, Objective, Pipeline, Result, Target,
};

use super::{evaluation_job, execute, scoring_job, training_job};

#[derive(Debug, Default)]
struct JobState {
    done: AtomicBool,
    cancelled: AtomicBool,
}

/// Handle on a job queued on a [`ThreadPoolEngine`].
pub struct PooledComputation<T> {
    receiver: Receiver<Result<T>>,
    state: Arc<JobState>,
}

impl<T> fmt::Debug for PooledComputation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledComputation")
            .field("done", &self.state.done.load(Ordering::SeqCst))
            .field("cancelled", &self.state.cancelled.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T: Send> EngineComputation for PooledComputation<T> {
    type Output = T;

    fn get_result(self: Box<Self>) -> Result<T> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(AutoMLError::Panicked(
                "worker exited without reporting a result".to_string(),
            ))
        })
    }

    fn done(&self) -> bool {
        self.state.done.load(Ordering::SeqCst)
    }

    /// Jobs already running finish normally; queued jobs resolve to
    /// [`AutoMLError::Cancelled`].
    fn cancel(&self) {
        if !self.done() {
            self.state.cancelled.store(true, Ordering::SeqCst);
        }
    }
}

/// Runs jobs concurrently on a dedicated rayon pool.
pub struct ThreadPoolEngine {
    pool: ThreadPool,
}

impl fmt::Debug for ThreadPoolEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPoolEngine")
            .field("n_workers", &self.n_workers())
            .finish()
    }
}

impl ThreadPoolEngine {
    /// Pool with `n_workers` threads; `0` lets rayon pick one per core.
    pub fn new(n_workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|i| format!("automl-worker-{i}"))
            .build()
            .map_err(|e| AutoMLError::InvalidConfig(format!("cannot start worker pool: {e}")))?;
        tracing::debug!(target: "automl", n_workers = pool.current_num_threads(), "started worker pool");
        Ok(Self { pool })
    }

    pub fn n_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn spawn<T, F>(&self, kind: &'static str, job: F) -> PooledComputation<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let state = Arc::new(JobState::default());
        let worker_state = Arc::clone(&state);

        tracing::debug!(target: "automl", kind, "submitted job");
        self.pool.spawn(move || {
            let result = if worker_state.cancelled.load(Ordering::SeqCst) {
                tracing::debug!(target: "automl", kind, "job cancelled before start");
                Err(AutoMLError::Cancelled)
            } else {
                let result = execute(job);
                tracing::debug!(target: "automl", kind, ok = result.is_ok(), "job finished");
                result
            };
            // The handle may have been dropped; nobody is waiting then.
            let _ = sender.send(result);
            worker_state.done.store(true, Ordering::SeqCst);
        });

        PooledComputation { receiver, state }
    }
}

impl Engine for ThreadPoolEngine {
    fn submit_evaluation_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        x_holdout: Option<FeatureTable>,
        y_holdout: Option<Target>,
    ) -> EvaluationComputation {
        let logger = self.setup_job_log();
        let job = evaluation_job(config, pipeline, x, y, x_holdout, y_holdout, logger);
        Box::new(self.spawn("evaluation", job))
    }

    fn submit_training_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        _x_holdout: Option<FeatureTable>,
        _y_holdout: Option<Target>,
    ) -> TrainingComputation {
        Box::new(self.spawn("training", training_job(config, pipeline, x, y)))
    }

    fn submit_scoring_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        objectives: Vec<Arc<dyn Objective>>,
        x_train: Option<FeatureTable>,
        y_train: Option<Target>,
    ) -> ScoringComputation {
        let job = scoring_job(config, pipeline, x, y, objectives, x_train, y_train);
        Box::new(self.spawn("scoring", job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    use automl_spi::ProblemType;

    use crate::objective::R2;
    use crate::splitter::KFold;
    use crate::testing::{build, config_for, Fault, MockPipeline};

    fn wait_until_done<T: Send>(computation: &PooledComputation<T>) {
        while !computation.done() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn regression_config() -> Arc<AutoMLConfig> {
        Arc::new(build(config_for(
            ProblemType::Regression,
            Arc::new(R2),
            Arc::new(KFold::new(3)),
        )))
    }

    fn regression_data() -> (FeatureTable, Target) {
        let values: Vec<f64> = (0..9).map(f64::from).collect();
        (FeatureTable::empty(9), Target::from_f64(&values))
    }

    #[test]
    fn test_runs_many_evaluations() {
        let engine = ThreadPoolEngine::new(2).unwrap();
        assert_eq!(engine.n_workers(), 2);
        let config = regression_config();
        let computations: Vec<_> = (0..4)
            .map(|i| {
                let (x, y) = regression_data();
                let pipeline: Arc<dyn Pipeline> = Arc::new(
                    MockPipeline::new(ProblemType::Regression).with_score(f64::from(i)),
                );
                engine.submit_evaluation_job(Arc::clone(&config), pipeline, x, y, None, None)
            })
            .collect();

        for (i, computation) in computations.into_iter().enumerate() {
            let result = computation.get_result().unwrap();
            assert_eq!(result.scores.cv_data.len(), 3);
            assert_eq!(result.scores.cv_score_mean, i as f64);
        }
    }

    #[test]
    fn test_failures_are_wrapped() {
        let engine = ThreadPoolEngine::new(1).unwrap();
        let (x, y) = regression_data();
        let pipeline: Arc<dyn Pipeline> =
            Arc::new(MockPipeline::new(ProblemType::Regression).with_fault(Fault::Panic, None));
        let err = engine
            .submit_training_job(regression_config(), pipeline, x, y, None, None)
            .get_result()
            .unwrap_err();
        assert!(matches!(err, AutoMLError::JobFailed { .. }));
        assert!(matches!(err.root_cause(), AutoMLError::Panicked(m) if m == "estimator panicked"));
    }

    #[test]
    fn test_cancel_before_start() {
        let engine = ThreadPoolEngine::new(1).unwrap();
        let (release, gate) = mpsc::channel::<()>();
        let blocker = engine.spawn("blocker", move || {
            gate.recv().ok();
            Ok(1)
        });
        let queued = engine.spawn("queued", || Ok(2));
        assert!(!queued.done());
        queued.cancel();
        release.send(()).unwrap();

        assert_eq!(Box::new(blocker).get_result().unwrap(), 1);
        assert!(matches!(Box::new(queued).get_result(), Err(AutoMLError::Cancelled)));
    }

    #[test]
    fn test_cancel_after_done_keeps_result() {
        let engine = ThreadPoolEngine::new(1).unwrap();
        let computation = engine.spawn("quick", || Ok("ready"));
        wait_until_done(&computation);
        computation.cancel();
        assert_eq!(Box::new(computation).get_result().unwrap(), "ready");
    }

    #[test]
    fn test_done_tracks_progress() {
        let engine = ThreadPoolEngine::new(1).unwrap();
        let (release, gate) = mpsc::channel::<()>();
        let computation = engine.spawn("gated", move || {
            gate.recv().ok();
            Ok(())
        });
        assert!(!computation.done());
        release.send(()).unwrap();
        wait_until_done(&computation);
        assert!(Box::new(computation).get_result().is_ok());
    }
}
