use super::{
    document::{DocumentInstance, Outcome, documents_from_columns},
    report::Report,
};
use crate::{
    config::SimConfig,
    core::{SimCore, SimCoreEvent, Ticks},
    error::InvalidInput,
    scheduler::{AssignmentPolicy, NearestCyclicPolicy},
};
use tracing::info;

pub struct Sim<P: AssignmentPolicy> {
    pub core: SimCore<P>,
    pub documents: Vec<DocumentInstance>,
    config: SimConfig,
    dropped: u64,
    last_event_at: Option<Ticks>,
}

impl<P: AssignmentPolicy> Sim<P> {
    pub fn new(
        config: SimConfig,
        arrival_times: &[Ticks],
        processing_durations: &[Ticks],
    ) -> Result<Self, InvalidInput> {
        let documents = documents_from_columns(arrival_times, processing_durations)?;
        let instances = documents
            .iter()
            .map(|&document| DocumentInstance {
                document,
                outcome: Outcome::Pending,
            })
            .collect();

        Ok(Self {
            core: SimCore::<P>::new(config.workers, documents)?,
            documents: instances,
            config,
            dropped: 0,
            last_event_at: None,
        })
    }

    pub fn step(&mut self) -> Option<SimCoreEvent> {
        let event = self.core.step()?;
        let now = self.core.now();
        self.last_event_at = Some(now);

        match event {
            SimCoreEvent::Assigned {
                document, worker, ..
            } => {
                self.documents[document].outcome = Outcome::Running {
                    worker,
                    started_at: now,
                };
            }
            SimCoreEvent::Dropped { document } => {
                self.documents[document].outcome = Outcome::Dropped;
                self.dropped += 1;
            }
            SimCoreEvent::Released { worker, document } => {
                let instance = &mut self.documents[document];
                if let Outcome::Running { started_at, .. } = instance.outcome {
                    instance.outcome = Outcome::Completed {
                        worker,
                        started_at,
                        completed_at: now,
                    };
                }
            }
        }

        Some(event)
    }

    pub fn is_finished(&self) -> bool {
        self.core.is_drained()
    }

    pub fn all_documents_settled(&self) -> bool {
        self.documents.iter().all(DocumentInstance::is_settled)
    }

    /// Drain every remaining event and summarise.
    pub fn run(&mut self) -> Report {
        while self.step().is_some() {}
        let report = self.report();
        info!(
            workers = self.config.workers,
            documents = self.documents.len(),
            assigned = report.total_assigned,
            dropped = report.dropped,
            "Simulation finished"
        );
        report
    }

    pub fn report(&self) -> Report {
        Report::new(
            &self.core.ctx.load,
            self.config.top_k,
            self.dropped,
            self.last_event_at,
        )
    }

    pub fn documents_map<T>(&self, f: impl Fn(&DocumentInstance) -> T) -> impl Iterator<Item = T> {
        self.documents.iter().map(f)
    }
}

/// Run the nearest-cyclic assignment over the given documents.
pub fn simulate(
    config: SimConfig,
    arrival_times: &[Ticks],
    processing_durations: &[Ticks],
) -> Result<Report, InvalidInput> {
    let mut sim = Sim::<NearestCyclicPolicy>::new(config, arrival_times, processing_durations)?;
    Ok(sim.run())
}
