use anyhow::Result;
use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::extract::Extractor;
use crate::gate::{gate_for_model, ActionGate};
use crate::ingest;
use crate::models::{ActionRecord, Meeting, Utterance};
use crate::resolve::{choose_assignee, next_last_addressed};
use crate::temporal::normalize_deadline;

/// Counts and records from one pass over the input directory.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub meetings: usize,
    pub utterances: usize,
    pub records: Vec<ActionRecord>,
}

/// Drives transcripts through gate, extractor, assignment, and deadline
/// normalization.
pub struct Pipeline {
    config: PipelineConfig,
    gate: Box<dyn ActionGate>,
    extractor: Extractor,
    reference: NaiveDateTime,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        gate: Box<dyn ActionGate>,
        extractor: Extractor,
        reference: NaiveDateTime,
    ) -> Self {
        Pipeline {
            config,
            gate,
            extractor,
            reference,
        }
    }

    /// Build a pipeline from config alone: gate from `model_path`, extractor
    /// from the strictness policy, reference from `reference_date` or now.
    pub fn from_config(config: PipelineConfig) -> Self {
        let gate = gate_for_model(config.model_path.as_deref(), config.threshold);
        let extractor = config.extractor();
        let reference = match config.reference_date {
            Some(d) => d.and_time(NaiveTime::MIN),
            None => Local::now().naive_local(),
        };
        Pipeline::new(config, gate, extractor, reference)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn gate_name(&self) -> &str {
        self.gate.name()
    }

    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    /// One utterance step. Takes the last-addressed identity before this
    /// utterance and returns the record (if any) plus the value for the next
    /// utterance.
    pub fn process_utterance(
        &self,
        meeting: &Meeting,
        utt: &Utterance,
        last_addressed: Option<String>,
    ) -> (Option<ActionRecord>, Option<String>) {
        let text = utt.text.trim();
        if text.is_empty() {
            return (None, last_addressed);
        }

        let record = self.record_for(meeting, utt, text, last_addressed.as_deref());
        (record, next_last_addressed(text, last_addressed))
    }

    fn record_for(
        &self,
        meeting: &Meeting,
        utt: &Utterance,
        text: &str,
        last_addressed: Option<&str>,
    ) -> Option<ActionRecord> {
        let parsed = self.gate.accept(text, &self.extractor)?;

        let (assignee, assignee_role) = choose_assignee(utt, &meeting.roles, &parsed, last_addressed);
        let deadline_iso = normalize_deadline(parsed.deadline_raw.as_deref(), self.reference);
        debug!("{}: action {:?} -> {}", meeting.name, parsed.task, assignee);

        Some(ActionRecord {
            meeting: meeting.name.clone(),
            speaker: utt.speaker.clone(),
            speaker_role: meeting.roles.role_of(&utt.speaker).to_string(),
            assignee,
            assignee_role,
            action_item: parsed.task,
            deadline_text: parsed.deadline_raw,
            deadline_iso,
        })
    }

    /// All records for one meeting, in utterance order. `last_addressed`
    /// starts unset for every meeting.
    pub fn process_meeting(&self, meeting: &Meeting) -> Vec<ActionRecord> {
        let mut records = Vec::new();
        let mut last_addressed = None;
        for utt in &meeting.utterances {
            let (record, next) = self.process_utterance(meeting, utt, last_addressed);
            records.extend(record);
            last_addressed = next;
        }
        records
    }

    /// Process every transcript in the input directory, in file name order.
    pub fn run(&self) -> Result<RunReport> {
        let exclude = [self.config.output_path.as_path()];
        let files = ingest::iter_meeting_files(&self.config.input_dir, &self.config.roles_filename, &exclude)?;
        let roles_path = self.config.roles_path();

        let mut report = RunReport::default();
        for path in &files {
            let meeting = ingest::load_meeting(path, &roles_path)?;
            let records = self.process_meeting(&meeting);
            info!("{}: {} action items", meeting.name, records.len());

            report.meetings += 1;
            report.utterances += meeting.utterances.len();
            report.records.extend(records);
        }

        info!(
            "Processed {} meetings, {} utterances, {} action items (gate: {})",
            report.meetings,
            report.utterances,
            report.records.len(),
            self.gate.name()
        );
        Ok(report)
    }
}
