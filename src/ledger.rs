//! The achievement ledger: every public write is one transaction against the
//! shared state.
//!
//! Writes run in two phases. First every fallible step happens (course
//! lookup, ciphertext conversion, homomorphic compute, precondition checks);
//! then state is mutated, decrypt grants are issued and the notification is
//! appended. An `Err` therefore never leaves a partial update, a drifted
//! counter or a stray event behind.

use crate::checkin::CheckInStats;
use crate::config::LedgerConfig;
use crate::context::CallContext;
use crate::courses::CourseInfo;
use crate::error::{LedgerError, LedgerResult};
use crate::events::LedgerEvent;
use crate::gateway::{EncryptedValueGateway, ExternalInput};
use crate::identity::{Address, Handle};
use crate::journal::{day_bucket, day_index, StudyData, StudyEntry};
use crate::proofs::SkillProofInfo;
use crate::scores::{passed_flag, ScoreEntry, ScoreView};
use crate::state::LedgerState;
use crate::tokens::OwnershipRegistry;
use tracing::{debug, info, warn};

/// Ledger contract backed by an encrypted value gateway `G`.
#[derive(Debug)]
pub struct AchievementLedger<G> {
    config: LedgerConfig,
    gateway: G,
    state: LedgerState,
}

impl<G: EncryptedValueGateway> AchievementLedger<G> {
    /// Creates an empty ledger.
    pub fn new(config: LedgerConfig, gateway: G) -> Self {
        let state = LedgerState::new(config.base_uri.clone());
        Self::from_parts(config, gateway, state)
    }

    /// Reassembles a ledger from previously persisted parts.
    pub fn from_parts(config: LedgerConfig, gateway: G, state: LedgerState) -> Self {
        Self {
            config,
            gateway,
            state,
        }
    }

    /// Splits the ledger into gateway and state, e.g. for persistence.
    pub fn into_parts(self) -> (G, LedgerState) {
        (self.gateway, self.state)
    }

    /// Address of the ledger itself.
    pub fn contract_address(&self) -> Address {
        self.config.contract_address
    }

    /// Active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The encrypted value gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Mutable access to the gateway, for clients preparing inputs.
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Current state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Every notification emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.state.events
    }

    // -----------------------------------------------------------------
    // Courses
    // -----------------------------------------------------------------

    /// Registers a course with an encrypted pass threshold and returns its id.
    pub fn create_course(
        &mut self,
        ctx: &CallContext,
        name: &str,
        threshold: &ExternalInput,
    ) -> LedgerResult<u64> {
        let contract = self.contract_address();
        let threshold = self
            .gateway
            .from_external(threshold, contract, ctx.caller)
            .map_err(|err| rejected("create_course", ctx, err.into()))?;

        self.gateway.allow(threshold, contract);
        let course_id = self.state.courses.register(name.to_string(), threshold);
        info!(evt = "COURSE_CREATED", course_id, caller = %ctx.caller, name, "course registered");
        Ok(course_id)
    }

    /// Course view; unknown ids give `("", zero, false)`.
    pub fn get_course(&self, course_id: u64) -> CourseInfo {
        self.state.courses.info(course_id)
    }

    /// Number of registered courses.
    pub fn course_count(&self) -> u64 {
        self.state.courses.len()
    }

    // -----------------------------------------------------------------
    // Scores
    // -----------------------------------------------------------------

    /// Stores the caller's encrypted score for `course_id` and derives the
    /// encrypted pass flag against the course threshold.
    pub fn upload_score(
        &mut self,
        ctx: &CallContext,
        course_id: u64,
        score: &ExternalInput,
    ) -> LedgerResult<Handle> {
        let entry = self
            .evaluate_score(ctx, course_id, score)
            .map_err(|err| rejected("upload_score", ctx, err))?;

        let contract = self.contract_address();
        self.state
            .student_mut(ctx.caller)
            .scores
            .record(course_id, entry);
        for handle in [entry.score, entry.passed] {
            self.gateway.allow(handle, ctx.caller);
            self.gateway.allow(handle, contract);
        }
        self.emit(LedgerEvent::ScoreUploaded {
            student: ctx.caller,
            course_id,
            score: entry.score,
        });
        Ok(entry.score)
    }

    fn evaluate_score(
        &mut self,
        ctx: &CallContext,
        course_id: u64,
        score: &ExternalInput,
    ) -> LedgerResult<ScoreEntry> {
        let threshold = self
            .state
            .courses
            .course(course_id)
            .map(|course| course.threshold)
            .ok_or(LedgerError::CourseNotFound(course_id))?;
        let contract = self.contract_address();
        let score = self.gateway.from_external(score, contract, ctx.caller)?;
        let passed = passed_flag(&mut self.gateway, score, threshold)?;
        Ok(ScoreEntry { score, passed })
    }

    /// Score and pass flag of `student` for `course_id`. Fails for unknown
    /// courses; zero handles when no score was uploaded.
    pub fn get_score(&self, student: Address, course_id: u64) -> LedgerResult<ScoreView> {
        if self.state.courses.course(course_id).is_none() {
            return Err(LedgerError::CourseNotFound(course_id));
        }
        Ok(self
            .state
            .student(student)
            .map(|record| record.scores.view(course_id))
            .unwrap_or_default())
    }

    // -----------------------------------------------------------------
    // Skill proofs
    // -----------------------------------------------------------------

    /// Mints a skill proof for a course the caller has uploaded a score for.
    ///
    /// Only the presence of a score is checked; the encrypted pass flag is
    /// not consulted.
    pub fn generate_skill_proof(&mut self, ctx: &CallContext, course_id: u64) -> LedgerResult<u64> {
        let has_score = self
            .state
            .student(ctx.caller)
            .map_or(false, |record| record.scores.has_score(course_id));
        if !has_score {
            return Err(rejected(
                "generate_skill_proof",
                ctx,
                LedgerError::ScoreRequired { course_id },
            ));
        }

        let skill_id = self
            .state
            .proofs
            .issue(ctx.caller, course_id, ctx.timestamp)
            .map_err(|err| rejected("generate_skill_proof", ctx, err))?;
        self.emit(LedgerEvent::ProofGenerated {
            student: ctx.caller,
            skill_id,
            course_id,
        });
        Ok(skill_id)
    }

    /// Proof metadata stored under `(student, skill_id)`.
    pub fn get_skill_proof(&self, student: Address, skill_id: u64) -> SkillProofInfo {
        self.state.proofs.proof(student, skill_id)
    }

    /// Skill proof ids owned by `student`, ascending.
    pub fn skill_proofs_of(&self, student: Address) -> Vec<u64> {
        self.state.proofs.proofs_of(student)
    }

    /// Number of skill proofs minted across all students.
    pub fn total_skill_proofs(&self) -> u64 {
        self.state.proofs.total()
    }

    /// Token URI for a minted proof.
    pub fn token_uri(&self, token_id: u64) -> LedgerResult<String> {
        self.state.proofs.token_uri(token_id)
    }

    /// Replaces the token base URI, subject to the configured policy.
    pub fn set_base_uri(&mut self, ctx: &CallContext, base_uri: &str) -> LedgerResult<()> {
        let policy = self.config.base_uri_policy.clone();
        self.state
            .proofs
            .set_base_uri(&policy, ctx.caller, base_uri.to_string())
            .map_err(|err| rejected("set_base_uri", ctx, err))?;
        info!(evt = "BASE_URI", caller = %ctx.caller, base_uri, "token base uri updated");
        Ok(())
    }

    /// Current token base URI.
    pub fn base_uri(&self) -> &str {
        self.state.proofs.base_uri()
    }

    /// Owner of a minted token.
    pub fn owner_of(&self, token_id: u64) -> Option<Address> {
        self.state.proofs.registry().owner_of(token_id)
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(&self, owner: Address) -> u64 {
        self.state.proofs.registry().balance_of(owner)
    }

    // -----------------------------------------------------------------
    // Study journal and check-ins
    // -----------------------------------------------------------------

    /// Writes encrypted study time and focus level into the caller's journal
    /// for the day containing `timestamp`. Returns the day bucket.
    pub fn record_study_data(
        &mut self,
        ctx: &CallContext,
        timestamp: u64,
        study_time: &ExternalInput,
        focus_level: &ExternalInput,
    ) -> LedgerResult<u64> {
        let contract = self.contract_address();
        let entry = self
            .gateway
            .from_external(study_time, contract, ctx.caller)
            .and_then(|study_time| {
                let focus_level = self.gateway.from_external(focus_level, contract, ctx.caller)?;
                Ok(StudyEntry {
                    study_time,
                    focus_level,
                })
            })
            .map_err(|err| rejected("record_study_data", ctx, err.into()))?;

        let day = self
            .state
            .student_mut(ctx.caller)
            .journal
            .upsert(timestamp, entry);
        for handle in [entry.study_time, entry.focus_level] {
            self.gateway.allow(handle, ctx.caller);
            self.gateway.allow(handle, contract);
        }
        self.emit(LedgerEvent::StudyRecorded {
            student: ctx.caller,
            day,
        });
        Ok(day)
    }

    /// Journal entry of `student` for the day containing `timestamp`.
    pub fn get_study_data(&self, student: Address, timestamp: u64) -> StudyData {
        self.state
            .student(student)
            .map(|record| record.journal.data(timestamp))
            .unwrap_or_default()
    }

    /// Day buckets journaled by `student`, in first-write order.
    pub fn get_study_days(&self, student: Address) -> Vec<u64> {
        self.state
            .student(student)
            .map(|record| record.journal.days().to_vec())
            .unwrap_or_default()
    }

    /// Records today's check-in and returns the streak length.
    ///
    /// The input is verified on every call. On a repeat check-in within the
    /// same day nothing is stored and no grant is issued, but the
    /// notification still fires with the unchanged streak.
    pub fn check_in(&mut self, ctx: &CallContext, study_time: &ExternalInput) -> LedgerResult<u64> {
        let contract = self.contract_address();
        let study_time = self
            .gateway
            .from_external(study_time, contract, ctx.caller)
            .map_err(|err| rejected("check_in", ctx, err.into()))?;

        let current_day = day_index(ctx.timestamp);
        let record = self.state.student_mut(ctx.caller);
        let transition = record.check_in.check_in(current_day);
        let consecutive_days = record.check_in.consecutive_days();
        if transition.advanced() {
            let focus_level = self.gateway.encrypt_constant(0);
            self.state.student_mut(ctx.caller).journal.upsert(
                ctx.timestamp,
                StudyEntry {
                    study_time,
                    focus_level,
                },
            );
            self.gateway.allow(study_time, ctx.caller);
            self.gateway.allow(study_time, contract);
            debug!(
                evt = "STREAK",
                student = %ctx.caller,
                day = day_bucket(ctx.timestamp),
                ?transition,
                "check-in advanced streak"
            );
        }
        self.emit(LedgerEvent::CheckInRecorded {
            student: ctx.caller,
            consecutive_days,
        });
        Ok(consecutive_days)
    }

    /// Streak length and last check-in day of `student`.
    pub fn get_check_in_stats(&self, student: Address) -> CheckInStats {
        self.state
            .student(student)
            .map(|record| record.check_in.stats())
            .unwrap_or_default()
    }

    fn emit(&mut self, event: LedgerEvent) {
        info!(evt = event.name(), student = %event.student(), "{event:?}");
        self.state.events.push(event);
    }
}

fn rejected(op: &'static str, ctx: &CallContext, err: LedgerError) -> LedgerError {
    warn!(evt = "REJECTED", op, caller = %ctx.caller, reason = %err, "transaction aborted");
    err
}
