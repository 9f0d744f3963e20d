#![deny(missing_docs)]

//! # scholar_ledger
//!
//! **scholar_ledger** is a ledger-resident achievement tracker for a learning
//! platform. It records per-student course scores, daily study metrics and
//! check-in streaks, and mints skill proof tokens, while every sensitive value
//! (scores, thresholds, study time, focus level) stays an opaque encrypted
//! [`Handle`].
//!
//! ## Features
//!
//! * **Course catalog**: append-only, ids from 0, encrypted thresholds.
//! * **Encrypted scores**: the pass flag is computed as
//!   `select(score >= threshold, 1, 0)` by the [`EncryptedValueGateway`],
//!   never on plaintext.
//! * **Skill proofs**: globally numbered tokens minted through an
//!   [`OwnershipRegistry`], with base-URI composition.
//! * **Study journal and streaks**: day-bucketed encrypted entries and a
//!   two-state check-in machine keyed on day indices.
//!
//! Every write is a single transaction: it either commits fully or returns a
//! [`LedgerError`] without touching state.
//!
//! ## Usage
//!
//! ```rust
//! use scholar_ledger::{AchievementLedger, Address, CallContext, LedgerConfig, SimulatedGateway};
//!
//! let mut ledger = AchievementLedger::new(LedgerConfig::default(), SimulatedGateway::with_seed(1));
//! let contract = ledger.contract_address();
//! let alice = Address::from_label("alice");
//! let ctx = CallContext::new(alice, 1_700_000_000);
//!
//! let threshold = ledger.gateway_mut().encrypt_input(60, contract, alice);
//! let course = ledger.create_course(&ctx, "Intro to Rust", &threshold).unwrap();
//!
//! let score = ledger.gateway_mut().encrypt_input(72, contract, alice);
//! ledger.upload_score(&ctx, course, &score).unwrap();
//! let skill_id = ledger.generate_skill_proof(&ctx, course).unwrap();
//! assert_eq!(ledger.get_skill_proof(alice, skill_id).course_id, course);
//! ```

pub mod checkin;
pub mod config;
mod context;
pub mod courses;
mod error;
pub mod events;
pub mod gateway;
mod identity;
pub mod journal;
mod ledger;
pub mod proofs;
pub mod scores;
mod shared;
mod state;
pub mod store;
pub mod tokens;

pub use checkin::{CheckInState, CheckInStats, CheckInStreak, CheckInTransition};
pub use config::{BaseUriPolicy, ConfigError, LedgerConfig};
pub use context::CallContext;
pub use courses::{Course, CourseInfo, CourseRegistry};
pub use error::{LedgerError, LedgerResult};
pub use events::LedgerEvent;
pub use gateway::{EncryptedValueGateway, ExternalInput, GatewayError, SimulatedGateway};
pub use identity::{Address, Handle, IdentityParseError, ADDRESS_LENGTH, HANDLE_LENGTH};
pub use journal::{day_bucket, day_index, StudyData, StudyEntry, StudyJournal, SECONDS_PER_DAY};
pub use ledger::AchievementLedger;
pub use proofs::{ProofIssuer, SkillProof, SkillProofInfo};
pub use scores::{ScoreEntry, ScoreSheet, ScoreView};
pub use shared::SharedLedger;
pub use state::{LedgerState, StudentRecord};
pub use store::LedgerSnapshot;
pub use tokens::{OwnershipRegistry, TokenRegistry};
