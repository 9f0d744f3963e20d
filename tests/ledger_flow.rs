//! End-to-end behavior of the achievement ledger through its public API.

use scholar_ledger::{
    AchievementLedger, Address, BaseUriPolicy, CallContext, CourseInfo, ExternalInput, Handle,
    LedgerConfig, LedgerError, LedgerEvent, SimulatedGateway, SECONDS_PER_DAY,
};

const DAY: u64 = SECONDS_PER_DAY;
const START: u64 = 20_000 * DAY;

struct Harness {
    ledger: AchievementLedger<SimulatedGateway>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    fn with_config(config: LedgerConfig) -> Self {
        Self {
            ledger: AchievementLedger::new(config, SimulatedGateway::with_seed(42)),
        }
    }

    fn input(&mut self, value: u64, caller: Address) -> ExternalInput {
        let contract = self.ledger.contract_address();
        self.ledger
            .gateway_mut()
            .encrypt_input(value, contract, caller)
    }

    fn course(&mut self, name: &str, threshold: u64) -> u64 {
        let admin = Address::from_label("registrar");
        let input = self.input(threshold, admin);
        self.ledger
            .create_course(&CallContext::new(admin, START), name, &input)
            .unwrap()
    }

    fn upload(&mut self, student: Address, course: u64, score: u64) -> Handle {
        let input = self.input(score, student);
        self.ledger
            .upload_score(&CallContext::new(student, START), course, &input)
            .unwrap()
    }

    fn reveal(&self, handle: Handle, who: Address) -> u64 {
        self.ledger.gateway().reveal(handle, who).unwrap()
    }

    fn check_in_at(&mut self, student: Address, timestamp: u64, minutes: u64) -> u64 {
        let input = self.input(minutes, student);
        self.ledger
            .check_in(&CallContext::new(student, timestamp), &input)
            .unwrap()
    }
}

#[test]
fn course_ids_follow_call_order() {
    let mut h = Harness::new();
    let ids: Vec<u64> = (0..5).map(|i| h.course(&format!("c{i}"), 50)).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(h.ledger.course_count(), 5);
}

#[test]
fn missing_course_reads_differ_by_accessor() {
    let h = Harness::new();
    let student = Address::from_label("alice");
    assert_eq!(
        h.ledger.get_course(0),
        CourseInfo {
            name: String::new(),
            threshold: Handle::ZERO,
            exists: false
        }
    );
    assert!(matches!(
        h.ledger.get_score(student, 0),
        Err(LedgerError::CourseNotFound(0))
    ));
}

#[test]
fn score_before_upload_reads_as_zero_handles() {
    let mut h = Harness::new();
    let course = h.course("Databases", 50);
    let view = h.ledger.get_score(Address::from_label("nobody"), course).unwrap();
    assert!(view.score.is_zero());
    assert!(view.passed.is_zero());
}

#[test]
fn second_upload_replaces_the_first() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let course = h.course("Compilers", 70);

    let first = h.upload(alice, course, 90);
    let view = h.ledger.get_score(alice, course).unwrap();
    assert_eq!(h.reveal(view.passed, alice), 1);

    let second = h.upload(alice, course, 40);
    let view = h.ledger.get_score(alice, course).unwrap();
    assert_ne!(first, second);
    assert_eq!(view.score, second);
    assert_eq!(h.reveal(view.score, alice), 40);
    assert_eq!(h.reveal(view.passed, alice), 0);
}

#[test]
fn scores_are_isolated_per_student() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    let course = h.course("Networks", 60);
    h.upload(alice, course, 80);
    assert!(h.ledger.get_score(bob, course).unwrap().score.is_zero());
    let alice_score = h.ledger.get_score(alice, course).unwrap().score;
    assert!(h.ledger.gateway().reveal(alice_score, bob).is_err());
}

#[test]
fn skill_proof_requires_an_upload_for_that_course() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let graded = h.course("Graded", 50);
    let other = h.course("Other", 50);
    h.upload(alice, graded, 99);

    let ctx = CallContext::new(alice, START + 10);
    assert!(matches!(
        h.ledger.generate_skill_proof(&ctx, other),
        Err(LedgerError::ScoreRequired { course_id }) if course_id == other
    ));
    assert_eq!(h.ledger.total_skill_proofs(), 0);
    assert_eq!(h.ledger.generate_skill_proof(&ctx, graded).unwrap(), 0);
}

#[test]
fn failing_score_still_unlocks_skill_proof() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let course = h.course("Hard Course", 95);
    h.upload(alice, course, 10);
    let passed = h.ledger.get_score(alice, course).unwrap().passed;
    assert_eq!(h.reveal(passed, alice), 0);

    let ctx = CallContext::new(alice, START + 99);
    let skill_id = h.ledger.generate_skill_proof(&ctx, course).unwrap();
    let proof = h.ledger.get_skill_proof(alice, skill_id);
    assert!(proof.exists);
    assert_eq!(proof.course_id, course);
    assert_eq!(proof.timestamp, START + 99);
}

#[test]
fn skill_ids_are_global_and_owner_scoped() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");
    let course = h.course("Shared", 50);
    h.upload(alice, course, 60);
    h.upload(bob, course, 60);

    let a = h
        .ledger
        .generate_skill_proof(&CallContext::new(alice, START), course)
        .unwrap();
    let b = h
        .ledger
        .generate_skill_proof(&CallContext::new(bob, START), course)
        .unwrap();
    assert!(b > a);
    assert!(h.ledger.get_skill_proof(alice, a).exists);
    assert!(!h.ledger.get_skill_proof(alice, b).exists);
    assert!(h.ledger.get_skill_proof(bob, b).exists);
    assert_eq!(h.ledger.owner_of(b), Some(bob));
    assert_eq!(h.ledger.skill_proofs_of(alice), vec![a]);
    assert!(h.ledger.events().contains(&LedgerEvent::ProofGenerated {
        student: bob,
        skill_id: b,
        course_id: course
    }));
}

#[test]
fn token_uri_requires_minted_token() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let course = h.course("URI", 1);
    h.upload(alice, course, 1);
    let ctx = CallContext::new(alice, START);
    let id = h.ledger.generate_skill_proof(&ctx, course).unwrap();

    assert_eq!(h.ledger.token_uri(id).unwrap(), "");
    h.ledger.set_base_uri(&ctx, "https://proofs.example/").unwrap();
    assert_eq!(h.ledger.token_uri(id).unwrap(), "https://proofs.example/0");
    assert!(matches!(
        h.ledger.token_uri(id + 1),
        Err(LedgerError::TokenNotFound(_))
    ));
}

#[test]
fn restricted_base_uri_rejects_strangers() {
    let admin = Address::from_label("registrar");
    let mut h = Harness::with_config(LedgerConfig {
        base_uri: "ipfs://initial/".into(),
        base_uri_policy: BaseUriPolicy::Admin(admin),
        ..LedgerConfig::default()
    });
    let stranger = Address::from_label("stranger");
    assert!(matches!(
        h.ledger
            .set_base_uri(&CallContext::new(stranger, START), "evil://"),
        Err(LedgerError::Unauthorized(_))
    ));
    assert_eq!(h.ledger.base_uri(), "ipfs://initial/");
    h.ledger
        .set_base_uri(&CallContext::new(admin, START), "ipfs://next/")
        .unwrap();
    assert_eq!(h.ledger.base_uri(), "ipfs://next/");
}

#[test]
fn study_day_is_listed_once_with_latest_values() {
    let mut h = Harness::new();
    let bob = Address::from_label("bob");
    let ctx = CallContext::new(bob, START);
    for (offset, minutes, focus) in [(60, 30, 2), (7_200, 50, 5)] {
        let study = h.input(minutes, bob);
        let focus_in = h.input(focus, bob);
        h.ledger
            .record_study_data(&ctx, START + offset, &study, &focus_in)
            .unwrap();
    }
    assert_eq!(h.ledger.get_study_days(bob), vec![START]);
    let data = h.ledger.get_study_data(bob, START + 1);
    assert_eq!(h.reveal(data.study_time, bob), 50);
    assert_eq!(h.reveal(data.focus_level, bob), 5);
}

#[test]
fn study_days_keep_first_write_order() {
    let mut h = Harness::new();
    let bob = Address::from_label("bob");
    let ctx = CallContext::new(bob, START);
    for day in [START + 3 * DAY, START, START + 3 * DAY + 5] {
        let study = h.input(1, bob);
        let focus = h.input(1, bob);
        h.ledger
            .record_study_data(&ctx, day, &study, &focus)
            .unwrap();
    }
    assert_eq!(h.ledger.get_study_days(bob), vec![START + 3 * DAY, START]);
}

#[test]
fn three_consecutive_days_make_a_streak_of_three() {
    let mut h = Harness::new();
    let carol = Address::from_label("carol");
    assert_eq!(h.check_in_at(carol, START + 100, 10), 1);
    assert_eq!(h.check_in_at(carol, START + DAY + 5, 10), 2);
    assert_eq!(h.check_in_at(carol, START + 2 * DAY + 80_000, 10), 3);
    let stats = h.ledger.get_check_in_stats(carol);
    assert_eq!(stats.consecutive_days, 3);
    assert_eq!(stats.last_check_in_day, START / DAY + 2);
}

#[test]
fn skipped_day_resets_streak() {
    let mut h = Harness::new();
    let carol = Address::from_label("carol");
    h.check_in_at(carol, START, 10);
    assert_eq!(h.check_in_at(carol, START + 2 * DAY, 10), 1);
}

#[test]
fn same_day_check_in_keeps_counter_and_journal() {
    let mut h = Harness::new();
    let carol = Address::from_label("carol");
    h.check_in_at(carol, START + 10, 25);
    let before = h.ledger.get_study_data(carol, START);
    assert_eq!(h.check_in_at(carol, START + 20_000, 99), 1);
    let after = h.ledger.get_study_data(carol, START);
    assert_eq!(before, after);
    assert_eq!(h.reveal(after.study_time, carol), 25);
    assert_eq!(
        h.ledger.events().last(),
        Some(&LedgerEvent::CheckInRecorded {
            student: carol,
            consecutive_days: 1
        })
    );
}

#[test]
fn check_in_day_joins_study_days() {
    let mut h = Harness::new();
    let dave = Address::from_label("dave");
    let study = h.input(15, dave);
    let focus = h.input(3, dave);
    h.ledger
        .record_study_data(&CallContext::new(dave, START), START, &study, &focus)
        .unwrap();
    h.check_in_at(dave, START + 500, 40);
    h.check_in_at(dave, START + DAY, 40);
    assert_eq!(h.ledger.get_study_days(dave), vec![START, START + DAY]);
    let today = h.ledger.get_study_data(dave, START);
    assert_eq!(h.reveal(today.study_time, dave), 40);
    assert!(h.ledger.gateway().reveal(today.focus_level, dave).is_err());
}

#[test]
fn invalid_check_in_proof_aborts_even_on_repeat_day() {
    let mut h = Harness::new();
    let erin = Address::from_label("erin");
    h.check_in_at(erin, START, 5);
    let events_before = h.ledger.events().len();
    let forged = h.input(5, Address::from_label("someone-else"));
    let err = h
        .ledger
        .check_in(&CallContext::new(erin, START + 10), &forged)
        .unwrap_err();
    assert!(matches!(err, LedgerError::ProofVerification(_)));
    assert_eq!(h.ledger.events().len(), events_before);
}

#[test]
fn course_passed_is_never_emitted() {
    let mut h = Harness::new();
    let alice = Address::from_label("alice");
    let course = h.course("Any", 0);
    h.upload(alice, course, 100);
    h.ledger
        .generate_skill_proof(&CallContext::new(alice, START), course)
        .unwrap();
    assert!(!h
        .ledger
        .events()
        .iter()
        .any(|e| matches!(e, LedgerEvent::CoursePassed { .. })));
}
