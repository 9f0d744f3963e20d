//! Minimal CLI for driving a scholar ledger stored as a JSON snapshot.
//!
//! Callers are named with `--as <label|0xaddress>`; labels are hashed into
//! addresses. Encrypted inputs are produced by the simulated gateway kept in
//! the same snapshot, so the ledger and its ciphertexts travel together.

use scholar_ledger::{
    store, AchievementLedger, Address, CallContext, Handle, LedgerConfig, SimulatedGateway,
};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE_PATH: &str = "scholar_state.json";
const LOG_ENV: &str = "SCHOLAR_LOG";

type Ledger = AchievementLedger<SimulatedGateway>;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_help() {
    println!("Usage: scholar <course|score|proof|study|checkin|reveal|events> ...");
    println!("  course create --as <id> --name <text> --threshold <u64>");
    println!("  course show <course_id>");
    println!("  score upload --as <id> --course <id> --score <u64>");
    println!("  score show --student <id> --course <id>");
    println!("  proof generate --as <id> --course <id>");
    println!("  proof show --student <id> --skill <id>");
    println!("  proof uri <token_id>");
    println!("  proof set-base-uri --as <id> --uri <text>");
    println!("  study record --as <id> --time <u64> --focus <u64> [--day <unix>]");
    println!("  study show --student <id> --day <unix>");
    println!("  study days --student <id>");
    println!("  checkin do --as <id> --time <u64>");
    println!("  checkin stats --student <id>");
    println!("  reveal --as <id> --handle <0xhandle>");
    println!("  events");
    println!("Every write accepts [--at <unix>] to set ledger time (default: now).");
    println!("State file: $SCHOLAR_STATE_PATH or ./{DEFAULT_STATE_PATH}");
}

/// `--flag value` pairs plus positional arguments.
struct Flags {
    named: HashMap<String, String>,
    positional: Vec<String>,
}

impl Flags {
    fn parse(args: Vec<String>) -> Self {
        let mut named = HashMap::new();
        let mut positional = Vec::new();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if let Some(name) = arg.strip_prefix("--") {
                let value = iter
                    .next()
                    .unwrap_or_else(|| fatal(&format!("--{name} expects a value")));
                named.insert(name.to_string(), value);
            } else {
                positional.push(arg);
            }
        }
        Self { named, positional }
    }

    fn text(&self, name: &str) -> String {
        self.named
            .get(name)
            .cloned()
            .unwrap_or_else(|| fatal(&format!("--{name} is required")))
    }

    fn number(&self, name: &str) -> u64 {
        parse_u64(name, &self.text(name))
    }

    fn identity(&self, name: &str) -> Address {
        parse_identity(&self.text(name))
    }

    fn context(&self) -> CallContext {
        let timestamp = self
            .named
            .get("at")
            .map(|raw| parse_u64("at", raw))
            .unwrap_or_else(now_secs);
        CallContext::new(self.identity("as"), timestamp)
    }

    fn first_positional(&self, what: &str) -> u64 {
        let raw = self
            .positional
            .first()
            .unwrap_or_else(|| fatal(&format!("missing <{what}>")));
        parse_u64(what, raw)
    }
}

fn parse_u64(name: &str, raw: &str) -> u64 {
    raw.parse()
        .unwrap_or_else(|_| fatal(&format!("invalid {name} value: {raw}")))
}

fn parse_identity(raw: &str) -> Address {
    if raw.starts_with("0x") {
        raw.parse()
            .unwrap_or_else(|err| fatal(&format!("invalid address {raw}: {err}")))
    } else {
        Address::from_label(raw)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn state_path(config: &LedgerConfig) -> PathBuf {
    config
        .state_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH))
}

fn load_ledger(config: LedgerConfig) -> Ledger {
    let path = state_path(&config);
    store::load(&path, config, SimulatedGateway::new).unwrap_or_else(|err| {
        fatal(&format!(
            "failed to load ledger state {}: {err}",
            path.display()
        ))
    })
}

fn save_ledger(ledger: Ledger) {
    let path = state_path(ledger.config());
    store::save(&path, ledger).unwrap_or_else(|err| {
        fatal(&format!(
            "failed to save ledger state {}: {err}",
            path.display()
        ))
    });
}

fn encrypt(ledger: &mut Ledger, ctx: &CallContext, value: u64) -> scholar_ledger::ExternalInput {
    let contract = ledger.contract_address();
    ledger.gateway_mut().encrypt_input(value, contract, ctx.caller)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = LedgerConfig::from_env().unwrap_or_else(|err| fatal(&err.to_string()));
    let mut args = env::args().skip(1);
    let command = args.next();
    let sub = args.next().unwrap_or_default();
    let mut tail: Vec<String> = args.collect();
    match command.as_deref() {
        Some("course") => cmd_course(&sub, Flags::parse(tail), config),
        Some("score") => cmd_score(&sub, Flags::parse(tail), config),
        Some("proof") => cmd_proof(&sub, Flags::parse(tail), config),
        Some("study") => cmd_study(&sub, Flags::parse(tail), config),
        Some("checkin") => cmd_checkin(&sub, Flags::parse(tail), config),
        Some("reveal") => {
            // `reveal` has no subcommand; `sub` is its first flag.
            tail.insert(0, sub);
            cmd_reveal(Flags::parse(tail), config);
        }
        Some("events") => cmd_events(config),
        Some("-h") | Some("--help") | None => print_help(),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn cmd_course(sub: &str, flags: Flags, config: LedgerConfig) {
    let mut ledger = load_ledger(config);
    match sub {
        "create" => {
            let ctx = flags.context();
            let threshold = encrypt(&mut ledger, &ctx, flags.number("threshold"));
            let id = ledger
                .create_course(&ctx, &flags.text("name"), &threshold)
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
            println!("course_id={id}");
        }
        "show" => {
            let course = ledger.get_course(flags.first_positional("course_id"));
            println!(
                "name={} threshold={} exists={}",
                course.name, course.threshold, course.exists
            );
        }
        _ => fatal(&format!("Unknown subcommand: course {sub}")),
    }
}

fn cmd_score(sub: &str, flags: Flags, config: LedgerConfig) {
    let mut ledger = load_ledger(config);
    match sub {
        "upload" => {
            let ctx = flags.context();
            let score = encrypt(&mut ledger, &ctx, flags.number("score"));
            let handle = ledger
                .upload_score(&ctx, flags.number("course"), &score)
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
            println!("score={handle}");
        }
        "show" => {
            let view = ledger
                .get_score(flags.identity("student"), flags.number("course"))
                .unwrap_or_else(|err| fatal(&err.reason()));
            println!("score={} passed={}", view.score, view.passed);
        }
        _ => fatal(&format!("Unknown subcommand: score {sub}")),
    }
}

fn cmd_proof(sub: &str, flags: Flags, config: LedgerConfig) {
    let mut ledger = load_ledger(config);
    match sub {
        "generate" => {
            let ctx = flags.context();
            let skill_id = ledger
                .generate_skill_proof(&ctx, flags.number("course"))
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
            println!("skill_id={skill_id}");
        }
        "show" => {
            let proof = ledger.get_skill_proof(flags.identity("student"), flags.number("skill"));
            println!(
                "course_id={} timestamp={} exists={}",
                proof.course_id, proof.timestamp, proof.exists
            );
        }
        "uri" => {
            let uri = ledger
                .token_uri(flags.first_positional("token_id"))
                .unwrap_or_else(|err| fatal(&err.reason()));
            println!("{uri}");
        }
        "set-base-uri" => {
            let ctx = flags.context();
            ledger
                .set_base_uri(&ctx, &flags.text("uri"))
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
        }
        _ => fatal(&format!("Unknown subcommand: proof {sub}")),
    }
}

fn cmd_study(sub: &str, flags: Flags, config: LedgerConfig) {
    let mut ledger = load_ledger(config);
    match sub {
        "record" => {
            let ctx = flags.context();
            let day = flags
                .named
                .get("day")
                .map(|raw| parse_u64("day", raw))
                .unwrap_or(ctx.timestamp);
            let study_time = encrypt(&mut ledger, &ctx, flags.number("time"));
            let focus_level = encrypt(&mut ledger, &ctx, flags.number("focus"));
            let bucket = ledger
                .record_study_data(&ctx, day, &study_time, &focus_level)
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
            println!("day={bucket}");
        }
        "show" => {
            let data = ledger.get_study_data(flags.identity("student"), flags.number("day"));
            println!(
                "study_time={} focus_level={} exists={}",
                data.study_time, data.focus_level, data.exists
            );
        }
        "days" => {
            for day in ledger.get_study_days(flags.identity("student")) {
                println!("{day}");
            }
        }
        _ => fatal(&format!("Unknown subcommand: study {sub}")),
    }
}

fn cmd_checkin(sub: &str, flags: Flags, config: LedgerConfig) {
    let mut ledger = load_ledger(config);
    match sub {
        "do" => {
            let ctx = flags.context();
            let study_time = encrypt(&mut ledger, &ctx, flags.number("time"));
            let streak = ledger
                .check_in(&ctx, &study_time)
                .unwrap_or_else(|err| fatal(&err.reason()));
            save_ledger(ledger);
            println!("consecutive_days={streak}");
        }
        "stats" => {
            let stats = ledger.get_check_in_stats(flags.identity("student"));
            println!(
                "consecutive_days={} last_check_in_day={}",
                stats.consecutive_days, stats.last_check_in_day
            );
        }
        _ => fatal(&format!("Unknown subcommand: checkin {sub}")),
    }
}

fn cmd_reveal(flags: Flags, config: LedgerConfig) {
    let ledger = load_ledger(config);
    let handle: Handle = flags
        .text("handle")
        .parse()
        .unwrap_or_else(|err| fatal(&format!("invalid handle: {err}")));
    let value = ledger
        .gateway()
        .reveal(handle, flags.identity("as"))
        .unwrap_or_else(|err| fatal(&err.to_string()));
    println!("{value}");
}

fn cmd_events(config: LedgerConfig) {
    let ledger = load_ledger(config);
    for event in ledger.events() {
        let line = serde_json::to_string(event)
            .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"));
        println!("{line}");
    }
}
