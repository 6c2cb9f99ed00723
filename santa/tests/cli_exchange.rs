//! CLI tests for the `santa` binary.
//!
//! Spawns the binary against a scratch directory and checks exit codes and
//! the files it leaves behind.

use std::path::Path;
use std::process::{Command, Output};

use santa::core::types::ParticipantId;
use santa::exit_codes;
use santa::io::config::{CONFIG_FILE, SantaConfig, load_config};
use santa::io::store::ExchangeStore;
use santa::test_support::{TestExchangeDir, assert_derangement};

fn santa(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_santa"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("run santa")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn create_join_draw_show() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();

    let steps: &[&[&str]] = &[
        &["create", "Christmas 2023", "--budget", "50"],
        &["join", "Christmas 2023", "JP", "20"],
        &["join", "Christmas 2023", "Nick", "24"],
        &["join", "Christmas 2023", "Tara", "3"],
        &["wish", "Christmas 2023", "20", "Plato: Symposium"],
        &["draw", "Christmas 2023", "--seed", "7"],
    ];
    for args in steps {
        let output = santa(root, args);
        assert_eq!(output.status.code(), Some(exit_codes::OK), "santa {:?}", args);
    }
    assert!(root.join("exchange_Christmas_2023.json").exists());

    let roster = ExchangeStore::new(root)
        .load("Christmas 2023")
        .expect("load");
    assert_eq!(roster.budget(), 50.0);
    assert_derangement(&roster);

    let shown = santa(root, &["show", "Christmas 2023"]);
    assert_eq!(
        stdout(&shown),
        "Christmas 2023:\n- JP: ['Plato: Symposium']\n- Nick: []\n- Tara: []\n"
    );

    let pairs = santa(root, &["pairs", "Christmas 2023"]);
    assert_eq!(stdout(&pairs).lines().count(), 3);
}

#[test]
fn duplicate_name_is_rejected() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    assert_eq!(santa(root, &["create", "Party"]).status.code(), Some(exit_codes::OK));
    assert_eq!(
        santa(root, &["join", "Party", "JP", "20"]).status.code(),
        Some(exit_codes::OK)
    );
    assert_eq!(
        santa(root, &["join", "Party", "JP", "21"]).status.code(),
        Some(exit_codes::REJECTED)
    );

    let roster = ExchangeStore::new(root).load("Party").expect("load");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster.budget(), 20.0);
}

#[test]
fn assign_rejects_self_gifting_and_keeps_pointer() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    for args in [
        &["create", "Pair"][..],
        &["join", "Pair", "JP", "20"][..],
        &["join", "Pair", "Nick", "24"][..],
        &["assign", "Pair", "20=24", "24=20"][..],
    ] {
        assert_eq!(santa(root, args).status.code(), Some(exit_codes::OK), "santa {:?}", args);
    }

    let rejected = santa(root, &["assign", "Pair", "20=20", "24=24"]);
    assert_eq!(rejected.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("assigned to themselves"));

    let roster = ExchangeStore::new(root).load("Pair").expect("load");
    assert_eq!(roster.pointer().get(ParticipantId(20)), Some(ParticipantId(24)));

    let reveal = santa(root, &["reveal", "Pair", "24"]);
    assert_eq!(reveal.status.code(), Some(exit_codes::OK));
    assert!(stdout(&reveal).contains("you are buying a gift for JP"));
}

#[test]
fn single_participant_cannot_draw() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    santa(root, &["create", "Solo"]);
    santa(root, &["join", "Solo", "JP", "20"]);
    assert_eq!(
        santa(root, &["draw", "Solo"]).status.code(),
        Some(exit_codes::REJECTED)
    );
}

#[test]
fn missing_exchange_is_invalid() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let output = santa(dir.path(), &["show", "Nowhere"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("read exchange"));
}

#[test]
fn assign_rejects_repeated_givers() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    for args in [
        &["create", "Pair"][..],
        &["join", "Pair", "JP", "20"][..],
        &["join", "Pair", "Nick", "24"][..],
    ] {
        assert_eq!(santa(root, args).status.code(), Some(exit_codes::OK), "santa {:?}", args);
    }

    let rejected = santa(root, &["assign", "Pair", "20=20", "24=20", "20=24"]);
    assert_eq!(rejected.status.code(), Some(exit_codes::REJECTED));
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("giver 20 is listed more than once"));

    let roster = ExchangeStore::new(root).load("Pair").expect("load");
    assert_eq!(roster.pointer().get(ParticipantId(20)), None);
    assert_eq!(roster.pointer().get(ParticipantId(24)), None);
}

#[test]
fn init_writes_default_config_once() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    let path = root.join(CONFIG_FILE);

    assert_eq!(santa(root, &["init"]).status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load config"), SantaConfig::default());

    std::fs::write(&path, "default_budget = 35.0\n").expect("edit config");
    assert_eq!(santa(root, &["init"]).status.code(), Some(exit_codes::REJECTED));
    assert_eq!(load_config(&path).expect("load config").default_budget, 35.0);

    assert_eq!(santa(root, &["create", "Office"]).status.code(), Some(exit_codes::OK));
    assert_eq!(ExchangeStore::new(root).load("Office").expect("load").budget(), 35.0);

    assert_eq!(santa(root, &["init", "--force"]).status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load config"), SantaConfig::default());
}

#[test]
fn negative_budget_is_invalid_and_not_written() {
    let dir = TestExchangeDir::new().expect("tempdir");
    let root = dir.path();
    let output = santa(root, &["create", "Broke", "--budget=-5"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(!root.join("exchange_Broke.json").exists());
}
