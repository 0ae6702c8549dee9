use std::collections::HashSet;
use std::io::Write;
use std::process::Command;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;

use team_sorter::error::{LoadError, SortError};
use team_sorter::report::BalanceReport;
use team_sorter::{sort_players, SortConfig};

const HEADER: &str = "historical_events_participated,historical_event_engagements,historical_points_earned,historical_points_spent,historical_messages_sent,current_total_points,days_active_last_30,current_streak_value,last_active_ts,current_team,current_team_name,player_id";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Writes a roster of `count` players. Scores repeat every `distinct`
/// players so ties are common.
fn roster_file(count: u64, distinct: u64) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for id in 0..count {
        let events = id % distinct;
        let day = 1 + id % 28;
        writeln!(
            file,
            "{events},{},{},{},3,40,12,2,2025-{}-{day} {}:5:0,1,Old Team,{}",
            events * 2,
            100 + events * 10,
            50 + events,
            if id % 5 == 0 { 6 } else { 8 },
            id % 24,
            5000 + id
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

fn run(file: &NamedTempFile, teams: usize, seed: Option<i64>) -> team_sorter::draft::TeamSortResult {
    sort_players(&SortConfig::new(file.path(), teams, seed), now()).unwrap()
}

#[test]
fn every_player_assigned_once_to_a_valid_team() {
    let file = roster_file(47, 6);
    let result = run(&file, 5, Some(11));

    assert_eq!(result.mapping.len(), 47);
    let ids: HashSet<u64> = result.mapping.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, (5000..5047).collect::<HashSet<u64>>());
    assert!(result.mapping.iter().all(|(_, team)| (1..=5).contains(&team)));
}

#[test]
fn sizes_differ_by_at_most_one() {
    for teams in 2..=8 {
        let file = roster_file(53, 4);
        let result = run(&file, teams, Some(3));

        let sizes: Vec<usize> = result.teams.iter().map(|t| t.size).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1, "sizes {sizes:?} for {teams} teams");
        assert!(max <= 53usize.div_ceil(teams));
    }
}

#[test]
fn summaries_account_for_every_point() {
    let file = roster_file(30, 7);
    let result = run(&file, 4, None);

    let players: usize = result.teams.iter().map(|t| t.size).sum();
    let engagement: i64 = result.teams.iter().map(|t| t.total_engagement).sum();
    let roster_total: i64 = result
        .teams
        .iter()
        .flat_map(|t| t.players.iter())
        .map(|p| p.engagement_score)
        .sum();

    assert_eq!(players, 30);
    assert_eq!(engagement, roster_total);
}

#[test]
fn same_seed_same_mapping() {
    let file = roster_file(60, 3);
    let first = run(&file, 4, Some(2024));
    let second = run(&file, 4, Some(2024));
    assert_eq!(first.mapping, second.mapping);
}

#[test]
fn nine_players_three_teams() {
    let file = roster_file(9, 9);
    let result = run(&file, 3, Some(42));
    let sizes: Vec<usize> = result.teams.iter().map(|t| t.size).collect();
    assert_eq!(sizes, vec![3, 3, 3]);
}

#[test]
fn ten_players_three_teams() {
    let file = roster_file(10, 10);
    let result = run(&file, 3, Some(42));
    let mut sizes: Vec<usize> = result.teams.iter().map(|t| t.size).collect();
    sizes.sort();
    assert_eq!(sizes, vec![3, 3, 4]);
}

#[test]
fn seed_parity_flips_first_pick() {
    // Distinct scores: the top player is always drafted first.
    let file = roster_file(6, 6);
    let top = 5005;

    let even = run(&file, 3, Some(42));
    assert_eq!(even.mapping.team_of(top), Some(1));

    let odd = run(&file, 3, Some(43));
    assert_eq!(odd.mapping.team_of(top), Some(3));
}

#[test]
fn report_over_balanced_roster_is_not_poor_on_size() {
    let file = roster_file(40, 8);
    let result = run(&file, 4, Some(8));
    let report = BalanceReport::from_teams(&result.teams);
    assert_eq!(report.size_variance, 0);
    assert_eq!(report.total_players, 40);
}

#[test]
fn missing_input_is_a_load_error() {
    let err = sort_players(&SortConfig::new("does/not/exist.csv", 3, None), now()).unwrap_err();
    assert!(matches!(err, SortError::Load(LoadError::NotFound(_))));
}

#[test]
fn malformed_row_aborts_the_run() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "1,2,3,4,5,6,7,8,2025-08-01 1:0:0,1,A,1").unwrap();
    writeln!(file, "1,2,3,four,5,6,7,8,2025-08-01 1:0:0,1,A,2").unwrap();
    file.flush().unwrap();

    let err = sort_players(&SortConfig::new(file.path(), 2, None), now()).unwrap_err();
    assert!(matches!(
        err,
        SortError::Load(LoadError::InvalidNumber { row: 2, .. })
    ));
}

#[test]
fn cli_prints_mapping_and_report() {
    let file = roster_file(12, 12);
    let output = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["--teams", "3", "--seed", "42", "--detailed", "--input"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- Player Assignments ---"));
    assert!(stdout.contains("5011 → 1"));
    assert!(stdout.contains("Overall fairness:"));
    assert!(stdout.contains("DETAILED ANALYSIS"));
}

#[test]
fn cli_json_output_parses() {
    let file = roster_file(8, 8);
    let output = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["-t", "2", "-s", "-5", "--json", "-i"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["teams"].as_array().unwrap().len(), 2);
    assert_eq!(value["mapping"]["assignments"].as_array().unwrap().len(), 8);
}

#[test]
fn cli_rejects_bad_team_count_and_seed() {
    let bad_teams = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["--teams", "1", "--input", "whatever.csv"])
        .output()
        .unwrap();
    assert!(!bad_teams.status.success());

    let huge_teams = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["--teams", "18446744073709551615", "--input", "whatever.csv"])
        .output()
        .unwrap();
    assert!(!huge_teams.status.success());
    assert!(String::from_utf8_lossy(&huge_teams.stderr).contains("at most 10000"));
    assert!(!String::from_utf8_lossy(&huge_teams.stderr).contains("panicked"));

    let bad_seed = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["--teams", "3", "--seed", "abc", "--input", "whatever.csv"])
        .output()
        .unwrap();
    assert!(!bad_seed.status.success());
    assert!(String::from_utf8_lossy(&bad_seed.stderr).contains("seed"));
}

#[test]
fn cli_reports_missing_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_team-sorter"))
        .args(["--teams", "3", "--input", "no/such/roster.csv"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
