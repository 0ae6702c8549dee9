use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::format::{ParseError, ParseErrorKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LoadError, TimestampError};
use crate::scoring::{engagement_score, ActivityStats};

pub type PlayerId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub engagement_score: i64,
    pub stats: ActivityStats,
    /// Last-active value exactly as it appeared in the roster
    pub last_active_raw: String,
    pub last_active: NaiveDateTime,
    pub current_team: Option<i64>,
    pub current_team_name: String,
}

impl Player {
    /// Builds a player and derives its engagement score from `stats`.
    pub fn new(id: PlayerId, stats: ActivityStats, last_active: NaiveDateTime) -> Self {
        Player {
            id,
            engagement_score: engagement_score(&stats),
            stats,
            last_active_raw: last_active.format("%Y-%m-%d %H:%M:%S").to_string(),
            last_active,
            current_team: None,
            current_team_name: String::new(),
        }
    }
}

/// Column names and their position in the legacy export layout, used when a
/// header cannot be matched by name.
const HISTORICAL_EVENTS_PARTICIPATED: (&str, usize) = ("historical_events_participated", 0);
const HISTORICAL_EVENT_ENGAGEMENTS: (&str, usize) = ("historical_event_engagements", 1);
const HISTORICAL_POINTS_EARNED: (&str, usize) = ("historical_points_earned", 2);
const HISTORICAL_POINTS_SPENT: (&str, usize) = ("historical_points_spent", 3);
const HISTORICAL_MESSAGES_SENT: (&str, usize) = ("historical_messages_sent", 4);
const CURRENT_TOTAL_POINTS: (&str, usize) = ("current_total_points", 5);
const DAYS_ACTIVE_LAST_30: (&str, usize) = ("days_active_last_30", 6);
const CURRENT_STREAK_VALUE: (&str, usize) = ("current_streak_value", 7);
const LAST_ACTIVE_TS: (&str, usize) = ("last_active_ts", 8);
const CURRENT_TEAM: (&str, usize) = ("current_team", 9);
const CURRENT_TEAM_NAME: (&str, usize) = ("current_team_name", 10);
const PLAYER_ID: (&str, usize) = ("player_id", 11);

struct Columns {
    events_participated: usize,
    event_engagements: usize,
    points_earned: usize,
    points_spent: usize,
    messages_sent: usize,
    total_points: usize,
    days_active: usize,
    streak: usize,
    last_active: usize,
    current_team: usize,
    current_team_name: usize,
    player_id: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |(name, fallback): (&str, usize)| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .unwrap_or(fallback)
        };

        Columns {
            events_participated: find(HISTORICAL_EVENTS_PARTICIPATED),
            event_engagements: find(HISTORICAL_EVENT_ENGAGEMENTS),
            points_earned: find(HISTORICAL_POINTS_EARNED),
            points_spent: find(HISTORICAL_POINTS_SPENT),
            messages_sent: find(HISTORICAL_MESSAGES_SENT),
            total_points: find(CURRENT_TOTAL_POINTS),
            days_active: find(DAYS_ACTIVE_LAST_30),
            streak: find(CURRENT_STREAK_VALUE),
            last_active: find(LAST_ACTIVE_TS),
            current_team: find(CURRENT_TEAM),
            current_team_name: find(CURRENT_TEAM_NAME),
            player_id: find(PLAYER_ID),
        }
    }

    fn required_len(&self) -> usize {
        [
            self.events_participated,
            self.event_engagements,
            self.points_earned,
            self.points_spent,
            self.messages_sent,
            self.total_points,
            self.days_active,
            self.streak,
            self.last_active,
            self.current_team,
            self.current_team_name,
            self.player_id,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// Parses a numeric attribute. Empty or non-numeric values are rejected,
/// never coerced to zero.
fn parse_number(value: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| LoadError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        })
}

fn parse_player_id(value: &str, row: usize) -> Result<PlayerId, LoadError> {
    value
        .trim()
        .parse::<PlayerId>()
        .map_err(|_| LoadError::InvalidNumber {
            row,
            column: PLAYER_ID.0,
            value: value.to_string(),
        })
}

fn parse_current_team(value: &str, row: usize) -> Result<Option<i64>, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| LoadError::InvalidNumber {
            row,
            column: CURRENT_TEAM.0,
            value: value.to_string(),
        })
}

/// Date-time layouts tried in order. Numeric fields may be unpadded.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A layout that matched but named a non-existent date or time says more
/// than one that did not match at all.
fn is_out_of_range(err: &ParseError) -> bool {
    matches!(err.kind(), ParseErrorKind::OutOfRange | ParseErrorKind::Impossible)
}

/// Parses a last-active timestamp such as `2025-08-13 0:00:00`.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a space or `T` and a
/// `H:M` or `H:M:S` time. A date without a time is read as midnight.
pub fn parse_last_active(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Empty);
    }

    let mut first_err = None;
    let mut range_err = None;
    let mut note = |err: ParseError| {
        if is_out_of_range(&err) {
            range_err.get_or_insert(err);
        } else {
            first_err.get_or_insert(err);
        }
    };

    for format in DATE_TIME_FORMATS {
        match NaiveDateTime::parse_from_str(trimmed, format) {
            Ok(ts) => return Ok(ts),
            Err(err) => note(err),
        }
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        Ok(date) => return Ok(date.and_time(NaiveTime::MIN)),
        Err(err) => note(err),
    }

    match range_err.or(first_err) {
        Some(source) => Err(TimestampError::Invalid {
            value: trimmed.to_string(),
            source,
        }),
        None => Err(TimestampError::Empty),
    }
}

fn parse_record(record: &StringRecord, columns: &Columns, row: usize) -> Result<Player, LoadError> {
    let field = |index: usize| record.get(index).unwrap_or("");

    let stats = ActivityStats {
        historical_events_participated: parse_number(
            field(columns.events_participated),
            row,
            HISTORICAL_EVENTS_PARTICIPATED.0,
        )?,
        historical_event_engagements: parse_number(
            field(columns.event_engagements),
            row,
            HISTORICAL_EVENT_ENGAGEMENTS.0,
        )?,
        historical_points_earned: parse_number(field(columns.points_earned), row, HISTORICAL_POINTS_EARNED.0)?,
        historical_points_spent: parse_number(field(columns.points_spent), row, HISTORICAL_POINTS_SPENT.0)?,
        historical_messages_sent: parse_number(field(columns.messages_sent), row, HISTORICAL_MESSAGES_SENT.0)?,
        current_total_points: parse_number(field(columns.total_points), row, CURRENT_TOTAL_POINTS.0)?,
        days_active_last_30: parse_number(field(columns.days_active), row, DAYS_ACTIVE_LAST_30.0)?,
        current_streak_value: parse_number(field(columns.streak), row, CURRENT_STREAK_VALUE.0)?,
    };

    let last_active_raw = field(columns.last_active).trim().to_string();
    let last_active = parse_last_active(&last_active_raw).map_err(|source| LoadError::InvalidTimestamp {
        row,
        value: last_active_raw.clone(),
        source,
    })?;

    Ok(Player {
        id: parse_player_id(field(columns.player_id), row)?,
        engagement_score: engagement_score(&stats),
        stats,
        last_active_raw,
        last_active,
        current_team: parse_current_team(field(columns.current_team), row)?,
        current_team_name: field(columns.current_team_name).trim().to_string(),
    })
}

/// Reads a roster from any CSV source with a header row.
///
/// Rows are numbered from 1 for the first data row. Blank lines are skipped
/// by the CSV reader; any other malformed row aborts the load.
pub fn read_players<R: Read>(source: R) -> Result<Vec<Player>, LoadError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();
    let columns = Columns::from_headers(&headers);
    let required = columns.required_len();

    let mut players = Vec::new();
    let mut seen: HashSet<PlayerId> = HashSet::new();

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = result?;

        if record.len() < required {
            return Err(LoadError::ShortRow {
                row,
                expected: required,
                found: record.len(),
            });
        }

        let player = parse_record(&record, &columns, row)?;
        if !seen.insert(player.id) {
            return Err(LoadError::DuplicatePlayer { row, id: player.id });
        }
        debug!(row, id = player.id, score = player.engagement_score, "parsed player");
        players.push(player);
    }

    Ok(players)
}

/// Loads the roster CSV at `path`.
pub fn load_players<P: AsRef<Path>>(path: P) -> Result<Vec<Player>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let players = read_players(file)?;

    info!(count = players.len(), path = %path.display(), "loaded roster");
    Ok(players)
}
