use std::fmt::{self, Write};

use crate::draft::TeamSortResult;
use crate::report::{BalanceReport, Grade};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Formats an integer with thousands separators, e.g. `12,345`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.1}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

fn grade_mark(grade: Grade) -> &'static str {
    match grade {
        Grade::Excellent => "✅",
        Grade::Good => "⚠️",
        Grade::Poor => "❌",
    }
}

/// One `player → team` line per player, in draft order.
pub fn render_assignments(result: &TeamSortResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "--- Player Assignments ---\n")?;
    if result.mapping.is_empty() {
        writeln!(out, "(no players)")?;
    }
    for (player, team) in result.mapping.iter() {
        writeln!(out, "{} → {}", player, team)?;
    }
    Ok(out)
}

/// Short per-team summary with size and average engagement.
pub fn render_team_summary(result: &TeamSortResult, report: &BalanceReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\n--- Team Summary ---")?;

    for team in &result.teams {
        let deviation = (team.avg_engagement - report.mean_engagement).abs();
        writeln!(out, "\nTeam {}:", team.id)?;
        writeln!(out, "  Size: {} players", team.size)?;
        writeln!(
            out,
            "  Average Engagement: {:.0} (deviation: {:.0})",
            team.avg_engagement, deviation
        )?;
    }

    writeln!(out, "\nOverall Fairness:")?;
    writeln!(
        out,
        "  Size variance: {} (max 1 allowed) {}",
        report.size_variance,
        mark(report.size_variance <= 1)
    )?;
    writeln!(
        out,
        "  Engagement variance: {:.0} ({:.1}% of average)",
        report.engagement_spread, report.engagement_spread_pct
    )?;
    Ok(out)
}

/// Full balance analysis. `detailed` adds score ranges.
pub fn render_balance_report(report: &BalanceReport, detailed: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\n=== TEAM BALANCE ANALYSIS ===\n")?;

    writeln!(out, "📊 TEAM SIZE DISTRIBUTION:")?;
    for team in &report.teams {
        writeln!(
            out,
            "  Team {}: {} players ({}) {}",
            team.id,
            team.size,
            signed(team.size_deviation),
            mark(team.size_deviation.abs() <= 1.0)
        )?;
    }
    writeln!(
        out,
        "  Size variance: {} (max 1 allowed) {}\n",
        report.size_variance,
        mark(report.size_variance <= 1)
    )?;

    writeln!(out, "⚖️  ENGAGEMENT DISTRIBUTION:")?;
    for team in &report.teams {
        writeln!(
            out,
            "  Team {}: {:.0} ({}%) {}",
            team.id,
            team.avg_engagement,
            signed(team.deviation_pct),
            grade_mark(team.grade)
        )?;
    }
    writeln!(
        out,
        "  Engagement variance: {:.0} ({:.1}% of average)",
        report.engagement_spread, report.engagement_spread_pct
    )?;
    writeln!(out, "  Standard deviation: {:.0}\n", report.engagement_std_dev)?;

    writeln!(out, "🏆 TOP PLAYERS PER TEAM:")?;
    for team in &report.teams {
        writeln!(out, "  Team {}:", team.id)?;
        for ((player, score), medal) in team.top_players.iter().zip(MEDALS) {
            writeln!(out, "    {} Player {}: {} points", medal, player, format_thousands(*score))?;
        }
    }

    writeln!(out, "\n📈 FAIRNESS ASSESSMENT:")?;
    writeln!(
        out,
        "  Team size balance: {} (variance: {})",
        report.size_grade.label(),
        report.size_variance
    )?;
    writeln!(
        out,
        "  Engagement balance: {} (max deviation: {:.0})",
        report.engagement_grade.label(),
        report.max_deviation
    )?;
    writeln!(out, "  Overall fairness: {}", report.overall.label())?;

    if detailed {
        writeln!(out, "\n🔍 DETAILED ANALYSIS:")?;
        if let Some(range) = report.score_range {
            writeln!(
                out,
                "  Engagement score range: {} - {} (span: {})",
                format_thousands(range.min),
                format_thousands(range.max),
                format_thousands(range.span())
            )?;
        }
        for team in &report.teams {
            match team.score_range {
                Some(range) => {
                    writeln!(
                        out,
                        "  Team {} score range: {} - {} (span: {})",
                        team.id,
                        format_thousands(range.min),
                        format_thousands(range.max),
                        format_thousands(range.span())
                    )?;
                }
                None => {
                    writeln!(out, "  Team {} score range: [EMPTY]", team.id)?;
                }
            }
        }
    }

    writeln!(out, "\n=== END ANALYSIS ===")?;
    Ok(out)
}
