use std::io::{BufRead, Write};

use chrono::{DateTime, Utc};
use cvs_core::validation::parse_report_month;
use cvs_core::{ReportPeriod, ValidationError};

use crate::console::Console;
use crate::error::CliResult;
use crate::render;
use crate::AppContext;

/// Reads the report period typed at the prompt.
///
/// Blank means the month containing `now`, `all` means every recorded sale
/// (`None`), anything else must be `YYYY-MM`.
pub fn parse_period(
    input: &str,
    now: DateTime<Utc>,
) -> Result<Option<ReportPeriod>, ValidationError> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(Some(ReportPeriod::month_containing(now)));
    }
    if input.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    parse_report_month(input).map(Some)
}

/// Employees ranked by sales value over a month (or all time).
pub async fn top_sellers<R: BufRead, W: Write>(
    ctx: &AppContext,
    console: &mut Console<R, W>,
) -> CliResult<()> {
    let period = loop {
        let input =
            console.prompt_line("Month (YYYY-MM, blank for this month, 'all' for all time): ")?;
        match parse_period(&input, Utc::now()) {
            Ok(period) => break period,
            Err(e) => console.say(e.to_string())?,
        }
    };

    let label = period
        .map(|p| p.label())
        .unwrap_or_else(|| "all time".to_string());

    let leaders = ctx
        .db
        .reports()
        .top_sellers(period, ctx.leaderboard_limit)
        .await?;

    if leaders.is_empty() {
        return console.say(format!("No sales recorded for {label}."));
    }

    console.say(render::leaderboard(&label, &leaders, &ctx.currency))
}
