// src/cron/expression.rs

//! Parses the two schedule syntaxes the spec accepts: standard 5-field cron
//! (`min hour day month dow`) and `@every <duration>` (e.g. `@every 1s`,
//! `@every 5m`, `@every 2h`).
//!
//! The `cron` crate parses 6-or-7-field expressions (seconds first, optional
//! trailing year); a leading `0 ` is prepended to adapt a 5-field expression
//! without requiring callers to write a seconds field themselves.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::errors::Error;

#[derive(Debug, Clone)]
pub enum Expression {
    Cron(cron::Schedule),
    Every(Duration),
}

impl Expression {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("@every ") {
            return parse_every(rest).map(Expression::Every);
        }

        let six_field = format!("0 {raw}");
        cron::Schedule::from_str(&six_field)
            .map(Expression::Cron)
            .map_err(|e| Error::Scheduler(format!("invalid cron expression '{raw}': {e}")))
    }

    /// Duration to wait from `now` until this expression's next fire.
    pub fn next_delay(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Expression::Every(d) => Some(*d),
            Expression::Cron(schedule) => {
                let next = schedule.after(&now).next()?;
                (next - now).to_std().ok()
            }
        }
    }
}

fn parse_every(rest: &str) -> Result<Duration, Error> {
    let rest = rest.trim();
    let (digits, suffix) = rest.split_at(
        rest.find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| Error::Scheduler(format!("invalid @every duration '{rest}'")))?,
    );
    let amount: u64 = digits
        .parse()
        .map_err(|_| Error::Scheduler(format!("invalid @every duration '{rest}'")))?;

    let seconds = match suffix {
        "s" => amount,
        "m" => amount * 60,
        "h" => amount * 3600,
        other => {
            return Err(Error::Scheduler(format!(
                "invalid @every duration unit '{other}' (expected s, m or h)"
            )))
        }
    };

    if seconds == 0 {
        return Err(Error::Scheduler("@every duration must be > 0".to_string()));
    }

    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_seconds() {
        let expr = Expression::parse("@every 30s").unwrap();
        assert!(matches!(expr, Expression::Every(d) if d == Duration::from_secs(30)));
    }

    #[test]
    fn parses_every_hours() {
        let expr = Expression::parse("@every 2h").unwrap();
        assert!(matches!(expr, Expression::Every(d) if d == Duration::from_secs(7200)));
    }

    #[test]
    fn parses_five_field_cron() {
        let expr = Expression::parse("0 * * * *").unwrap();
        assert!(matches!(expr, Expression::Cron(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Expression::parse("not a cron expr").is_err());
        assert!(Expression::parse("@every xyz").is_err());
        assert!(Expression::parse("@every 0s").is_err());
    }
}
