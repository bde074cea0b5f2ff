use cerberus_core::{Result, TimeTuple};
use cerberus_cron::{Field, Schedule};
use chrono::{DateTime, FixedOffset, Local};
use eyre::WrapErr;
use std::fmt::Write;

pub fn execute(expression: &str, at: Option<&str>) -> eyre::Result<()> {
    let at = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .wrap_err_with(|| format!("invalid --at value '{raw}'"))?,
        None => Local::now().into(),
    };
    print!("{}", describe(expression, &at)?);
    Ok(())
}

/// The expanded fields of `expression`, whether it matches `at` and when it
/// fires next
pub fn describe(expression: &str, at: &DateTime<FixedOffset>) -> Result<String> {
    let schedule = Schedule::parse(expression)?;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "expression   {schedule}");
    for field in Field::ALL {
        let _ = writeln!(out, "{:<12} {}", field.name(), schedule.field(field));
    }

    let verdict = if schedule.matches(&TimeTuple::from(at)) {
        "matches"
    } else {
        "does not match"
    };
    let _ = writeln!(out, "{}  {verdict}", at.to_rfc3339());
    match schedule.next_after(at) {
        Some(next) => {
            let _ = writeln!(out, "next         {}", next.to_rfc3339());
        }
        None => {
            let _ = writeln!(out, "next         never");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_quarter_hours() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T12:15:00+00:00").unwrap();
        let text = describe("*/15 * * * *", &at).unwrap();
        assert!(text.contains("0,15,30,45"));
        assert!(text.contains("  matches"));
        assert!(text.contains("next         2024-03-05T12:30:00+00:00"));
    }

    #[test]
    fn test_describe_rejects_garbage() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T12:15:00+00:00").unwrap();
        assert!(describe("* * *", &at).is_err());
    }
}
