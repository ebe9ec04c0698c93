//! `ghtally days` command.

use chrono::NaiveDate;

use crate::dates;

/// Execute the `days` command: print every day in `[from, to]`.
///
/// # Errors
///
/// Returns an error string if either date is malformed or the range runs backwards.
pub fn run(from: &str, to: &str) -> Result<(), String> {
    for day in list(from, to)? {
        println!("{day}");
    }
    Ok(())
}

fn list(from: &str, to: &str) -> Result<Vec<NaiveDate>, String> {
    let from = dates::parse_day(from).map_err(|e| e.to_string())?;
    let to = dates::parse_day(to).map_err(|e| e.to_string())?;
    dates::check_range(from, to).map_err(|e| e.to_string())?;
    Ok(dates::each_day(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_days_across_a_month_boundary() {
        let days: Vec<String> =
            list("2024-01-30", "2024-02-02").unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(days, ["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]);
    }

    #[test]
    fn rejects_backwards_range() {
        let err = list("2024-02-02", "2024-01-30").unwrap_err();
        assert!(err.contains("is after"));
    }
}
