use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "contract-reconciler",
    version,
    about = "Apply a day's recorded mileage to rental contracts"
)]
pub struct Cli {
    /// Date to reconcile (YYYY-MM-DD). Defaults to today on the local clock.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

impl Cli {
    pub fn target_date(&self) -> NaiveDate {
        self.date_or(chrono::Local::now().date_naive())
    }

    /// The requested date, or `today` when none was given.
    pub fn date_or(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explicit_date() {
        let cli = Cli::try_parse_from(["contract-reconciler", "--date", "2025-01-02"]).unwrap();
        assert_eq!(
            cli.target_date(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
    }

    #[test]
    fn date_is_optional() {
        let cli = Cli::try_parse_from(["contract-reconciler"]).unwrap();
        assert!(cli.date.is_none());
    }

    #[test]
    fn missing_date_falls_back_to_today() {
        let cli = Cli::try_parse_from(["contract-reconciler"]).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert_eq!(cli.date_or(today), today);
    }

    #[test]
    fn explicit_date_wins_over_today() {
        let cli = Cli::try_parse_from(["contract-reconciler", "-d", "2025-01-02"]).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert_eq!(cli.date_or(today), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn default_target_date_reads_the_local_clock() {
        let cli = Cli::try_parse_from(["contract-reconciler"]).unwrap();
        let before = chrono::Local::now().date_naive();
        let target = cli.target_date();
        let after = chrono::Local::now().date_naive();

        // Bracketed by two clock reads so a run across midnight still holds.
        assert!(target == before || target == after);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["contract-reconciler", "--date", "02/01/2025"]).is_err());
    }
}
