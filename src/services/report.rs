//! Report service
//!
//! Loads the ledger from a store and produces the budget and position
//! reports, both as data and as rendered text.

use crate::clock::Clock;
use crate::config::Settings;
use crate::display::report::{format_budget_report, format_position_report};
use crate::error::{BudgetError, BudgetResult};
use crate::ledger;
use crate::models::period::horizon;
use crate::models::Entry;
use crate::reports::{BudgetOptions, BudgetReport, PositionReport};
use crate::storage::LedgerStore;

/// Report mode word that shows every envelope
pub const FULL_MODE: &str = "full";

/// Parameters of a budget report request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    /// Months after the current one to include
    pub months_ahead: u32,
    /// Hide fixed and savings envelopes
    pub filtered: bool,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            months_ahead: 0,
            filtered: true,
        }
    }
}

impl ReportRequest {
    /// Parse command arguments: `[MONTHS] [full]`
    ///
    /// MONTHS defaults to 0 and must be a non-negative integer. The only
    /// accepted second argument is `full`, which turns filtering off.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> BudgetResult<Self> {
        let months_ahead = match args.first() {
            Some(arg) => arg
                .as_ref()
                .trim()
                .parse::<u32>()
                .map_err(|_| BudgetError::invalid_horizon())?,
            None => 0,
        };

        let filtered = match args.get(1).map(|arg| arg.as_ref().trim()) {
            None => true,
            Some(mode) if mode.eq_ignore_ascii_case(FULL_MODE) => false,
            Some(mode) => return Err(BudgetError::unknown_report_mode(mode)),
        };

        Ok(Self {
            months_ahead,
            filtered,
        })
    }
}

/// Service for ledger reports
pub struct ReportService<'a, S: LedgerStore, C: Clock> {
    store: &'a S,
    settings: &'a Settings,
    clock: &'a C,
}

impl<'a, S: LedgerStore, C: Clock> ReportService<'a, S, C> {
    /// Create a new report service
    pub fn new(store: &'a S, settings: &'a Settings, clock: &'a C) -> Self {
        Self {
            store,
            settings,
            clock,
        }
    }

    /// Fetch and parse the ledger
    pub fn load_entries(&self) -> BudgetResult<Vec<Entry>> {
        let text = self.store.fetch()?;
        ledger::load_entries(&text, self.settings).map_err(|errors| {
            tracing::error!(errors = errors.len(), "Failed to load ledger");
            BudgetError::Ledger(errors)
        })
    }

    /// Budget report for a request
    pub fn budget_report(&self, request: &ReportRequest) -> BudgetResult<BudgetReport> {
        let horizon = horizon(self.clock.today(), request.months_ahead)
            .ok_or_else(BudgetError::invalid_horizon)?;
        let entries = self.load_entries()?;
        let options = BudgetOptions::from_settings(self.settings, request.filtered);

        let report = BudgetReport::generate(&entries, horizon, &options);
        tracing::info!(
            %horizon,
            filtered = request.filtered,
            rows = report.rows.len(),
            "Generated budget report"
        );
        Ok(report)
    }

    /// Position report as of today
    pub fn position_report(&self) -> BudgetResult<PositionReport> {
        let entries = self.load_entries()?;
        let today = self.clock.today();

        let report = PositionReport::generate(&entries, today, &self.settings.currencies)?;
        tracing::info!(as_of = %today, rows = report.rows.len(), "Generated position report");
        Ok(report)
    }

    /// Rendered budget report
    pub fn render_budget(&self, request: &ReportRequest) -> BudgetResult<String> {
        let report = self.budget_report(request)?;
        Ok(format_budget_report(&report, &self.settings.layout))
    }

    /// Rendered position report
    pub fn render_positions(&self) -> BudgetResult<String> {
        let report = self.position_report()?;
        Ok(format_position_report(&report, &self.settings.layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Money;
    use crate::storage::MemoryLedgerStore;
    use chrono::NaiveDate;

    const LEDGER: &str = r#"plugin "budget_eur"

2024-06-01 * "Fung" "June salary"
  Income:NL:Fung:Salary  -2500.00 EUR
  Assets:NL:ING:Checking59

2024-06-01 * "" "Assign groceries" #budget
  Expenses:Variable:Groceries  300 BGT_EUR
  Income:Available  -300 BGT_EUR

2024-06-01 * "" "Assign rent" #budget
  Expenses:Fixed:Rent  1000 BGT_EUR
  Income:Available  -1000 BGT_EUR

2024-06-03 * "ALBERT HEIJN" ""
  Expenses:Variable:Groceries  42.50 EUR
  Assets:NL:ING:Checking59  -42.50 EUR

2024-07-05 * "ALBERT HEIJN" ""
  Expenses:Variable:Groceries  10.00 EUR
  Assets:NL:ING:Checking59  -10.00 EUR
"#;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    #[test]
    fn test_request_from_args() {
        let none: [&str; 0] = [];
        assert_eq!(ReportRequest::from_args(&none).unwrap(), ReportRequest::default());

        let request = ReportRequest::from_args(&["2", "FULL"]).unwrap();
        assert_eq!(request.months_ahead, 2);
        assert!(!request.filtered);

        assert!(ReportRequest::from_args(&["1"]).unwrap().filtered);
    }

    #[test]
    fn test_request_rejects_unknown_mode() {
        for bad in ["ful", "short", "all"] {
            let err = ReportRequest::from_args(&["1", bad]).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(
                err.to_string(),
                format!("Error: Unknown report mode '{}'; use 'full' to show every envelope.", bad)
            );
        }
    }

    #[test]
    fn test_request_rejects_bad_horizon() {
        for bad in ["-1", "abc", "1.5"] {
            let err = ReportRequest::from_args(&[bad]).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(
                err.to_string(),
                "Error: Please provide a positive integer for the number of months ahead."
            );
        }
    }

    #[test]
    fn test_budget_report_from_store() {
        let settings = Settings::default();
        let store = MemoryLedgerStore::new(LEDGER, settings.clone());
        let clock = clock();
        let service = ReportService::new(&store, &settings, &clock);

        let report = service.budget_report(&ReportRequest::default()).unwrap();
        assert_eq!(report.horizon, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        let groceries = report.row("Expenses:Variable:Groceries").unwrap();
        assert_eq!(groceries.assigned_this_period, Money::from_cents(30000));
        assert_eq!(groceries.spent_this_period, Money::from_cents(4250));
        assert_eq!(groceries.remaining, Money::from_cents(25750));
        assert!(report.row("Expenses:Fixed:Rent").is_none());

        // salary 2500 in, 1300 assigned
        assert_eq!(report.available, Money::from_cents(120000));
    }

    #[test]
    fn test_budget_report_months_ahead() {
        let settings = Settings::default();
        let store = MemoryLedgerStore::new(LEDGER, settings.clone());
        let clock = clock();
        let service = ReportService::new(&store, &settings, &clock);

        let request = ReportRequest {
            months_ahead: 1,
            filtered: false,
        };
        let report = service.budget_report(&request).unwrap();

        let groceries = report.row("Expenses:Variable:Groceries").unwrap();
        assert_eq!(groceries.spent_this_period, Money::from_cents(1000));
        assert_eq!(groceries.spent_total, Money::from_cents(5250));
        assert!(report.row("Expenses:Fixed:Rent").is_some());
    }

    #[test]
    fn test_horizon_past_calendar_is_rejected() {
        let settings = Settings::default();
        let store = MemoryLedgerStore::new(LEDGER, settings.clone());
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        let service = ReportService::new(&store, &settings, &clock);

        let request = ReportRequest::from_args(&["4000000000"]).unwrap();
        let err = service.budget_report(&request).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Error: Please provide a positive integer for the number of months ahead."
        );
    }

    #[test]
    fn test_position_report_from_store() {
        let settings = Settings::default();
        let store = MemoryLedgerStore::new(LEDGER, settings.clone());
        let clock = clock();
        let service = ReportService::new(&store, &settings, &clock);

        let text = service.render_positions().unwrap();
        assert!(text.contains("Checking59        2457.50"));
    }

    #[test]
    fn test_oversized_amounts_fail_without_panicking() {
        let entry = "2024-06-01 * \"\" \"\"\n  Expenses:Variable:Groceries 90000000000000000 EUR\n  Assets:Cash -90000000000000000 EUR\n";
        let settings = Settings::default();
        let store = MemoryLedgerStore::new(format!("{}\n{}", entry, entry), settings.clone());
        let clock = clock();
        let service = ReportService::new(&store, &settings, &clock);

        assert!(service.position_report().unwrap_err().is_ledger());
        assert!(service.budget_report(&ReportRequest::default()).unwrap_err().is_ledger());
    }

    #[test]
    fn test_ledger_errors_surface() {
        let settings = Settings::default();
        let store = MemoryLedgerStore::new("2024-06-01 * \"\"\n  Assets:Cash 5 EUR\n", settings.clone());
        let clock = clock();
        let service = ReportService::new(&store, &settings, &clock);

        let err = service.render_budget(&ReportRequest::default()).unwrap_err();
        assert!(err.is_ledger());
        assert!(err.to_string().starts_with("Error loading ledger file:\nline 1:"));
    }
}
