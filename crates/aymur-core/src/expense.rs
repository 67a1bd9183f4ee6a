//! # Recurring Expenses
//!
//! Cadence-based due-date arithmetic for recurring shop expenses (rent,
//! utilities, karigar wages, subscriptions).
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Recurring Expense Due Dates                               │
//! │                                                                         │
//! │  never paid:   next_due = start_date                                   │
//! │  paid before:  next_due = last_paid advanced by one cadence step       │
//! │                                                                         │
//! │  next_due < today   ──► Overdue { days }                               │
//! │  next_due = today   ──► DueToday                                       │
//! │  next_due > today   ──► Upcoming { days }                              │
//! │                                                                         │
//! │  Month-based cadences clamp to month length (Jan 31 + 1mo = Feb 28),   │
//! │  matching chrono `Months` semantics - the 31st is not resurrected      │
//! │  in March.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Cadence
// =============================================================================

/// How often a recurring expense comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Cadence {
    /// The next occurrence strictly after `date`.
    ///
    /// Month-based steps clamp the day-of-month to the target month's length.
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::expense::Cadence;
    /// use chrono::NaiveDate;
    ///
    /// let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    /// let feb28 = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
    /// assert_eq!(Cadence::Monthly.advance(jan31), feb28);
    /// ```
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        // checked arithmetic only fails far outside any plausible expense
        // date; fall back to the input rather than panic
        match self {
            Cadence::Daily => date.checked_add_days(Days::new(1)),
            Cadence::Weekly => date.checked_add_days(Days::new(7)),
            Cadence::Monthly => date.checked_add_months(Months::new(1)),
            Cadence::Quarterly => date.checked_add_months(Months::new(3)),
            Cadence::Yearly => date.checked_add_months(Months::new(12)),
        }
        .unwrap_or(date)
    }
}

// =============================================================================
// Due Status
// =============================================================================

/// Where an expense stands relative to today. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DueStatus {
    /// Past due by this many days.
    Overdue { days: i64 },
    /// Due today.
    DueToday,
    /// Due in this many days.
    Upcoming { days: i64 },
}

// =============================================================================
// Recurring Expense
// =============================================================================

/// A recurring shop expense.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecurringExpense {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop (tenant) scope.
    pub shop_id: String,

    /// Display name ("Shop rent", "Electricity").
    pub name: String,

    /// Amount in cents.
    pub amount_cents: i64,

    /// How often it recurs.
    pub cadence: Cadence,

    /// First due date.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Most recent payment date, if ever paid.
    #[ts(as = "Option<String>")]
    pub last_paid: Option<NaiveDate>,
}

impl RecurringExpense {
    /// The next due date.
    ///
    /// One cadence step after the last payment; if never paid, the start
    /// date itself is the first due date.
    pub fn next_due(&self) -> NaiveDate {
        match self.last_paid {
            Some(paid) => self.cadence.advance(paid),
            None => self.start_date,
        }
    }

    /// Due status relative to `today`.
    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        let next = self.next_due();
        let days = (next - today).num_days();
        match days {
            d if d < 0 => DueStatus::Overdue { days: -d },
            0 => DueStatus::DueToday,
            d => DueStatus::Upcoming { days: d },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
