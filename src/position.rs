use chrono::{Months, NaiveDate};

/// The single holding shown on the dashboard. Fixed for the life of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentPosition {
    pub fund_name: &'static str,
    pub category: &'static str,
    pub invested_amount: f64,
    pub current_value: f64,
    pub start_date: NaiveDate,
    pub lock_in_years: u32,
    pub return_percentage: f64,
    pub withdrawal_message: &'static str,
    pub nav: f64,
    pub units_held: f64,
    pub fund_count: u32,
}

impl InvestmentPosition {
    pub fn sbi_elss() -> Self {
        Self {
            fund_name: "SBI ELSS Fund",
            category: "Equity • ELSS",
            invested_amount: 180_000.0,
            current_value: 187_200.0,
            start_date: NaiveDate::from_ymd_opt(2024, 4, 12).unwrap_or_default(),
            lock_in_years: 3,
            return_percentage: 4.0,
            withdrawal_message: "You can withdraw only after 24 months",
            nav: 142.45,
            units_held: 1_263.54,
            fund_count: 1,
        }
    }

    pub fn profit(&self) -> f64 {
        self.current_value - self.invested_amount
    }

    pub fn is_positive(&self) -> bool {
        self.profit() >= 0.0
    }

    /// Start date plus the lock-in period.
    pub fn lock_in_ends(&self) -> Option<NaiveDate> {
        self.start_date
            .checked_add_months(Months::new(self.lock_in_years * 12))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundManager {
    pub name: &'static str,
    pub title: &'static str,
    pub credentials: &'static str,
    pub bio: &'static str,
    pub company: &'static str,
    pub address: [&'static str; 2],
}

impl FundManager {
    pub fn rakesh_gupta() -> Self {
        Self {
            name: "Mr. Rakesh Gupta",
            title: "Senior Fund Manager",
            credentials: "CFA, MBA (Finance) • 18+ Years Exp.",
            bio: "Specializes in long-term equity wealth creation with a focus on sustainable growth companies.",
            company: "Rakesh & Associates",
            address: ["1402, SBC Park, Baner,", "Pune, 411045"],
        }
    }
}
