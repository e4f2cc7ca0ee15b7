//! One struct per financial statement.
//!
//! Every line is an explicit field; nothing is looked up by name, so a
//! missing line is a compile error rather than a silent zero.

mod balance;
mod cash_flow;
mod income;

pub use balance::BalanceSheet;
pub use cash_flow::CashFlowStatement;
pub use income::IncomeStatement;
