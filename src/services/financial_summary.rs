//! Resumen financiero
//!
//! Reagrega el conjunto completo de transacciones en cada consulta; no
//! existen totales persistidos.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind, TransactionStatus};

/// Meses mostrados por defecto en el flujo de caja
pub const DEFAULT_CASHFLOW_MONTHS: usize = 6;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    pub accounts_receivable: Decimal,
    pub accounts_payable: Decimal,
    pub current_balance: Decimal,
    pub overdue_receivable: Decimal,
    pub monthly_cash_flow: Vec<MonthlyCashFlow>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyCashFlow {
    pub year: i32,
    pub month: u32,
    /// "2024-03"
    pub label: String,
    pub revenue: Decimal,
    pub expense: Decimal,
}

/// Calcula los totales y la serie mensual de los últimos `months` meses con movimiento
pub fn summarize(transactions: &[Transaction], today: NaiveDate, months: usize) -> FinancialSummary {
    let mut total_revenue = Decimal::ZERO;
    let mut paid_expense = Decimal::ZERO;
    let mut accounts_receivable = Decimal::ZERO;
    let mut accounts_payable = Decimal::ZERO;
    let mut overdue_receivable = Decimal::ZERO;

    for tx in transactions {
        match (tx.kind, tx.status) {
            (TransactionKind::Revenue, TransactionStatus::Paid) => total_revenue += tx.amount,
            (TransactionKind::Revenue, TransactionStatus::Pending) => {
                accounts_receivable += tx.amount;
                if tx.is_overdue(today) {
                    overdue_receivable += tx.amount;
                }
            }
            (TransactionKind::Expense, TransactionStatus::Paid) => paid_expense += tx.amount,
            (TransactionKind::Expense, TransactionStatus::Pending) => accounts_payable += tx.amount,
        }
    }

    FinancialSummary {
        total_revenue,
        accounts_receivable,
        accounts_payable,
        current_balance: total_revenue - paid_expense,
        overdue_receivable,
        monthly_cash_flow: monthly_cash_flow(transactions, months),
    }
}

/// Agrupa las transacciones PAID por mes calendario de `transaction_date`,
/// en orden cronológico, conservando sólo los `months` meses más recientes.
pub fn monthly_cash_flow(transactions: &[Transaction], months: usize) -> Vec<MonthlyCashFlow> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| tx.status == TransactionStatus::Paid) {
        let key = (tx.transaction_date.year(), tx.transaction_date.month());
        let bucket = buckets.entry(key).or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.kind {
            TransactionKind::Revenue => bucket.0 += tx.amount,
            TransactionKind::Expense => bucket.1 += tx.amount,
        }
    }

    let skip = buckets.len().saturating_sub(months);
    buckets
        .into_iter()
        .skip(skip)
        .map(|((year, month), (revenue, expense))| MonthlyCashFlow {
            year,
            month,
            label: format!("{:04}-{:02}", year, month),
            revenue,
            expense,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: TransactionKind, status: TransactionStatus, amount: i64, date: NaiveDate) -> Transaction {
        let mut tx = Transaction::new(kind, "teste".into(), Decimal::new(amount, 0), date);
        tx.status = status;
        tx
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_summary_figures() {
        let d = date(2024, 4, 1);
        let transactions = vec![
            tx(TransactionKind::Revenue, TransactionStatus::Paid, 100, d),
            tx(TransactionKind::Revenue, TransactionStatus::Pending, 50, d),
            tx(TransactionKind::Expense, TransactionStatus::Paid, 30, d),
            tx(TransactionKind::Expense, TransactionStatus::Pending, 20, d),
        ];

        let summary = summarize(&transactions, d, DEFAULT_CASHFLOW_MONTHS);
        assert_eq!(summary.total_revenue, Decimal::new(100, 0));
        assert_eq!(summary.accounts_receivable, Decimal::new(50, 0));
        assert_eq!(summary.accounts_payable, Decimal::new(20, 0));
        assert_eq!(summary.current_balance, Decimal::new(70, 0));
    }

    #[test]
    fn test_empty_set() {
        let summary = summarize(&[], date(2024, 1, 1), DEFAULT_CASHFLOW_MONTHS);
        assert_eq!(summary.current_balance, Decimal::ZERO);
        assert!(summary.monthly_cash_flow.is_empty());
    }

    #[test]
    fn test_overdue_receivable() {
        let today = date(2024, 6, 10);
        let mut late = tx(TransactionKind::Revenue, TransactionStatus::Pending, 80, date(2024, 5, 1));
        late.due_date = Some(date(2024, 6, 1));
        let mut on_time = tx(TransactionKind::Revenue, TransactionStatus::Pending, 40, date(2024, 5, 1));
        on_time.due_date = Some(date(2024, 6, 30));

        let summary = summarize(&[late, on_time], today, DEFAULT_CASHFLOW_MONTHS);
        assert_eq!(summary.overdue_receivable, Decimal::new(80, 0));
        assert_eq!(summary.accounts_receivable, Decimal::new(120, 0));
    }

    #[test]
    fn test_monthly_cash_flow_groups_paid_only() {
        let transactions = vec![
            tx(TransactionKind::Revenue, TransactionStatus::Paid, 100, date(2024, 2, 3)),
            tx(TransactionKind::Revenue, TransactionStatus::Paid, 50, date(2024, 2, 28)),
            tx(TransactionKind::Expense, TransactionStatus::Paid, 30, date(2024, 2, 10)),
            tx(TransactionKind::Revenue, TransactionStatus::Pending, 999, date(2024, 2, 10)),
            tx(TransactionKind::Expense, TransactionStatus::Paid, 10, date(2023, 12, 31)),
        ];

        let series = monthly_cash_flow(&transactions, 6);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "2023-12");
        assert_eq!(series[0].expense, Decimal::new(10, 0));
        assert_eq!(series[1].label, "2024-02");
        assert_eq!(series[1].revenue, Decimal::new(150, 0));
        assert_eq!(series[1].expense, Decimal::new(30, 0));
    }

    #[test]
    fn test_monthly_cash_flow_keeps_most_recent() {
        let transactions: Vec<Transaction> = (1..=12)
            .map(|m| tx(TransactionKind::Revenue, TransactionStatus::Paid, m as i64, date(2024, m, 1)))
            .collect();

        let series = monthly_cash_flow(&transactions, 3);
        let labels: Vec<&str> = series.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-10", "2024-11", "2024-12"]);
    }
}
