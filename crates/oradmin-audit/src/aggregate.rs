//! Record ordering and statistics
//!
//! The database already orders and caps the rows; [`order_and_cap`] holds the
//! same contract on the console side so the response never depends on how a
//! particular view honours `ORDER BY` with `FETCH FIRST`.

use crate::category::AuditCategory;

/// Sort most recent first (stable for equal timestamps) and cap at `limit`.
pub fn order_and_cap<C: AuditCategory>(
    mut records: Vec<C::Record>,
    limit: Option<usize>,
) -> Vec<C::Record> {
    records.sort_by(|a, b| C::event_time(b).cmp(&C::event_time(a)));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

/// Fold statistics over exactly `records`.
pub fn summarize<C: AuditCategory>(records: &[C::Record]) -> C::Statistics {
    records.iter().fold(C::Statistics::default(), |mut stats, record| {
        C::accumulate(&mut stats, record);
        stats
    })
}
