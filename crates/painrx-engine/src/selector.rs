use painrx_common::ProtocolRow;
use painrx_protocol::PainRange;
use tracing::warn;

/// Rows whose pain range contains `score`, in table order.
///
/// Rows with unreadable ranges never match and are logged.
pub fn select_rows(rows: &[ProtocolRow], score: u8) -> Vec<&ProtocolRow> {
    rows.iter()
        .filter(|row| {
            let range = PainRange::parse(&row.pain_range);
            if range.is_empty() {
                warn!("Protocol row {} has malformed pain range '{}'", row.label(), row.pain_range);
            }
            range.contains(score)
        })
        .collect()
}
