//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, GatewayStats, InfoType};

/// Prints error and served-page counts to the log.
///
/// Only non-zero counters are listed.
pub fn print_gateway_statistics(stats: &GatewayStats, uptime_seconds: f64) {
    let total_errors = stats.total_errors();
    let total_info = stats.total_info();

    info!(
        "Served {} request{} ({} page{}, {} error{}) in {:.1}s",
        total_info + total_errors,
        plural(total_info + total_errors),
        total_info,
        plural(total_info),
        total_errors,
        plural(total_errors),
        uptime_seconds
    );

    if total_info > 0 {
        info!("Page Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
