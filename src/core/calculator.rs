//! Absence deduction and net salary arithmetic

/// Round to 2 decimal places, half away from zero.
///
/// Backed by f64, so a value whose decimal text ends in exactly `5` may land
/// on either side depending on its binary representation.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid printing "-0.00" for values that round to zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Pro-rated pay reduction for attendance shortfall (never positive).
///
/// Returns 0 when `required_days <= 0` or `actual_days >= required_days`.
pub fn absence_deduction(base_salary: f64, required_days: i64, actual_days: i64) -> f64 {
    if required_days <= 0 || actual_days >= required_days {
        return 0.0;
    }

    let daily_rate = base_salary / required_days as f64;
    let missed = (required_days - actual_days) as f64;
    round2(-(daily_rate * missed))
}

/// Base salary plus every adjustment, including the absence deduction.
pub fn net_salary(
    base_salary: f64,
    absence_deduction: f64,
    night_shift: f64,
    high_temp: f64,
    late_fine: f64,
    others: f64,
) -> f64 {
    round2(base_salary + absence_deduction + night_shift + high_temp + late_fine + others)
}
