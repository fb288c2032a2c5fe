use super::common::*;
use crate::commission::domain::{AgentLevel, InputAdvisory, TierMatch};
use crate::commission::import::CommissionImportError;
use rust_decimal_macros::dec;
use std::io::Cursor;

#[test]
fn calculate_returns_display_view_and_records_history() {
    let desk = build_desk(10);

    let view = desk.calculate(input(500000, AgentLevel::Senior));

    assert_eq!(view.result.final_commission, dec!(13750));
    assert_eq!(view.final_commission_display, "R$ 13.750,00");
    assert_eq!(view.effective_rate_display, "2.5%");
    assert_eq!(view.agent_level_label, "Senior");
    assert!(view.advisories.is_empty());
    assert!(!view.used_fallback());

    let history = desk.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].final_commission, dec!(13750));
}

#[test]
fn history_is_bounded_and_newest_first() {
    let desk = build_desk(10);

    for offset in 0..15 {
        desk.calculate(input(100_000 + offset, AgentLevel::Junior));
    }

    let history = desk.history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].property_value, dec!(100014));
    assert_eq!(history[9].property_value, dec!(100005));

    desk.clear_history();
    assert!(desk.history().is_empty());
}

#[test]
fn advisories_do_not_change_the_result() {
    let desk = build_desk(10);

    let view = desk.calculate(input(-1000, AgentLevel::Junior).with_override_rate(dec!(1.2)));

    assert_eq!(
        view.advisories,
        vec![
            InputAdvisory::NegativePropertyValue,
            InputAdvisory::OverrideRateAboveOne
        ]
    );
    assert_eq!(view.result.final_commission, dec!(-1200));
    assert_eq!(view.result.tier_match, TierMatch::Exact);
}

#[test]
fn batch_reports_without_touching_history() {
    let desk = build_desk(10);

    let report = desk
        .batch(Cursor::new(DEAL_CSV.as_bytes()))
        .expect("batch imports");

    assert_eq!(report.totals.deals, 4);
    assert_eq!(
        report.totals.final_commission,
        dec!(13750) + dec!(45500) + dec!(11000) + dec!(-100)
    );
    assert_eq!(report.flagged_deals().count(), 1);
    assert!(desk.history().is_empty());
}

#[test]
fn batch_surfaces_import_errors() {
    let desk = build_desk(10);
    let csv = "Deal ID,Property Value,Deal Type,Agent Level,Override Rate\nD-1,100,barter,junior,\n";

    let err = desk.batch(Cursor::new(csv.as_bytes())).unwrap_err();

    assert!(matches!(err, CommissionImportError::InvalidRow { line: 1, .. }));
}

#[test]
fn progress_delegates_to_the_tier_table() {
    let desk = build_desk(10);
    let progress = desk.progress(AgentLevel::Expert, 40);
    assert_eq!(progress.deals_remaining, 10);
    assert_eq!(progress.next.map(|tier| tier.level), Some(AgentLevel::Master));
}
