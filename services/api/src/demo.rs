use crate::infra::{load_tiers, parse_amount, parse_deal_type, parse_level, parse_rate};
use clap::Args;
use realty_desk::commission::{
    format_brl, format_rate, AgentLevel, CommissionBatchReport, CommissionBatchSummary,
    CommissionDesk, CommissionImporter, CommissionInput, CommissionView, DealType,
    TierProgressView, TierTable, TierView,
};
use realty_desk::error::AppError;
use rust_decimal::Decimal;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CalcArgs {
    /// Property value (sale price or monthly rent)
    #[arg(long, value_parser = parse_amount)]
    pub(crate) property_value: Decimal,
    /// Agent level: junior, senior, expert, master
    #[arg(long, value_parser = parse_level)]
    pub(crate) agent_level: AgentLevel,
    /// Deal type: sale or rent
    #[arg(long, value_parser = parse_deal_type, default_value = "sale")]
    pub(crate) deal_type: DealType,
    /// Manual rate replacing the tier's base rate (e.g. 0.05 or 5%)
    #[arg(long, value_parser = parse_rate)]
    pub(crate) override_rate: Option<Decimal>,
    /// Tier table JSON (defaults to APP_TIER_TABLE or the reference table)
    #[arg(long)]
    pub(crate) tiers: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct TierArgs {
    /// Show progress toward the next tier for this level
    #[arg(long, value_parser = parse_level, requires = "closed_deals")]
    pub(crate) level: Option<AgentLevel>,
    /// Deals closed so far, used with --level
    #[arg(long)]
    pub(crate) closed_deals: Option<u32>,
    /// Tier table JSON (defaults to APP_TIER_TABLE or the reference table)
    #[arg(long)]
    pub(crate) tiers: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with Deal ID, Property Value, Deal Type, Agent Level, Override Rate
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Include every deal in the output
    #[arg(long)]
    pub(crate) list_deals: bool,
    /// Tier table JSON (defaults to APP_TIER_TABLE or the reference table)
    #[arg(long)]
    pub(crate) tiers: Option<PathBuf>,
}

pub(crate) fn run_calculation(args: CalcArgs) -> Result<(), AppError> {
    let CalcArgs {
        property_value,
        agent_level,
        deal_type,
        override_rate,
        tiers,
    } = args;

    let tiers = load_tiers(tiers)?;
    let desk = CommissionDesk::new(Arc::new(tiers), 1);
    let input = CommissionInput {
        property_value,
        deal_type,
        agent_level,
        override_rate,
    };

    render_commission(&desk.calculate(input));
    Ok(())
}

pub(crate) fn run_tier_listing(args: TierArgs) -> Result<(), AppError> {
    let tiers = load_tiers(args.tiers)?;
    render_tiers(&tiers);

    if let (Some(level), Some(closed_deals)) = (args.level, args.closed_deals) {
        render_progress(&TierProgressView::from(tiers.progress(level, closed_deals)));
        let qualifying = tiers.qualifying_level(closed_deals);
        if qualifying != level {
            println!(
                "Note: {closed_deals} closed deals meet the {} threshold",
                qualifying.label()
            );
        }
    }

    Ok(())
}

pub(crate) fn run_batch_report(args: BatchArgs) -> Result<(), AppError> {
    let tiers = load_tiers(args.tiers)?;
    let deals = CommissionImporter::from_path(&args.csv)?;
    let report = CommissionBatchReport::build(deals, &tiers);

    println!("Commission batch report");
    println!("Source: {}", args.csv.display());
    render_batch(&report, args.list_deals);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let desk = CommissionDesk::default();

    println!("Commission desk demo");
    render_tiers(desk.tiers());

    let scenarios = [
        CommissionInput::new(Decimal::new(500_000, 0), DealType::Sale, AgentLevel::Senior),
        CommissionInput::new(Decimal::new(500_000, 0), DealType::Sale, AgentLevel::Junior),
        CommissionInput::new(Decimal::new(1_000_000, 0), DealType::Sale, AgentLevel::Master),
        CommissionInput::new(Decimal::new(200_000, 0), DealType::Sale, AgentLevel::Senior)
            .with_override_rate(Decimal::new(5, 2)),
    ];

    for input in scenarios {
        println!();
        render_commission(&desk.calculate(input));
    }

    println!("\nRecent calculations (newest first)");
    for entry in desk.history() {
        println!(
            "- {} | {} {} | {}",
            entry.recorded_at.format("%H:%M:%S"),
            entry.agent_level.label(),
            entry.deal_type.label(),
            entry.final_commission_display
        );
    }

    render_progress(&TierProgressView::from(desk.progress(AgentLevel::Senior, 16)));

    let sample = "Deal ID,Property Value,Deal Type,Agent Level,Override Rate\n\
                  DEMO-1,650000,sale,expert,\n\
                  DEMO-2,3800,rent,junior,\n\
                  DEMO-3,1250000,sale,master,3%\n";
    let report = desk.batch(Cursor::new(sample.as_bytes()))?;
    println!("\nSample batch");
    render_batch(&report, true);

    Ok(())
}

pub(crate) fn render_commission(view: &CommissionView) {
    let result = &view.result;
    println!(
        "{} {} at {}",
        view.agent_level_label,
        view.deal_type_label,
        format_brl(result.property_value)
    );
    if view.used_fallback() {
        println!(
            "  Tier {} not in table; using {}",
            view.agent_level_label, view.applied_tier_label
        );
    }
    if result.rate_overridden {
        println!("  Rate: {} (manual override)", view.effective_rate_display);
    } else {
        println!("  Rate: {}", view.effective_rate_display);
    }
    println!("  Base commission: {}", view.base_commission_display);
    println!("  Bonus multiplier: x{}", result.bonus_multiplier.normalize());
    println!("  Final commission: {}", view.final_commission_display);
    for advisory in &view.advisories {
        println!("  Warning: {}", advisory.label());
    }
}

fn render_tiers(tiers: &TierTable) {
    println!("\nTier table");
    for tier in TierView::all(tiers) {
        let next = tier
            .next_level
            .map(|level| format!(", next {}", level.label()))
            .unwrap_or_default();
        println!(
            "- {}: {}+ deals, base {}, bonus x{}{}",
            tier.level_label,
            tier.min_deals,
            tier.base_rate_display,
            tier.bonus_multiplier.normalize(),
            next
        );
    }
}

fn render_progress(progress: &TierProgressView) {
    println!("\nTier progress");
    match progress.next_label {
        Some(next) => println!(
            "- {} with {} closed deals: {} more to {} ({}%)",
            progress.current_label,
            progress.closed_deals,
            progress.deals_remaining,
            next,
            progress.percent_complete
        ),
        None => println!(
            "- {} with {} closed deals: top tier reached",
            progress.current_label, progress.closed_deals
        ),
    }
}

fn render_batch(report: &CommissionBatchReport, list_deals: bool) {
    let CommissionBatchSummary {
        by_level,
        by_deal_type,
        totals,
        fallback_matches,
        flagged_deals,
    } = report.summary();

    println!(
        "Deals: {} | Volume: {} | Commission: {}",
        totals.deals,
        format_brl(totals.property_value),
        format_brl(totals.final_commission)
    );

    println!("\nBy agent level");
    for entry in &by_level {
        println!(
            "- {}: {} deals, {} base, {} final",
            entry.level_label,
            entry.totals.deals,
            format_brl(entry.totals.base_commission),
            format_brl(entry.totals.final_commission)
        );
    }

    println!("\nBy deal type");
    for entry in &by_deal_type {
        println!(
            "- {}: {} deals, {} final",
            entry.deal_type_label,
            entry.totals.deals,
            format_brl(entry.totals.final_commission)
        );
    }

    if fallback_matches > 0 {
        println!("\n{fallback_matches} deal(s) used the lowest tier because their level is not in the table");
    }

    if flagged_deals.is_empty() {
        println!("\nFlagged deals: none");
    } else {
        println!("\nFlagged deals");
        for deal in &flagged_deals {
            println!("- {}: {}", deal.deal_id, deal.advisories.join("; "));
        }
    }

    if list_deals {
        println!("\nDeals");
        for entry in &report.entries {
            println!(
                "- {} | {} | {} | {} | {}",
                entry.deal_id,
                entry.result.agent_level.label(),
                entry.result.deal_type.label(),
                format_rate(entry.result.effective_rate),
                format_brl(entry.result.final_commission)
            );
        }
    }
}
