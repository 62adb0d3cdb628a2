//! AI CFO - Entry Point
//!
//! Interactive terminal front end for the dashboard simulation. Each command
//! plays the role of one dashboard panel or control.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use ai_cfo::alerts::view::{format_age, select, AlertFilter, AlertSort, AlertTally};
use ai_cfo::alerts::AlertKind;
use ai_cfo::analysis::{project, SavedConfig, SavedScenario, ScenarioInputs, SeriesStats, SnapshotStore};
use ai_cfo::core::types::{KpiKind, TimeRange};
use ai_cfo::generators::{risk, PreviousScores};
use ai_cfo::{ConfigPatch, Dashboard, EngineSettings, Result, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "ai-cfo")]
#[command(about = "Financial dashboard simulation with market events and alerts")]
struct Args {
    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML settings file (levers, latency, polling)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory for saved scenarios and configs
    #[arg(long, default_value = ".ai-cfo")]
    data_dir: PathBuf,
}

/// REPL state that lives outside the engine
struct Session {
    dashboard: Dashboard,
    snapshots: SnapshotStore,
    previous_risk: Option<PreviousScores>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ai_cfo=info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    tracing::info!(seed = ?settings.seed, "AI CFO starting...");

    let rt = Runtime::new()?;
    let mut session = Session {
        dashboard: Dashboard::new(&settings)?,
        snapshots: SnapshotStore::new(&args.data_dir),
        previous_risk: None,
    };

    println!("\n=== AI CFO ===");
    println!("Simulated financial dashboard");
    println!();
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        if let Err(e) = rt.block_on(run_command(&mut session, command, rest)) {
            println!("Error: {}", e);
        }
    }

    let alerts = rt.block_on(session.dashboard.alert_count());
    println!("\nGoodbye! {} alert(s) outstanding.", alerts);
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  kpi                          - Key performance indicators");
    println!("  cash                         - Six-month cash flow");
    println!("  budget                       - Departmental budgets");
    println!("  risk                         - Risk assessment");
    println!("  insights                     - AI insights");
    println!("  history <kpi> <7d|30d|90d|1y> - KPI history");
    println!("  detail <kpi>                 - KPI statistics and insights");
    println!("  set <field> <value>          - Change a simulation lever");
    println!("  config                       - Show levers and business metrics");
    println!("  reset                        - Restore default levers");
    println!("  events                       - Active market events");
    println!("  alerts [kind|term] [sort]    - List alerts (sort: newest, priority, severity)");
    println!("  clear <id> / clearall        - Dismiss alerts");
    println!("  refresh                      - Rebuild all alerts");
    println!("  scenario <rev%> <exp%> <market%> [name] - What-if projection");
    println!("  save-config <name>           - Save the current levers");
    println!("  load-config <name>           - Restore saved levers");
    println!("  quit / q                     - Exit");
    println!();
}

async fn run_command(session: &mut Session, command: &str, rest: &str) -> Result<()> {
    let dashboard = &session.dashboard;
    match command {
        "help" | "h" => print_help(),
        "kpi" => {
            for kpi in dashboard.fetch_kpi_data(None).await? {
                println!("  {:<20} {:>10}  {:>7} {:?}", kpi.title, kpi.value, kpi.change, kpi.trend);
            }
        }
        "cash" => {
            println!("  Month   Inflows   Outflows   Net ($K)");
            for month in dashboard.fetch_cash_flow_data(None).await? {
                println!(
                    "  {:<5} {:>9.1} {:>10.1} {:>10.1}",
                    month.month, month.inflows, month.outflows, month.value
                );
            }
        }
        "budget" => {
            for budget in dashboard.fetch_budget_data(None).await? {
                println!(
                    "  {:<11} spent ${:>8.0} of ${:>8.0}  variance {:>+6.1}%  efficiency {:>5.1}%",
                    budget.category.name(),
                    budget.spent,
                    budget.budget,
                    budget.variance,
                    budget.efficiency
                );
            }
        }
        "risk" => {
            let risks = dashboard
                .fetch_risk_data(None, session.previous_risk.clone())
                .await?;
            for r in &risks {
                println!(
                    "  {:<17} {:>3}/100 {:?} ({})",
                    r.category.label(),
                    r.score,
                    r.level,
                    r.trend.as_str()
                );
                println!("      {}", r.description);
            }
            session.previous_risk = Some(risk::previous_scores(&risks));
        }
        "insights" => {
            let insights = dashboard.fetch_insights_data(None).await?;
            if insights.is_empty() {
                println!("  No insights under current conditions.");
            }
            for insight in insights {
                println!(
                    "  [{:?}] {} ({}% confidence, {} priority)",
                    insight.kind,
                    insight.title,
                    insight.confidence,
                    insight.priority.as_str()
                );
                println!("      {}", insight.description);
                println!("      -> {}", insight.action);
            }
        }
        "history" => {
            let Some((title, range)) = rest.rsplit_once(' ') else {
                println!("Usage: history <kpi title> <7d|30d|90d|1y>");
                return Ok(());
            };
            let range: TimeRange = range.parse()?;
            for point in dashboard.fetch_kpi_historical_data(title, range).await? {
                println!("  {:>8}  {:.2}", point.date, point.value);
            }
        }
        "detail" => {
            let kind: KpiKind = rest.parse()?;
            let series = dashboard
                .fetch_kpi_historical_data(kind.title(), TimeRange::Month)
                .await?;
            if let Some(stats) = SeriesStats::from_series(&series) {
                println!("  {} over {}", kind.title(), TimeRange::Month.label());
                println!("  Average {:.2}, range {:.2} - {:.2}", stats.avg, stats.min, stats.max);
                println!(
                    "  Latest change {:+.1}%, {} days above average, {:.0}% growth consistency",
                    stats.change, stats.days_above_average, stats.growth_consistency
                );
            }
            for insight in dashboard.fetch_kpi_insights(kind.title()).await? {
                println!("  [{:?}] {} ({}%)", insight.kind, insight.title, insight.confidence);
                println!("      {}", insight.description);
                if let Some(recommendation) = &insight.recommendation {
                    println!("      -> {}", recommendation);
                }
            }
        }
        "set" => {
            let mut parts = rest.split_whitespace();
            let (Some(field), Some(value)) = (parts.next(), parts.next()) else {
                println!("Usage: set <field> <value>");
                return Ok(());
            };
            let Ok(value) = value.parse::<f64>() else {
                println!("Usage: set <field> <value>");
                return Ok(());
            };
            let patch = ConfigPatch::new().with(field, value)?;
            dashboard.update_config(&patch).await;
            println!("  {} = {}", field, value);
        }
        "reset" => {
            let defaults = ConfigPatch::from_config(&SimulationConfig::default());
            dashboard.update_config(&defaults).await;
            println!("  Levers reset to defaults.");
        }
        "config" => {
            for (name, value) in dashboard.config().await.fields() {
                println!("  {:<24} {}", name, value);
            }
            let m = dashboard.business_metrics().await;
            println!("  --");
            println!("  customer satisfaction    {:.1}", m.customer_satisfaction);
            println!("  employee productivity    {:.1}", m.employee_productivity);
            println!("  market share             {:.1}", m.market_share);
            println!("  brand strength           {:.1}", m.brand_strength);
            println!("  operational efficiency   {:.1}", m.operational_efficiency);
            println!("  innovation index         {:.1}", m.innovation_index);
            println!("  financial health         {:.1}", m.financial_health);
        }
        "events" => {
            let events = dashboard.active_market_events().await;
            if events.is_empty() {
                println!("  No active market events.");
            }
            for event in events {
                println!(
                    "  {} - severity {:.0}%, {} days: {}",
                    event.kind.headline(),
                    event.severity * 100.0,
                    event.duration,
                    event.description
                );
            }
        }
        "alerts" => {
            let mut filter = AlertFilter::default();
            let mut sort = AlertSort::default();
            for word in rest.split_whitespace() {
                if word == "all" {
                    continue;
                } else if let Some(kind) = AlertKind::parse(word) {
                    filter.kind = Some(kind);
                } else if let Some(s) = AlertSort::parse(word) {
                    sort = s;
                } else {
                    filter.search = Some(word.to_string());
                }
            }

            let alerts = dashboard.alerts().await;
            let now = dashboard.engine().await.now();
            let shown = select(&alerts, &filter, sort);
            for alert in &shown {
                println!(
                    "  [{}] {} ({}, {}) {}",
                    alert.kind.as_str(),
                    alert.title,
                    alert.source.as_str(),
                    format_age(now, alert.timestamp),
                    alert.id
                );
                println!("      {}", alert.message);
            }
            let tally = AlertTally::of(&alerts);
            println!(
                "  Showing {} of {} alerts: {} critical, {} warning, {} info, {} success",
                shown.len(),
                tally.total,
                tally.critical,
                tally.warning,
                tally.info,
                tally.success
            );
        }
        "clear" => {
            if dashboard.clear_alert(rest).await {
                println!("  Cleared {}", rest);
            } else {
                println!("  No alert with id {}", rest);
            }
        }
        "clearall" => {
            dashboard.clear_all_alerts().await;
            println!("  All alerts cleared.");
        }
        "refresh" => {
            let failed = dashboard.refresh_alerts().await;
            println!(
                "  {} alert(s), {} critical",
                dashboard.alert_count().await,
                dashboard.critical_alert_count().await
            );
            for stream in failed {
                println!("  {} pass failed", stream);
            }
        }
        "scenario" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let numbers: Vec<f64> = parts.iter().take(3).filter_map(|p| p.parse().ok()).collect();
            if numbers.len() != 3 {
                println!("Usage: scenario <rev%> <exp%> <market%> [name]");
                return Ok(());
            }
            let inputs = ScenarioInputs {
                revenue_change: numbers[0],
                expense_change: numbers[1],
                market_growth: numbers[2],
            };
            let kpis = dashboard.fetch_kpi_data(None).await?;
            let results = project(&kpis, &inputs);
            println!("  Projected revenue  ${:.2}M", results.new_revenue / 1_000_000.0);
            println!("  Projected expenses ${:.2}M", results.new_expenses / 1_000_000.0);
            println!("  Projected profit   ${:.2}M ({:+.1}%)", results.new_profit / 1_000_000.0, results.profit_change);

            if parts.len() > 3 {
                let name = parts[3..].join(" ");
                let timestamp = dashboard.engine().await.now();
                let count = session
                    .snapshots
                    .save_scenario(SavedScenario { name: name.clone(), inputs, results, timestamp })?;
                println!("  Saved scenario '{}' ({} total)", name, count);
            }
        }
        "save-config" => {
            if rest.is_empty() {
                println!("Usage: save-config <name>");
                return Ok(());
            }
            let config = dashboard.config().await;
            let timestamp = dashboard.engine().await.now();
            let count = session
                .snapshots
                .save_config(SavedConfig { name: rest.to_string(), config, timestamp })?;
            println!("  Saved '{}' ({} total)", rest, count);
        }
        "load-config" => match session.snapshots.find_config(rest)? {
            Some(saved) => {
                dashboard.update_config(&ConfigPatch::from_config(&saved.config)).await;
                println!("  Loaded '{}'", saved.name);
            }
            None => println!("  No saved config named '{}'", rest),
        },
        _ => println!("Unknown command '{}'. Type 'help' for the command list.", command),
    }
    Ok(())
}
