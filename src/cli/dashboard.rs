use super::ui;
use crate::core::format::{format_amount, format_date};
use crate::core::{Dashboard, IndicatorKind, IndicatorRecord};
use anyhow::{Context, Result};
use comfy_table::Cell;

const RATE_NOTICE: &str = "The observed dollar is updated automatically by the backend. \
                           Refreshing the data instead.";
const EMPTY_HISTORY: &str = "No records yet. Generate a new value to get started.";
const LOADING_MESSAGE: &str = "Loading data...";

/// Renders header, error banner, indicator cards and history as one block of text.
pub fn render(dashboard: &Dashboard) -> String {
    let state = dashboard.state();

    let mut output = format!(
        "{}\n{}\n",
        ui::style_text("Indicadores", ui::StyleType::Title),
        ui::style_text("Economic indicators dashboard", ui::StyleType::Subtle)
    );
    if let Some(error) = &state.last_error {
        output.push('\n');
        output.push_str(&ui::style_text(error, ui::StyleType::Error));
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&render_cards(dashboard));
    output.push_str("\n\n");
    output.push_str(&render_history(&state.records));
    output
}

fn render_cards(dashboard: &Dashboard) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&IndicatorKind::UnitOfAccount.label()),
        ui::header_cell(&IndicatorKind::ObservedRate.label()),
    ]);
    table.add_row(vec![
        Cell::new(card_body(
            dashboard.latest_of(&IndicatorKind::UnitOfAccount),
            "ufdash generate",
        )),
        Cell::new(card_body(
            dashboard.latest_of(&IndicatorKind::ObservedRate),
            "ufdash update-rate",
        )),
    ]);
    table.to_string()
}

fn card_body(latest: Option<&IndicatorRecord>, action: &str) -> String {
    let Some(record) = latest else {
        return format!(
            "{}\n\n$ --\n\n{}",
            ui::style_text("No data", ui::StyleType::Subtle),
            ui::style_text(&format!("Run `{action}`"), ui::StyleType::Subtle)
        );
    };

    let mut body = format!(
        "{}\n\n{}\n\n{}",
        format_date(&record.effective_date),
        ui::style_text(&format_amount(record.amount), ui::StyleType::CardValue),
        ui::style_text(&format!("Run `{action}`"), ui::StyleType::Subtle)
    );
    if let Some(url) = &record.document_url {
        body.push_str(&format!("\nPDF: {url}"));
    }
    body
}

fn render_history(records: &[IndicatorRecord]) -> String {
    let count = match records.len() {
        1 => "1 record".to_string(),
        n => format!("{n} records"),
    };
    let mut output = format!(
        "{} {}\n",
        ui::style_text("Record history", ui::StyleType::Subtitle),
        ui::style_text(&format!("({count})"), ui::StyleType::Subtle)
    );

    if records.is_empty() {
        output.push_str(&ui::style_text(EMPTY_HISTORY, ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Indicator"),
        ui::header_cell("Date"),
        ui::header_cell("Value (CLP)"),
        ui::header_cell("Document"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.kind.label()),
            Cell::new(format_date(&record.effective_date)),
            ui::amount_cell(&format_amount(record.amount)),
            ui::link_cell(record.document_url.as_deref()),
        ]);
    }

    output.push_str(&table.to_string());
    output
}

/// Refreshes the dashboard and returns its rendering. The spinner stands in
/// for the loading state while the request is in flight.
pub async fn show_with(dashboard: &mut Dashboard) -> String {
    let pb = ui::new_spinner(LOADING_MESSAGE);
    dashboard.refresh().await;
    pb.finish_and_clear();

    render(dashboard)
}

/// Refreshes and prints the dashboard.
pub async fn show(dashboard: &mut Dashboard) -> Result<()> {
    println!("{}", show_with(dashboard).await);
    Ok(())
}

/// Generates today's UF and prints the reloaded dashboard.
pub async fn generate(dashboard: &mut Dashboard) -> Result<()> {
    let pb = ui::new_spinner("Generating today's value...");
    let result = dashboard.generate_today().await;
    pb.finish_and_clear();

    if let Err(e) = result {
        eprintln!("{}", ui::separator());
        eprintln!(
            "{}",
            ui::style_text(
                "Could not generate today's UF. Run with --verbose for details.",
                ui::StyleType::Error
            )
        );
        eprintln!("{}", ui::separator());
        return Err(e).context("UF generation failed");
    }

    println!("{}", render(dashboard));
    Ok(())
}

/// The observed rate cannot be generated on demand; tell the user and reload.
pub async fn update_rate(dashboard: &mut Dashboard) -> Result<()> {
    println!("{}", ui::style_text(RATE_NOTICE, ui::StyleType::Notice));
    show(dashboard).await
}
