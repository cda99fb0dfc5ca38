//! Report
//!
//! Renders a ranked quote as a console table followed by a shipment summary.

use std::{fmt::Write, io};

use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    policy::PricingPolicy,
    postal_codes::Destination,
    pricing::{PricingError, to_money},
    results::{CalculationResult, Quote},
};

/// Errors that can occur when rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An amount could not be presented as money.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Output could not be written.
    #[error("failed to write report")]
    IO,
}

const HEADER: [&str; 14] = [
    "",
    "Carrier",
    "Offer",
    "Zone",
    "Delivery",
    "Unit",
    "Unit + VAT",
    "Pkgs",
    "Total",
    "Total + VAT",
    "Suggested",
    "Suggested + VAT",
    "COD",
    "Remote",
];

/// Console rendering of a quote.
#[derive(Debug, Clone, Copy)]
pub struct QuoteReport<'a> {
    quote: &'a Quote,
    policy: &'a PricingPolicy,
}

impl<'a> QuoteReport<'a> {
    /// Creates a report for a quote priced under `policy`.
    pub fn new(quote: &'a Quote, policy: &'a PricingPolicy) -> Self {
        Self { quote, policy }
    }

    /// Writes the report.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be presented as money or the output fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        if self.quote.is_empty() {
            writeln!(
                out,
                "\nNo carrier can ship this package to {}.\n",
                destination_label(self.quote.destination())
            )
            .map_err(|_err| ReportError::IO)?;

            return self.write_summary(&mut out);
        }

        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

        builder.push_record(HEADER);

        for (index, result) in self.quote.iter().enumerate() {
            let row = index + 1;

            builder.push_record(self.result_cells(result)?);

            if result.is_optimal {
                for col in 0..HEADER.len() {
                    color_ops.push((row, col, Color::FG_GREEN));
                }
            }
        }

        write_table(&mut out, builder, color_ops)?;

        self.write_summary(&mut out)
    }

    fn result_cells(&self, result: &CalculationResult) -> Result<[String; 14], ReportError> {
        let currency = self.policy.currency;
        let money = |amount: Decimal| to_money(amount, currency).map(|m| m.to_string());

        Ok([
            String::from(if result.is_optimal { "★" } else { "" }),
            result.carrier_name.clone(),
            result.offer_type.to_string(),
            result.zone_name.to_string(),
            result.delivery_time.clone().unwrap_or_default(),
            money(result.cost)?,
            money(result.cost_with_vat)?,
            result.packages.to_string(),
            money(result.total_cost)?,
            money(result.total_cost_with_vat)?,
            money(result.suggested_price)?,
            money(
                result
                    .display_suggested_price(self.policy)
                    .ok_or(PricingError::AmountNotRepresentable(result.total_cost_with_vat))?,
            )?,
            yes_no(result.allows_cash_on_delivery).to_string(),
            yes_no(result.is_remote).to_string(),
        ])
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let details = self.quote.details();
        let volumetric_weight = self
            .policy
            .volumetric_weight(details.total_volume())
            .map_or_else(|| "-".to_string(), |weight| weight.normalize().to_string());

        let zone = self
            .quote
            .zone()
            .map_or_else(|| "unresolved".to_string(), ToString::to_string);

        let lines = [
            (
                " Destination:",
                format!(
                    "{} ({zone})  ",
                    destination_label(self.quote.destination())
                ),
            ),
            (
                " Weight:",
                format!(
                    "{}kg actual / {}kg volumetric  ",
                    details.actual_weight().normalize(),
                    volumetric_weight
                ),
            ),
            (
                " Volume:",
                format!("{}m³  ", details.total_volume().normalize()),
            ),
            (" Packages:", format!("{}  ", details.packages())),
            (" Carriers quoted:", format!("{}  ", self.quote.len())),
        ];

        let label_width = lines
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = lines
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &lines {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out).map_err(|_err| ReportError::IO)
    }
}

fn destination_label(destination: &Destination) -> String {
    match &destination.area {
        Some(area) => format!("{} {area}", destination.postal_code),
        None => destination.postal_code.clone(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(5..12), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReportError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char != in_run {
            _ = out.write_str(if box_char { "\x1b[90m" } else { "\x1b[0m" });
            in_run = box_char;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Visible width of a string, ignoring ANSI escapes.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReportError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReportError::IO)
}
