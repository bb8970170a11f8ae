//! Receipt
//!
//! Terminal rendering of a cart and its order summary.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
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
    cart::{Cart, CartTotals, PricedLine},
    catalog::ProductLookup,
    pricing::{PricingError, fraction},
};

pub mod listing;

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// A priced snapshot of a cart, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Priced lines, in cart order
    lines: Vec<PricedLine<'a>>,

    /// Order summary
    totals: CartTotals,

    /// Applied coupon code, if any
    coupon: Option<String>,
}

impl<'a> Receipt<'a> {
    /// Price a cart against the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line cannot be priced.
    pub fn from_cart(cart: &Cart, catalog: &'a impl ProductLookup) -> Result<Self, ReceiptError> {
        Ok(Receipt {
            lines: cart.priced_lines(catalog)?,
            totals: cart.compute_totals(catalog)?,
            coupon: cart
                .coupon_applied()
                .then(|| cart.rules().coupon.code.clone()),
        })
    }

    /// Priced lines, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[PricedLine<'a>] {
        &self.lines
    }

    /// Order summary.
    #[must_use]
    pub fn totals(&self) -> &CartTotals {
        &self.totals
    }

    /// Applied coupon code.
    #[must_use]
    pub fn coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
        }

        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

        builder.push_record(["", "Item", "Category", "Price", "Was", "Qty", "Total"]);

        for (idx, priced) in self.lines.iter().enumerate() {
            let row = idx + 1;
            let product = priced.product;

            let was = match product.discount {
                Some(discount) => format!("{} (-{}%)", product.price, percent_points(discount)),
                None => String::new(),
            };

            builder.push_record([
                format!("#{row:<3}"),
                product.name.clone(),
                product.category.clone(),
                format!("{}", priced.unit_price),
                was,
                priced.line.quantity().to_string(),
                format!("{}", priced.line_total),
            ]);

            color_ops.push((row, 2, color_dark_grey()));
            color_ops.push((row, 4, color_dark_grey()));

            if product.is_discounted() {
                color_ops.push((row, 3, Color::FG_GREEN));
            }
        }

        write_table(&mut out, builder, color_ops)?;

        write_summary(&mut out, self)
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(out: &mut impl io::Write, receipt: &Receipt<'_>) -> Result<(), ReceiptError> {
    let totals = receipt.totals();

    let mut rows: SmallVec<[(String, String); 6]> = smallvec![
        (" Items:".to_string(), format!("{}  ", totals.item_count())),
        (" Subtotal:".to_string(), format!("{}  ", totals.subtotal())),
    ];

    let shipping = if totals.free_shipping() {
        "Free  ".to_string()
    } else {
        format!("{}  ", totals.shipping())
    };

    rows.push((" Shipping:".to_string(), shipping));
    rows.push((" Tax:".to_string(), format!("{}  ", totals.tax())));

    if !is_zero(totals.discount()) {
        let label = match receipt.coupon() {
            Some(code) => format!(" Discount ({code}):"),
            None => " Discount:".to_string(),
        };

        rows.push((label, format!("-{}  ", totals.discount())));
    }

    rows.push((
        " \x1b[1mTotal:\x1b[0m".to_string(),
        format!("\x1b[1m{}  \x1b[0m", totals.grand_total()),
    ));

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
pub(crate) fn percent_points(percentage: Percentage) -> Decimal {
    (fraction(percentage) * Decimal::ONE_HUNDRED).normalize()
}

fn is_zero(amount: Money<'_, Currency>) -> bool {
    amount.to_minor_units() == 0
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
pub(crate) fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
pub(crate) fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
