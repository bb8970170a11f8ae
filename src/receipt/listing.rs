//! Product listings

use std::io;

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    products::Product,
    receipt::{ReceiptError, color_dark_grey, colorize_borders, percent_points},
};

/// Writes a product listing table.
///
/// # Errors
///
/// Returns an error if a price cannot be rounded or the table cannot be written.
pub fn write_product_table(
    mut out: impl io::Write,
    products: &[&Product],
) -> Result<(), ReceiptError> {
    if products.is_empty() {
        return writeln!(out, "\nNo products found.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();
    let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

    builder.push_record(["ID", "Name", "Category", "Price", "Was", "Rating", "Stock"]);

    for (idx, product) in products.iter().enumerate() {
        let row = idx + 1;

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            format!("{}", product.display_price()?),
            original_price(product),
            format!("{:.1}", product.rating),
            stock_label(product).to_string(),
        ]);

        color_ops.push((row, 2, color_dark_grey()));
        color_ops.push((row, 4, color_dark_grey()));

        if !product.in_stock {
            color_ops.push((row, 6, Color::FG_RED));
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}\n").map_err(|_err| ReceiptError::IO)
}

/// Writes a product page: details, features and related products.
///
/// # Errors
///
/// Returns an error if a price cannot be rounded or the output cannot be written.
pub fn write_product_detail(
    mut out: impl io::Write,
    product: &Product,
    related: &[&Product],
) -> Result<(), ReceiptError> {
    let price = match product.discount {
        Some(discount) => format!(
            "{} (was {}, -{}%)",
            product.display_price()?,
            product.price,
            percent_points(discount)
        ),
        None => format!("{}", product.display_price()?),
    };

    let mut lines = vec![
        format!("\n\x1b[1m{}\x1b[0m (#{})", product.name, product.id),
        format!("{} · {:.1}★ · {}", product.category, product.rating, stock_label(product)),
        price,
    ];

    if !product.description.is_empty() {
        lines.push(String::new());
        lines.push(product.description.clone());
    }

    if !product.features.is_empty() {
        lines.push(String::new());
        lines.extend(product.features.iter().map(|feature| format!("  • {feature}")));
    }

    if !product.tags.is_empty() {
        let tags: Vec<&str> = product.tags.iter().collect();

        lines.push(String::new());
        lines.push(format!("Tags: {}", tags.join(", ")));
    }

    for line in lines {
        writeln!(out, "{line}").map_err(|_err| ReceiptError::IO)?;
    }

    if related.is_empty() {
        return writeln!(out).map_err(|_err| ReceiptError::IO);
    }

    writeln!(out, "\nRelated products:").map_err(|_err| ReceiptError::IO)?;

    write_product_table(out, related)
}

fn original_price(product: &Product) -> String {
    match product.discount {
        Some(discount) => format!("{} (-{}%)", product.price, percent_points(discount)),
        None => String::new(),
    }
}

fn stock_label(product: &Product) -> &'static str {
    if product.in_stock {
        "In stock"
    } else {
        "Out of stock"
    }
}
