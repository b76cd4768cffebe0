//! Order totals.
use crate::data_model::{ClientRecord, RenderContext};
use crate::numeric::{parse_number, to_fixed};

/// Fractional digits of `order_grand_total`.
pub const TOTAL_DIGITS: usize = 2;

/// Σ quantity × price over the product lines. Unparsable values count as 0.
pub fn subtotal(client: &ClientRecord) -> f64 {
    client
        .products
        .iter()
        .map(|product| parse_number(product.quantity(), 0.0) * parse_number(product.price_ttc(), 0.0))
        .sum()
}

/// Subtotal plus delivery (`order_livr`) and fiscal stamp (`order_tbr`).
pub fn grand_total(client: &ClientRecord) -> f64 {
    let delivery = parse_number(client.order_livr(), 0.0);
    let fiscal_stamp = parse_number(client.order_tbr(), 0.0);
    subtotal(client) + delivery + fiscal_stamp
}

/// Populate `order_grand_total`. Never fails; negative totals are kept.
pub fn compute_total(client: &mut ClientRecord) {
    client.order_grand_total = Some(to_fixed(grand_total(client), TOTAL_DIGITS));
}

/// Apply [`compute_total`] to every client, in order.
pub fn totalize(ctx: &mut RenderContext) {
    for client in &mut ctx.clients {
        compute_total(client);
    }
}
