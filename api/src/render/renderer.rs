//! Plain-text renderer
//!
//! Renders products and carts to readable markdown-ish text.

use crate::app::form_parser::UPDATE_ITEM_PREFIX;
use crate::domain::entities::{CartContext, CartLine, Product};

/// Render the product list
pub fn render_product_list(products: &[Product]) -> String {
    let mut buf = String::new();

    buf.push_str("# Products\n\n");

    if products.is_empty() {
        buf.push_str("_No products available._\n");
        return buf;
    }

    for product in products {
        buf.push_str(&format!(
            "- [{}] **{}** ${}",
            product.id, product.name, product.unit_price
        ));
        if !product.short_description.is_empty() {
            buf.push_str(&format!(" - {}", product.short_description));
        }
        buf.push('\n');
    }

    buf.push_str("\n---\n\n");
    buf.push_str("Add to cart: `POST /cart/item` with `add_item_id=<id>&add_item_quantity=<n>`\n");

    buf
}

/// Render a single product page
pub fn render_product(product: &Product) -> String {
    let mut buf = String::new();

    buf.push_str(&format!("# {}\n\n", product.name));
    buf.push_str(&format!("**ID:** {}\n", product.id));
    buf.push_str(&format!("**Price:** ${}\n\n", product.unit_price));

    if !product.short_description.is_empty() {
        buf.push_str(&product.short_description);
        buf.push_str("\n\n");
    }
    if !product.long_description.is_empty() {
        buf.push_str(&product.long_description);
        buf.push_str("\n\n");
    }

    buf.push_str(&format!(
        "Add to cart: `POST /cart/item` with `add_item_id={}&add_item_quantity=1`\n",
        product.id
    ));

    buf
}

/// Render the shopper's cart
pub fn render_cart(context: &CartContext) -> String {
    let mut buf = String::new();

    buf.push_str("# Your Cart\n\n");

    if context.is_empty() {
        buf.push_str("_Your cart is empty._\n");
        return buf;
    }

    for line in &context.cart_items {
        buf.push_str(&render_line(line));
        buf.push('\n');
    }

    buf.push('\n');
    buf.push_str(&format!(
        "**Items:** {} ({} units)\n",
        context.cart.item_count, context.cart.total_quantity
    ));
    buf.push_str(&format!("**Subtotal:** ${}\n\n", context.cart.subtotal));

    buf.push_str("---\n\n");
    buf.push_str("## Commands\n\n");
    buf.push_str(&format!(
        "- `POST /cart/update` with `{}<item>=<n>` - Set quantities (0 removes)\n",
        UPDATE_ITEM_PREFIX
    ));
    buf.push_str("- `PUT /cart/item/<item>` with `item_quantity=<n>` - Set one quantity\n");
    buf.push_str("- `DELETE /cart/item/<item>` - Remove an item\n");
    buf.push_str("- `POST /cart/delete` - Empty the cart\n");

    buf
}

fn render_line(line: &CartLine) -> String {
    format!(
        "- [{}] {} x{} @ ${} = ${}",
        line.id, line.product.name, line.quantity, line.product.unit_price, line.line_total
    )
}
