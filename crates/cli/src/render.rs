//! Plain-text rendering of cart state.

use std::fmt::Write;

use gadget_cart_client::CartApi;
use gadget_cart_client::cart::{CartSync, LineSync};
use gadget_cart_client::notifier::CartSummary;
use gadget_cart_client::toast::{Toast, ToastLevel};
use gadget_cart_core::{CartLineItem, SellerGroup};

/// Render the whole cart: seller sections, selection marks and the total.
pub fn cart<A: CartApi>(cart: &CartSync<A>) -> String {
    let mut out = String::new();

    if let Some(label) = cart.empty_label() {
        let _ = writeln!(out, "{label}");
        return out;
    }

    for group in cart.groups() {
        seller_section(&mut out, cart, group);
    }

    let _ = writeln!(
        out,
        "Đã chọn {} sản phẩm | Tổng tiền: {}",
        cart.selected_quantity(),
        cart.total_price()
    );
    out
}

fn seller_section<A: CartApi>(out: &mut String, cart: &CartSync<A>, group: &SellerGroup) {
    let _ = writeln!(out, "{} (#{})", group.shop_name, group.seller_id);
    if !group.shop_address.is_empty() {
        let _ = writeln!(out, "  {}", group.shop_address);
    }

    for line in &group.line_items {
        let selected = cart.selection().is_selected(group.seller_id, line.gadget_id);
        let sync = cart.line_sync(group.seller_id, line.gadget_id);
        let _ = writeln!(out, "  {}", line_row(line, selected, sync));
    }
}

fn line_row(line: &CartLineItem, selected: bool, sync: Option<LineSync>) -> String {
    let mark = if selected { "[x]" } else { "[ ]" };
    let mut row = format!(
        "{mark} {} (#{}) {} x {} = {}",
        line.label(),
        line.gadget_id,
        line.quantity,
        line.effective_unit_price(),
        line.line_total()
    );

    if line.discounted_price.is_some() {
        let _ = write!(row, " (giá gốc {})", line.unit_price);
    }
    if !line.is_purchasable() {
        row.push_str(" [ngừng bán]");
    }
    match sync {
        Some(LineSync::Pending { .. }) => row.push_str(" [đang cập nhật]"),
        Some(LineSync::Errored { attempted, .. }) => {
            let _ = write!(row, " [cập nhật {attempted} thất bại]");
        }
        _ => {}
    }
    row
}

/// Header badge text.
pub fn badge(summary: &CartSummary) -> String {
    format!("Giỏ hàng: {}", summary.count)
}

pub fn toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Success => format!("✔ {}", toast.message),
        ToastLevel::Error => format!("✖ {}", toast.message),
    }
}
