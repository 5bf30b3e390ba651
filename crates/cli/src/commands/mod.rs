//! Command implementations.
//!
//! Every command loads the cart first, performs one operation, then prints
//! the toasts it produced and the badge count from the notifier.

use std::io::Write;

use gadget_cart_client::cart::{CartSync, RemovalOutcome};
use gadget_cart_client::toast::Toast;
use gadget_cart_client::{CartClient, CartNotifier, ClientConfig, Toasts};
use gadget_cart_core::{GadgetId, SellerId};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::Commands;
use crate::prompt::StdinConfirm;
use crate::render;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn run(config: &ClientConfig, command: Commands, assume_yes: bool) -> CommandResult {
    let client = CartClient::new(config)?;
    let notifier = CartNotifier::new();
    let (toasts, mut toast_rx) = Toasts::channel();
    let mut cart = CartSync::new(client, notifier.clone(), toasts);
    let confirm = StdinConfirm::new(assume_yes);

    cart.load().await?;

    let outcome = match command {
        Commands::Show => Ok(()),
        Commands::Inc { seller, gadget } => cart.increment(seller, gadget).await.map(|_| ()),
        Commands::Dec { seller, gadget } => cart.decrement(seller, gadget).await.map(|_| ()),
        Commands::Remove { seller, gadget } => cart
            .remove_item(seller, gadget, &confirm)
            .await
            .map(report_cancelled),
        Commands::RemoveSeller { seller } => cart
            .remove_seller(seller, &confirm)
            .await
            .map(report_cancelled),
        Commands::Add { gadget, quantity } => cart.add_to_cart(gadget, quantity).await,
        Commands::Checkout { gadget } => {
            select_for_checkout(&mut cart, &gadget);
            cart.checkout().await.map(|order| {
                tracing::info!(lines = order.lines.len(), total = %order.total, "Checkout complete");
            })
        }
    };

    let mut out = std::io::stdout().lock();
    write_toasts(&mut out, &mut toast_rx)?;
    out.write_all(render::cart(&cart).as_bytes())?;
    writeln!(out, "{}", render::badge(&notifier.current()))?;

    // Failures were already shown as toasts; the exit status still reflects them
    outcome.map_err(Into::into)
}

/// Select the requested gadgets, or every available gadget when none are given.
fn select_for_checkout<A: gadget_cart_client::CartApi>(cart: &mut CartSync<A>, gadgets: &[GadgetId]) {
    if gadgets.is_empty() {
        cart.toggle_all();
        return;
    }

    for gadget_id in gadgets {
        match seller_of(cart, *gadget_id) {
            Some(seller_id) => {
                if !cart.selection().is_selected(seller_id, *gadget_id) {
                    cart.toggle(seller_id, *gadget_id);
                }
            }
            None => tracing::warn!(gadget_id = %gadget_id, "Gadget is not in the cart; skipped"),
        }
    }
}

fn seller_of<A: gadget_cart_client::CartApi>(cart: &CartSync<A>, gadget_id: GadgetId) -> Option<SellerId> {
    cart.groups()
        .iter()
        .find(|g| g.line(gadget_id).is_some())
        .map(|g| g.seller_id)
}

fn report_cancelled(outcome: RemovalOutcome) {
    if outcome == RemovalOutcome::Cancelled {
        tracing::info!("Removal cancelled");
    }
}

fn write_toasts(out: &mut impl Write, rx: &mut UnboundedReceiver<Toast>) -> std::io::Result<()> {
    while let Ok(toast) = rx.try_recv() {
        writeln!(out, "{}", render::toast(&toast))?;
    }
    Ok(())
}
