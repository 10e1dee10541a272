//! # House Menu
//!
//! The menu a fresh Crema install starts with, plus a starter discount
//! code. Loaded by the `seed` binary and by the demo kiosk.
//!
//! ```text
//! Hot Coffee   Espresso Silk, Vanilla Oat Latte, Cappuccino Royale
//! Cold Coffee  Nitro Cold Brew, Iced Caramel Macchiato
//! Tea          Matcha Green Tea Latte, Earl Grey Lavender
//! Bakery       Almond Croissant, Blueberry Scone
//! Breakfast    Avocado Toast, Acai Bowl
//! ```

use tracing::info;

use crate::error::DbResult;
use crate::store::OrderStore;
use crema_core::{DiscountCode, MenuItem};

/// Code handed out to first-time guests: 10% off.
pub const WELCOME_CODE: &str = "WELCOME10";

/// (id, name, description, price_cents, category, image seed, calories)
const HOUSE_MENU: &[(&str, &str, &str, i64, &str, &str, u32)] = &[
    (
        "hc-1",
        "Espresso Silk",
        "Double shot of our signature dark roast with a velvety crema.",
        350,
        "Hot Coffee",
        "espresso",
        10,
    ),
    (
        "hc-2",
        "Vanilla Oat Latte",
        "Espresso, steamed oat milk and Madagascar vanilla bean.",
        550,
        "Hot Coffee",
        "latte",
        180,
    ),
    (
        "hc-3",
        "Cappuccino Royale",
        "Equal parts espresso, steamed milk and thick foam, dusted with cocoa.",
        475,
        "Hot Coffee",
        "cappuccino",
        120,
    ),
    (
        "cc-1",
        "Nitro Cold Brew",
        "Slow-steeped for 20 hours and infused with nitrogen.",
        500,
        "Cold Coffee",
        "coldbrew",
        5,
    ),
    (
        "cc-2",
        "Iced Caramel Macchiato",
        "Vanilla syrup, milk and espresso over ice with a caramel drizzle.",
        600,
        "Cold Coffee",
        "macchiato",
        250,
    ),
    (
        "tea-1",
        "Matcha Green Tea Latte",
        "Ceremonial-grade matcha whisked with steamed milk.",
        525,
        "Tea",
        "matcha",
        140,
    ),
    (
        "tea-2",
        "Earl Grey Lavender",
        "Bergamot black tea blended with French lavender.",
        400,
        "Tea",
        "tea",
        0,
    ),
    (
        "bak-1",
        "Almond Croissant",
        "Twice-baked butter croissant filled with almond frangipane.",
        450,
        "Bakery",
        "croissant",
        380,
    ),
    (
        "bak-2",
        "Blueberry Scone",
        "Buttery scone loaded with wild blueberries and a lemon glaze.",
        375,
        "Bakery",
        "scone",
        320,
    ),
    (
        "brk-1",
        "Avocado Toast",
        "Sourdough, smashed avocado, chili flakes and a poached egg.",
        950,
        "Breakfast",
        "avocado",
        350,
    ),
    (
        "brk-2",
        "Acai Bowl",
        "Acai blended with banana, topped with granola, berries and honey.",
        1100,
        "Breakfast",
        "acai",
        400,
    ),
];

/// The house menu as domain items.
pub fn house_menu() -> Vec<MenuItem> {
    HOUSE_MENU
        .iter()
        .map(
            |&(id, name, description, price_cents, category, image, calories)| MenuItem {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price_cents,
                category: category.to_string(),
                image: format!("https://picsum.photos/seed/{}/400/400", image),
                calories: Some(calories),
                available: true,
            },
        )
        .collect()
}

/// `WELCOME10`: 10% off the subtotal.
pub fn welcome_discount() -> DiscountCode {
    DiscountCode::percent(WELCOME_CODE, 1000)
}

/// Writes the house menu and the welcome code into `store`.
///
/// Skips the menu if any items exist and the code if it already exists,
/// so running it twice is harmless. Returns the number of menu items written.
pub async fn load_house_menu<S: OrderStore>(store: &S) -> DbResult<usize> {
    let mut written = 0;

    if store.menu().await?.is_empty() {
        for item in house_menu() {
            store.save_menu_item(&item).await?;
            written += 1;
        }
    }

    if !store.discounts().await?.iter().any(|d| d.code == WELCOME_CODE) {
        store.save_discount(&welcome_discount()).await?;
    }

    info!(items = written, "House menu loaded");
    Ok(written)
}
