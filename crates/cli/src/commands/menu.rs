//! Menu listing command.

use fusion_core::MenuCatalog;

/// Print the house menu grouped by category.
#[allow(clippy::print_stdout)]
pub fn print() {
    let catalog = MenuCatalog::fusion_food_lab();
    for (category, items) in catalog.by_category() {
        println!("{}", category.label());
        for item in items {
            let mut tags = Vec::new();
            if item.vegetarian {
                tags.push("veg");
            }
            if item.bestseller {
                tags.push("bestseller");
            }
            println!(
                "  [{}] {:<22} {:>8}  {}",
                item.id,
                item.name,
                catalog.price(item.unit_price).display(),
                tags.join(", ")
            );
        }
        println!();
    }
}
