//! Writable and derived values outside of posts

use post_store::{derived, Readable, Writable};

#[derive(Clone, Debug)]
struct Cart {
    items: Vec<(String, u32)>,
}

fn main() {
    println!("=== Derived Values Example ===\n");

    let cart = Writable::new(Cart { items: vec![] });
    let total = derived(&cart, |cart: &Cart| cart.items.iter().map(|(_, price)| price).sum::<u32>());
    let summary = total.map(|total: &u32| format!("{} cents", total));

    let _watch = summary.subscribe(|summary: &String| println!("Total is now {summary}"));

    println!("Adding items...");
    cart.update(|cart| cart.items.push(("apple".to_string(), 120)));
    cart.update(|cart| cart.items.push(("bread".to_string(), 350)));

    println!("\nEmptying cart...");
    cart.set(Cart { items: vec![] });

    println!("\nFinal cart: {:#?}", cart.get());
}
