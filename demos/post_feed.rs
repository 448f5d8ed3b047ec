//! Post feed wired to a PostStore with id-based edits

use post_store::{PostStore, StoreError};

fn main() -> Result<(), StoreError> {
    println!("=== Post Feed Example ===\n");

    let store = PostStore::new();

    // Render the content view on every change
    let feed = store.subscribe_posts(|view| {
        println!("Feed ({} posts):", view.len());
        for content in view {
            match content {
                Some(content) => println!("  - {content}"),
                None => println!("  - <no content>"),
            }
        }
    });

    // Load what a posts endpoint would return
    println!("\nLoading posts...");
    store.load_json(r#"[{ "post_id": 1, "content": "hello" }, { "post_id": 2, "content": "world" }]"#)?;

    println!("\nAdding a post...");
    let id = store.create_post("adding content");

    println!("\nEditing post {id}...");
    store.update_post(id, "edited content")?;

    println!("\nDeleting post 1...");
    store.delete_post(1)?;

    feed.unsubscribe();

    println!("\nFinal collection: {}", store.to_json()?);
    Ok(())
}
