use chrono::TimeDelta;
use flashcard_scheduler::models::scheduler::now;
use flashcard_scheduler::seed::import_json;
use flashcard_scheduler::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Three capitals, two of them with review history.
fn seed_sample(store: &KvStore) -> Result<User, Box<dyn std::error::Error>> {
    let user = store.create_user(User::named("Audrow"))?;
    let today = now();

    let france = store.create_card(
        &user.id,
        Card::text("What is the capital of France?", "Paris"),
    )?;
    let germany = store.create_card(
        &user.id,
        Card::text("What is the capital of Germany?", "Berlin"),
    )?;
    store.create_card(&user.id, Card::text("What is the capital of Italy?", "Rome"))?;

    let history = [
        (&france.id, 4),
        (&france.id, 3),
        (&germany.id, 10),
        (&germany.id, 1),
    ];
    for (card_id, days_ago) in history {
        let date = today - TimeDelta::days(days_ago);
        store.create_attempt(&user.id, Attempt::at("", card_id.as_str(), date, true))?;
    }

    println!("Sample data created!");
    Ok(user)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "flashcard_scheduler=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = KvStore::new();
    let user = match std::env::args().nth(1) {
        Some(path) => import_json(&path)?.load_into(&store)?,
        None => seed_sample(&store)?,
    };

    let horizon = now() + TimeDelta::days(20);
    let due = get_due_cards(&store, &user.id, Some(horizon))?;

    println!("{} cards due for {} within 20 days", due.len(), user.name);
    for due_card in &due {
        println!("  - {}  {}", due_card.card.question, due_card.next_attempt);
    }
    Ok(())
}
