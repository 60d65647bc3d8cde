//! Example accounts for local development.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::errors::ServiceError;
use crate::password::hash_password;
use crate::users::domain::NewUser;
use crate::users::repository::UserRepository;

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Ava", "Elijah", "Sophia", "James", "Isabella", "Lucas", "Mia", "Mateo",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Garcia", "Miller", "Davis", "Martinez", "Lopez", "Wilson",
];

/// Number of generated accounts next to the fixed one.
pub const GENERATED_USERS: usize = 10;

fn random_identity() -> (String, String) {
    let mut rng = rand::thread_rng();
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("User");
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Example");
    let suffix: u32 = rng.gen_range(1..10_000);
    let email = format!("{}.{}{}@example.com", first, last, suffix).to_lowercase();
    (format!("{} {}", first, last), email)
}

/// Insert "John Doe" plus [`GENERATED_USERS`] random accounts when the table
/// is empty. Returns how many rows were inserted.
pub async fn seed_example_users(users: &dyn UserRepository) -> Result<usize, ServiceError> {
    if users.count().await? > 0 {
        info!("seed skipped: users table is not empty");
        return Ok(0);
    }
    let password_hash = hash_password("password@123")?;
    users
        .insert(NewUser {
            name: "John Doe".into(),
            email: "johndoe@example.com".into(),
            password_hash: password_hash.clone(),
        })
        .await?;

    let mut inserted = 1;
    while inserted <= GENERATED_USERS {
        let (name, email) = random_identity();
        if users.email_taken(&email, None).await? {
            continue;
        }
        users.insert(NewUser { name, email, password_hash: password_hash.clone() }).await?;
        inserted += 1;
    }
    info!(count = inserted, "example users seeded");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repository::memory::InMemoryUserRepository;

    #[tokio::test]
    async fn seeds_only_an_empty_table() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(seed_example_users(&repo).await.unwrap(), GENERATED_USERS + 1);
        assert_eq!(repo.count().await.unwrap(), (GENERATED_USERS + 1) as u64);
        assert!(repo.find_by_email("johndoe@example.com").await.unwrap().is_some());

        assert_eq!(seed_example_users(&repo).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), (GENERATED_USERS + 1) as u64);
    }
}
