use rand::{distributions::Alphanumeric, Rng};
use tower_sessions::Session;

const TOKEN_LEN: usize = 32;

fn key(form_id: &str) -> String {
    format!("_csrf/{form_id}")
}

/// Returns the token for `form_id`, minting one on first use.
pub async fn token(
    session: &Session,
    form_id: &str,
) -> Result<String, tower_sessions::session::Error> {
    if let Some(existing) = session.get::<String>(&key(form_id)).await? {
        return Ok(existing);
    }
    let fresh: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    session.insert(&key(form_id), fresh.clone()).await?;
    Ok(fresh)
}

pub async fn is_valid(
    session: &Session,
    form_id: &str,
    submitted: &str,
) -> Result<bool, tower_sessions::session::Error> {
    if submitted.is_empty() {
        return Ok(false);
    }
    let expected = session.get::<String>(&key(form_id)).await?;
    Ok(expected.as_deref() == Some(submitted))
}
