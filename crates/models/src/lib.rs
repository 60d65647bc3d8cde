pub mod errors;
pub mod db;
pub mod user;
pub mod personal_access_token;

#[cfg(test)]
mod tests;
