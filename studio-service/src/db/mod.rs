/// Database access layer
///
/// One repository module per table, following the pattern of free functions
/// over `&PgPool` returning `sqlx::Error`.
pub mod ai_interactions;
pub mod brands;
pub mod connections;
pub mod deals;
pub mod deliverables;
pub mod invoices;
pub mod negotiations;
pub mod posts;
pub mod revenue;
pub mod team;
pub mod tickets;
pub mod users;
