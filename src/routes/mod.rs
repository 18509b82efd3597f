/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated modules.
/// The split mirrors the authorization model: reads and auth exchanges are
/// anonymous, every content mutation requires the Admin role.

/// Routes accessible to all users (anonymous). Covers the auth exchanges,
/// all paginated reads, the review aggregates, and the view counter.
pub mod public;

/// Routes restricted to the Admin role. Every handler in this module takes
/// the `AdminUser` extractor, so authorization is enforced per handler and
/// cannot be forgotten when routes move.
pub mod admin;
