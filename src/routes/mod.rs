/// Router Module Index
///
/// Routes are split by who may call them. Access control is attached per module in
/// `create_router`, so a handler cannot be exposed without its layer by accident.

/// Health, login, signup, and password recovery. No token required.
pub mod public;

/// Everything that needs a bearer token. Ownership is checked in the services.
pub mod authenticated;

/// User administration. Authenticated like the module above; the handlers also
/// require a superuser.
pub mod admin;
