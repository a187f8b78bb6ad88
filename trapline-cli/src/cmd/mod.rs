pub mod requests;
pub mod rules;
pub mod template;
pub mod zones;
