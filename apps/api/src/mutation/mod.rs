// Write side: validated create / update / associate / delete.

pub mod gateway;
pub mod validation;
