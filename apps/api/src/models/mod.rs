pub mod documents;
pub mod kinds;
pub mod reference;
