pub mod key;
pub mod store;

pub use key::DescField;
pub use store::TranslationCache;
