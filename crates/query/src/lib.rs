pub mod driver;
pub mod lookup;

pub use driver::{Answer, Question, QueryDriver};
pub use lookup::{RelationLookup, RelationStore, query};
