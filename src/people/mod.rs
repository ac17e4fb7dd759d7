mod fetch;
mod graph;
mod parse;

pub use fetch::load_snapshot;
pub use graph::{
    Gender, GroupCategory, Membership, Person, Relationship, RelationshipStatus, SocialGraph,
    StatusKind,
};
